use crate::models::{EventKind, PeriodRecord};
use crate::objectives::ConversionRule;

pub fn total<R: PeriodRecord>(record: &R, kind: EventKind) -> i64 {
    record.count(kind)
}

/// Mean of a kind's count across the whole series, rounded half away from
/// zero. Zero for an empty series.
pub fn average<R: PeriodRecord>(series: &[R], kind: EventKind) -> i64 {
    if series.is_empty() {
        return 0;
    }
    let sum: i64 = series.iter().map(|record| record.count(kind)).sum();
    (sum as f64 / series.len() as f64).round() as i64
}

/// Percentage of the rule's numerator count over its denominator count.
/// Zero denominators floor the ratio to 0 rather than failing.
pub fn conversion_ratio<R: PeriodRecord>(record: &R, rule: &ConversionRule) -> i64 {
    let denominator = total(record, rule.denominator);
    if denominator == 0 {
        return 0;
    }
    let numerator = total(record, rule.numerator);
    (100.0 * numerator as f64 / denominator as f64).round() as i64
}

/// Progress percentage of a value against its quota, for display.
pub fn percent_of(value: i64, target: i64) -> i64 {
    if target == 0 {
        return 0;
    }
    (100.0 * value as f64 / target as f64).round() as i64
}
