use std::future::Future;

use anyhow::Result;
use serde::Serialize;

use crate::classify::{self, Emphasis, Tier};
use crate::metrics;
use crate::models::{available_periods, latest, MonthlyEventCount, PeriodRecord, WeeklyEventCount};
use crate::objectives::{CONVERSION_RULES, OBJECTIVES};
use crate::selector::PeriodSelector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewStatus {
    Loading,
    Ready,
    Error,
}

/// Per-view state container. Each view owns an independent instance,
/// constructed fresh on activation; series are immutable once settled.
#[derive(Debug)]
pub struct View<R> {
    status: ViewStatus,
    series: Vec<R>,
    selector: PeriodSelector,
    error_message: Option<String>,
}

impl<R: PeriodRecord> View<R> {
    pub fn new() -> Self {
        Self {
            status: ViewStatus::Loading,
            series: Vec::new(),
            selector: PeriodSelector::new(),
            error_message: None,
        }
    }

    /// Awaits the one-shot fetch for this view, then settles.
    pub async fn load<F>(&mut self, fetch: F)
    where
        F: Future<Output = Result<Vec<R>>>,
    {
        let outcome = fetch.await;
        self.settle(outcome);
    }

    /// Transitions loading state to ready or error. Fetch failures are
    /// captured as a message for the view to render, never re-raised.
    pub fn settle(&mut self, outcome: Result<Vec<R>>) {
        match outcome {
            Ok(series) => {
                self.selector.on_series_loaded(&series);
                self.series = series;
                self.status = ViewStatus::Ready;
                self.error_message = None;
            }
            Err(error) => {
                self.status = ViewStatus::Error;
                self.error_message = Some(error.to_string());
            }
        }
    }

    pub fn status(&self) -> ViewStatus {
        self.status
    }

    pub fn series(&self) -> &[R] {
        &self.series
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn selected_period(&self) -> Option<&str> {
        self.selector.selected()
    }

    pub fn select_period(&mut self, key: impl Into<String>) {
        self.selector.select(key);
    }

    pub fn resolved(&self) -> Option<&R> {
        self.selector.resolve(&self.series)
    }

    pub fn available_periods(&self) -> Vec<(String, String)> {
        available_periods(&self.series)
    }
}

impl<R: PeriodRecord> Default for View<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjectiveRow {
    pub label: &'static str,
    pub value: i64,
    pub objective: i64,
    pub percent: i64,
    pub tier: Tier,
    pub emphasis: Emphasis,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionRow {
    pub label: &'static str,
    pub desired_ratio: i64,
    pub actual_ratio: i64,
    pub difference: i64,
    pub tier: Tier,
    pub emphasis: Emphasis,
}

/// Computed view state handed to the rendering layer, which must not
/// re-derive any of it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot<'a, R: Serialize, D: Serialize> {
    pub status: ViewStatus,
    pub series: &'a [R],
    pub selected_period_key: Option<&'a str>,
    pub derived_values: D,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<&'a str>,
}

pub fn snapshot<'a, R, D>(view: &'a View<R>, derived_values: D) -> ViewSnapshot<'a, R, D>
where
    R: PeriodRecord + Serialize,
    D: Serialize,
{
    ViewSnapshot {
        status: view.status(),
        series: view.series(),
        selected_period_key: view.selected_period(),
        derived_values,
        error_message: view.error_message(),
    }
}

fn objective_row(label: &'static str, value: i64, objective: i64) -> ObjectiveRow {
    ObjectiveRow {
        label,
        value,
        objective,
        percent: metrics::percent_of(value, objective),
        tier: classify::objective_tier(value, objective),
        emphasis: classify::objective_emphasis(value, objective),
    }
}

/// Monthly quota tracking runs against the most recent month of the series.
pub fn monthly_objective_rows(view: &View<MonthlyEventCount>) -> Vec<ObjectiveRow> {
    let current = latest(view.series());
    OBJECTIVES
        .iter()
        .map(|objective| {
            let value = current
                .map(|record| metrics::total(record, objective.kind))
                .unwrap_or(0);
            objective_row(objective.kind.label(), value, objective.monthly)
        })
        .collect()
}

/// Weekly quota tracking runs against the average across every fetched week.
pub fn weekly_objective_rows(view: &View<WeeklyEventCount>) -> Vec<ObjectiveRow> {
    OBJECTIVES
        .iter()
        .map(|objective| {
            let value = metrics::average(view.series(), objective.kind);
            objective_row(objective.kind.label(), value, objective.weekly)
        })
        .collect()
}

/// Conversion tracking runs against the month the selector resolves to; an
/// unresolved selection yields all-zero ratios.
pub fn conversion_rows(view: &View<MonthlyEventCount>) -> Vec<ConversionRow> {
    let current = view.resolved();
    CONVERSION_RULES
        .iter()
        .map(|rule| {
            let actual = current
                .map(|record| metrics::conversion_ratio(record, rule))
                .unwrap_or(0);
            ConversionRow {
                label: rule.label,
                desired_ratio: rule.desired_ratio,
                actual_ratio: actual,
                difference: actual - rule.desired_ratio,
                tier: classify::ratio_tier(actual, rule.desired_ratio),
                emphasis: classify::ratio_emphasis(actual, rule.desired_ratio),
            }
        })
        .collect()
}
