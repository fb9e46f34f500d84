use std::fmt::Write;

use anyhow::Context;
use serde::Serialize;

use crate::models::{latest, EventKind, MonthlyEventCount, PeriodRecord, WeeklyEventCount};
use crate::view::{
    conversion_rows, monthly_objective_rows, weekly_objective_rows, ConversionRow, ObjectiveRow,
    View, ViewStatus,
};

/// Differences are rendered with an explicit sign, "+12%" or "-7%".
pub fn format_signed_percent(value: i64) -> String {
    if value >= 0 {
        format!("+{value}%")
    } else {
        format!("{value}%")
    }
}

pub fn objectives_text(value_heading: &str, rows: &[ObjectiveRow]) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "{:<20} {:>14} {:>10} {:>12}  Statut",
        "Métrique", value_heading, "Objectif", "Progression"
    );
    for row in rows {
        let percent = format!("{}%", row.percent);
        let _ = writeln!(
            output,
            "{:<20} {:>14} {:>10} {:>12}  {}",
            row.label,
            row.value,
            row.objective,
            percent,
            row.tier.label()
        );
    }
    output
}

pub fn conversions_text(rows: &[ConversionRow]) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "{:<34} {:>15} {:>10} {:>11}  Statut",
        "Conversions", "Ratio Souhaité", "Ton Ratio", "Différence"
    );
    for row in rows {
        let desired = format!("{}%", row.desired_ratio);
        let actual = format!("{}%", row.actual_ratio);
        let _ = writeln!(
            output,
            "{:<34} {:>15} {:>10} {:>11}  {}",
            row.label,
            desired,
            actual,
            format_signed_percent(row.difference),
            row.tier.label()
        );
    }
    output
}

pub fn rows_csv<T: Serialize>(rows: &[T]) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row).context("failed to serialize row")?;
    }
    let bytes = writer.into_inner().context("failed to flush csv writer")?;
    String::from_utf8(bytes).context("csv output was not valid utf-8")
}

pub fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize to json")
}

fn objectives_markdown(output: &mut String, value_heading: &str, rows: &[ObjectiveRow]) {
    let _ = writeln!(
        output,
        "| Métrique | {value_heading} | Objectif | Progression | Statut |"
    );
    let _ = writeln!(output, "| --- | ---: | ---: | ---: | --- |");
    for row in rows {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {}% | {} |",
            row.label,
            row.value,
            row.objective,
            row.percent,
            row.tier.label()
        );
    }
}

fn conversions_markdown(output: &mut String, rows: &[ConversionRow]) {
    let _ = writeln!(
        output,
        "| Conversions | Ratio Souhaité | Ton Ratio | Différence | Statut |"
    );
    let _ = writeln!(output, "| --- | ---: | ---: | ---: | --- |");
    for row in rows {
        let _ = writeln!(
            output,
            "| {} | {}% | {}% | {} | {} |",
            row.label,
            row.desired_ratio,
            row.actual_ratio,
            format_signed_percent(row.difference),
            row.tier.label()
        );
    }
}

fn weekly_events_markdown(output: &mut String, series: &[WeeklyEventCount]) {
    let _ = write!(output, "| Semaine |");
    for kind in EventKind::ALL {
        let _ = write!(output, " {} |", kind.label());
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "| --- | ---: | ---: | ---: | ---: | ---: |");
    for record in series {
        let _ = write!(output, "| {} |", record.period_label());
        for kind in EventKind::ALL {
            let _ = write!(output, " {} |", record.count(kind));
        }
        let _ = writeln!(output);
    }
}

fn error_line(output: &mut String, message: Option<&str>) {
    let _ = writeln!(
        output,
        "Error loading data: {}",
        message.unwrap_or("unknown error")
    );
}

pub fn build_report(
    monthly: &View<MonthlyEventCount>,
    weekly: &View<WeeklyEventCount>,
) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Leads Funnel Dashboard");

    let _ = writeln!(output);
    let _ = writeln!(output, "## Objectifs Mensuels");
    if monthly.status() == ViewStatus::Error {
        error_line(&mut output, monthly.error_message());
    } else {
        match latest(monthly.series()) {
            None => {
                let _ = writeln!(output, "No monthly data for this window.");
            }
            Some(record) => {
                let _ = writeln!(
                    output,
                    "Suivi des objectifs du mois en cours ({}).",
                    record.period_label()
                );
                let _ = writeln!(output);
                objectives_markdown(&mut output, "Totaux", &monthly_objective_rows(monthly));
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Objectifs Hebdomadaires");
    if weekly.status() == ViewStatus::Error {
        error_line(&mut output, weekly.error_message());
    } else if weekly.series().is_empty() {
        let _ = writeln!(output, "No weekly data for this window.");
    } else {
        let _ = writeln!(
            output,
            "Moyenne hebdomadaire sur {} semaines.",
            weekly.series().len()
        );
        let _ = writeln!(output);
        objectives_markdown(&mut output, "Moyenne Hebdo", &weekly_objective_rows(weekly));
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Ratios de Conversion");
    if monthly.status() == ViewStatus::Error {
        error_line(&mut output, monthly.error_message());
    } else {
        match monthly.resolved() {
            Some(record) => {
                let _ = writeln!(output, "Mois sélectionné : {}.", record.period_label());
            }
            None => {
                let _ = writeln!(output, "Aucun mois sélectionné.");
            }
        }
        let _ = writeln!(output);
        conversions_markdown(&mut output, &conversion_rows(monthly));
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Événements Hebdomadaires");
    if weekly.status() == ViewStatus::Error {
        error_line(&mut output, weekly.error_message());
    } else if weekly.series().is_empty() {
        let _ = writeln!(output, "No weekly data for this window.");
    } else {
        weekly_events_markdown(&mut output, weekly.series());
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use chrono::NaiveDate;

    fn month(mois: &str, contact: i64, reponse: i64, propose: i64, booke: i64) -> MonthlyEventCount {
        MonthlyEventCount {
            mois: mois.to_string(),
            date_prise_contact: Some(contact),
            date_reponse_prospect: Some(reponse),
            date_appel_propose: Some(propose),
            date_appel_booke: Some(booke),
            date_relance: None,
        }
    }

    fn week(day: u32, contact: i64, booke: i64) -> WeeklyEventCount {
        WeeklyEventCount {
            semaine: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            date_prise_contact: Some(contact),
            date_reponse_prospect: None,
            date_appel_propose: None,
            date_appel_booke: Some(booke),
            date_relance: None,
        }
    }

    #[test]
    fn signed_percent_keeps_the_sign_visible() {
        assert_eq!(format_signed_percent(12), "+12%");
        assert_eq!(format_signed_percent(0), "+0%");
        assert_eq!(format_signed_percent(-7), "-7%");
    }

    #[test]
    fn report_renders_every_card_when_populated() {
        let mut monthly = View::new();
        monthly.settle(Ok(vec![month("2025-06", 400, 200, 100, 24)]));
        let mut weekly = View::new();
        weekly.settle(Ok(vec![week(2, 50, 2), week(9, 50, 3), week(16, 50, 4), week(23, 50, 3)]));

        let report = build_report(&monthly, &weekly);
        assert!(report.contains("## Objectifs Mensuels"));
        assert!(report.contains("Suivi des objectifs du mois en cours (juin 2025)."));
        assert!(report.contains("| Messages envoyés | 400 | 400 | 100% | on target |"));
        assert!(report.contains("Moyenne hebdomadaire sur 4 semaines."));
        assert!(report.contains("| Appels bookés | 3 | 3 | 100% | on target |"));
        assert!(report.contains("Mois sélectionné : juin 2025."));
        assert!(report.contains("| Conversations → Appel proposé | 50% | 50% | +0% | on target |"));
        assert!(report.contains("## Événements Hebdomadaires"));
        assert!(report.contains("| 02/06/2025 | 50 | 0 | 0 | 2 | 0 |"));
    }

    #[test]
    fn report_renders_the_zero_state_without_failing() {
        let mut monthly: View<MonthlyEventCount> = View::new();
        monthly.settle(Ok(Vec::new()));
        let mut weekly: View<WeeklyEventCount> = View::new();
        weekly.settle(Ok(Vec::new()));

        let report = build_report(&monthly, &weekly);
        assert!(report.contains("No monthly data for this window."));
        assert!(report.contains("No weekly data for this window."));
        assert!(report.contains("Aucun mois sélectionné."));
        // the conversion table still renders, floored to zero
        assert!(report.contains("| Messages Envoyés → Conversations | 70% | 0% | -70% | far below target |"));
    }

    #[test]
    fn report_surfaces_fetch_errors_verbatim() {
        let mut monthly: View<MonthlyEventCount> = View::new();
        monthly.settle(Err(anyhow!("connection refused")));
        let mut weekly: View<WeeklyEventCount> = View::new();
        weekly.settle(Ok(Vec::new()));

        let report = build_report(&monthly, &weekly);
        assert!(report.contains("Error loading data: connection refused"));
    }

    #[test]
    fn text_tables_carry_tier_labels() {
        let mut monthly = View::new();
        monthly.settle(Ok(vec![month("2025-06", 200, 100, 50, 12)]));
        let text = objectives_text("Totaux", &monthly_objective_rows(&monthly));
        assert!(text.contains("Métrique"));
        assert!(text.contains("below target"));

        let conversions = conversions_text(&conversion_rows(&monthly));
        assert!(conversions.contains("Ratio Souhaité"));
        assert!(conversions.contains("+0%"));
    }

    #[test]
    fn csv_output_includes_headers_and_rows() {
        let mut monthly = View::new();
        monthly.settle(Ok(vec![month("2025-06", 400, 200, 100, 24)]));
        let csv = rows_csv(&monthly_objective_rows(&monthly)).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("label,value,objective,percent,tier,emphasis")
        );
        assert_eq!(
            lines.next(),
            Some("Messages envoyés,400,400,100,on_target,positive")
        );
    }
}
