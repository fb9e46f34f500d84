use std::fmt::Write;

use anyhow::Context;
use sqlx::{PgPool, Row};

use crate::models::{EventKind, MonthlyEventCount, WeeklyEventCount};

// Each funnel stage lives in its own nullable date column on the leads
// table. Unpivot the five columns into (kind, bucket) events, then count
// per kind within each bucket. `bucket_expr` references the column as {col}.
fn series_query(key_alias: &str, bucket_expr: &str) -> String {
    let mut selects = Vec::new();
    for kind in EventKind::ALL {
        let column = kind.wire_name();
        let bucket = bucket_expr.replace("{col}", column);
        selects.push(format!(
            "SELECT '{column}' AS kind, {bucket} AS bucket \
             FROM leads_funnel.leads WHERE {column} IS NOT NULL"
        ));
    }

    let mut counts = String::new();
    for kind in EventKind::ALL {
        let column = kind.wire_name();
        let _ = write!(
            counts,
            ",\n       count(*) FILTER (WHERE kind = '{column}') AS {column}"
        );
    }

    format!(
        "WITH events AS (\n    {selects}\n)\n\
         SELECT bucket AS {key_alias}{counts}\n\
         FROM events\nGROUP BY bucket\nORDER BY bucket",
        selects = selects.join("\n    UNION ALL\n    "),
    )
}

pub async fn fetch_weekly_series(pool: &PgPool) -> anyhow::Result<Vec<WeeklyEventCount>> {
    let query = series_query("semaine", "date_trunc('week', {col})::date");
    let rows = sqlx::query(&query)
        .fetch_all(pool)
        .await
        .context("failed to fetch weekly event counts")?;

    let mut series = Vec::with_capacity(rows.len());
    for row in rows {
        series.push(WeeklyEventCount {
            semaine: row.get("semaine"),
            date_prise_contact: row.get("date_prise_contact"),
            date_reponse_prospect: row.get("date_reponse_prospect"),
            date_appel_propose: row.get("date_appel_propose"),
            date_appel_booke: row.get("date_appel_booke"),
            date_relance: row.get("date_relance"),
        });
    }

    Ok(series)
}

pub async fn fetch_monthly_series(pool: &PgPool) -> anyhow::Result<Vec<MonthlyEventCount>> {
    let query = series_query("mois", "to_char({col}, 'YYYY-MM')");
    let rows = sqlx::query(&query)
        .fetch_all(pool)
        .await
        .context("failed to fetch monthly event counts")?;

    let mut series = Vec::with_capacity(rows.len());
    for row in rows {
        series.push(MonthlyEventCount {
            mois: row.get("mois"),
            date_prise_contact: row.get("date_prise_contact"),
            date_reponse_prospect: row.get("date_reponse_prospect"),
            date_appel_propose: row.get("date_appel_propose"),
            date_appel_booke: row.get("date_appel_booke"),
            date_relance: row.get("date_relance"),
        });
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekly_query_unpivots_every_stage() {
        let query = series_query("semaine", "date_trunc('week', {col})::date");
        for kind in EventKind::ALL {
            let column = kind.wire_name();
            assert!(query.contains(&format!("{column} IS NOT NULL")));
            assert!(query.contains(&format!("kind = '{column}'")));
        }
        assert!(query.contains("SELECT bucket AS semaine"));
        assert!(query.ends_with("ORDER BY bucket"));
    }

    #[test]
    fn monthly_query_buckets_by_year_month() {
        let query = series_query("mois", "to_char({col}, 'YYYY-MM')");
        assert!(query.contains("to_char(date_prise_contact, 'YYYY-MM')"));
        assert!(query.contains("SELECT bucket AS mois"));
    }
}
