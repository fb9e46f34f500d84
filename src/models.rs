use chrono::{Locale, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PriseContact,
    ReponseProspect,
    AppelPropose,
    AppelBooke,
    Relance,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::PriseContact,
        EventKind::ReponseProspect,
        EventKind::AppelPropose,
        EventKind::AppelBooke,
        EventKind::Relance,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            EventKind::PriseContact => "date_prise_contact",
            EventKind::ReponseProspect => "date_reponse_prospect",
            EventKind::AppelPropose => "date_appel_propose",
            EventKind::AppelBooke => "date_appel_booke",
            EventKind::Relance => "date_relance",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EventKind::PriseContact => "Messages envoyés",
            EventKind::ReponseProspect => "Conversations",
            EventKind::AppelPropose => "Appels proposés",
            EventKind::AppelBooke => "Appels bookés",
            EventKind::Relance => "Relances",
        }
    }
}

/// One week of funnel event counts, keyed by the week-start date.
/// Absent counts read as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyEventCount {
    pub semaine: NaiveDate,
    #[serde(default)]
    pub date_prise_contact: Option<i64>,
    #[serde(default)]
    pub date_reponse_prospect: Option<i64>,
    #[serde(default)]
    pub date_appel_propose: Option<i64>,
    #[serde(default)]
    pub date_appel_booke: Option<i64>,
    #[serde(default)]
    pub date_relance: Option<i64>,
}

/// One month of funnel event counts, keyed by a `YYYY-MM` string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyEventCount {
    pub mois: String,
    #[serde(default)]
    pub date_prise_contact: Option<i64>,
    #[serde(default)]
    pub date_reponse_prospect: Option<i64>,
    #[serde(default)]
    pub date_appel_propose: Option<i64>,
    #[serde(default)]
    pub date_appel_booke: Option<i64>,
    #[serde(default)]
    pub date_relance: Option<i64>,
}

pub trait PeriodRecord {
    fn period_key(&self) -> String;
    fn period_label(&self) -> String;
    fn count(&self, kind: EventKind) -> i64;
}

impl PeriodRecord for WeeklyEventCount {
    fn period_key(&self) -> String {
        self.semaine.to_string()
    }

    fn period_label(&self) -> String {
        self.semaine.format("%d/%m/%Y").to_string()
    }

    fn count(&self, kind: EventKind) -> i64 {
        match kind {
            EventKind::PriseContact => self.date_prise_contact,
            EventKind::ReponseProspect => self.date_reponse_prospect,
            EventKind::AppelPropose => self.date_appel_propose,
            EventKind::AppelBooke => self.date_appel_booke,
            EventKind::Relance => self.date_relance,
        }
        .unwrap_or(0)
    }
}

impl PeriodRecord for MonthlyEventCount {
    fn period_key(&self) -> String {
        self.mois.clone()
    }

    fn period_label(&self) -> String {
        month_label(&self.mois)
    }

    fn count(&self, kind: EventKind) -> i64 {
        match kind {
            EventKind::PriseContact => self.date_prise_contact,
            EventKind::ReponseProspect => self.date_reponse_prospect,
            EventKind::AppelPropose => self.date_appel_propose,
            EventKind::AppelBooke => self.date_appel_booke,
            EventKind::Relance => self.date_relance,
        }
        .unwrap_or(0)
    }
}

/// French month/year label for a `YYYY-MM` key. Falls back to the raw key
/// when it does not parse.
pub fn month_label(mois: &str) -> String {
    match NaiveDate::parse_from_str(&format!("{mois}-01"), "%Y-%m-%d") {
        Ok(date) => date.format_localized("%B %Y", Locale::fr_FR).to_string(),
        Err(_) => mois.to_string(),
    }
}

pub fn latest<R: PeriodRecord>(series: &[R]) -> Option<&R> {
    series.last()
}

pub fn find<'a, R: PeriodRecord>(series: &'a [R], key: &str) -> Option<&'a R> {
    series.iter().find(|record| record.period_key() == key)
}

pub fn available_periods<R: PeriodRecord>(series: &[R]) -> Vec<(String, String)> {
    series
        .iter()
        .map(|record| (record.period_key(), record.period_label()))
        .collect()
}
