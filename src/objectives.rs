use crate::models::EventKind;

/// Fixed quota for one funnel stage, per month and per week.
#[derive(Debug, Clone, Copy)]
pub struct Objective {
    pub kind: EventKind,
    pub monthly: i64,
    pub weekly: i64,
}

pub const OBJECTIVES: [Objective; 4] = [
    Objective {
        kind: EventKind::PriseContact,
        monthly: 400,
        weekly: 50,
    },
    Objective {
        kind: EventKind::ReponseProspect,
        monthly: 200,
        weekly: 25,
    },
    Objective {
        kind: EventKind::AppelPropose,
        monthly: 100,
        weekly: 17,
    },
    Objective {
        kind: EventKind::AppelBooke,
        monthly: 24,
        weekly: 3,
    },
];

/// Stage-to-stage conversion with the ratio it should reach.
#[derive(Debug, Clone, Copy)]
pub struct ConversionRule {
    pub label: &'static str,
    pub numerator: EventKind,
    pub denominator: EventKind,
    pub desired_ratio: i64,
}

pub const CONVERSION_RULES: [ConversionRule; 4] = [
    ConversionRule {
        label: "Messages Envoyés → Conversations",
        numerator: EventKind::ReponseProspect,
        denominator: EventKind::PriseContact,
        desired_ratio: 70,
    },
    ConversionRule {
        label: "Conversations → Appel proposé",
        numerator: EventKind::AppelPropose,
        denominator: EventKind::ReponseProspect,
        desired_ratio: 50,
    },
    ConversionRule {
        label: "Appel proposé → Appel booké",
        numerator: EventKind::AppelBooke,
        denominator: EventKind::AppelPropose,
        desired_ratio: 70,
    },
    ConversionRule {
        label: "Conversations → Appel booké",
        numerator: EventKind::AppelBooke,
        denominator: EventKind::ReponseProspect,
        desired_ratio: 30,
    },
];
