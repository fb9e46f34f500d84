use serde::Serialize;

/// Classification bucket for a value compared to its target. Ordered from
/// worst to best so tier rank comparisons read naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    FarBelowTarget,
    BelowTarget,
    NearTarget,
    OnTarget,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::FarBelowTarget => "far below target",
            Tier::BelowTarget => "below target",
            Tier::NearTarget => "near target",
            Tier::OnTarget => "on target",
        }
    }
}

/// Coarser visual emphasis, independent of the tier label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    Positive,
    Neutral,
    Negative,
}

/// Quota tiers run on percentage-of-target. The comparison uses the exact
/// ratio via cross-multiplication, not the rounded display percent.
pub fn objective_tier(value: i64, objective: i64) -> Tier {
    if value >= objective {
        Tier::OnTarget
    } else if 100 * value >= 75 * objective {
        Tier::NearTarget
    } else if 2 * value >= objective {
        Tier::BelowTarget
    } else {
        Tier::FarBelowTarget
    }
}

pub fn objective_emphasis(value: i64, objective: i64) -> Emphasis {
    if value >= objective {
        Emphasis::Positive
    } else if 2 * value < objective {
        Emphasis::Negative
    } else {
        Emphasis::Neutral
    }
}

/// Ratio tiers run on the signed point difference from the desired ratio,
/// not on percentage-of-target. The two rule sets are deliberately distinct.
pub fn ratio_tier(ratio: i64, desired: i64) -> Tier {
    let difference = ratio - desired;
    if difference >= 0 {
        Tier::OnTarget
    } else if difference >= -10 {
        Tier::NearTarget
    } else {
        Tier::FarBelowTarget
    }
}

pub fn ratio_emphasis(ratio: i64, desired: i64) -> Emphasis {
    let difference = ratio - desired;
    if difference >= 0 {
        Emphasis::Positive
    } else if difference < -10 {
        Emphasis::Negative
    } else {
        Emphasis::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objective_tiers_follow_percentage_thresholds() {
        assert_eq!(objective_tier(400, 400), Tier::OnTarget);
        assert_eq!(objective_tier(500, 400), Tier::OnTarget);
        assert_eq!(objective_tier(300, 400), Tier::NearTarget);
        assert_eq!(objective_tier(200, 400), Tier::BelowTarget);
        assert_eq!(objective_tier(199, 400), Tier::FarBelowTarget);
        assert_eq!(objective_tier(0, 400), Tier::FarBelowTarget);
    }

    #[test]
    fn objective_tier_uses_exact_ratio_not_rounded_percent() {
        // 149/200 displays as 75% once rounded but sits below the 75% line
        assert_eq!(objective_tier(149, 200), Tier::BelowTarget);
        assert_eq!(objective_tier(150, 200), Tier::NearTarget);
    }

    #[test]
    fn objective_tier_is_monotonic_in_value() {
        let objective = 24;
        let mut previous = objective_tier(0, objective);
        for value in 1..=30 {
            let tier = objective_tier(value, objective);
            assert!(tier >= previous);
            previous = tier;
        }
    }

    #[test]
    fn objective_emphasis_marks_both_extremes() {
        assert_eq!(objective_emphasis(400, 400), Emphasis::Positive);
        assert_eq!(objective_emphasis(300, 400), Emphasis::Neutral);
        assert_eq!(objective_emphasis(200, 400), Emphasis::Neutral);
        assert_eq!(objective_emphasis(199, 400), Emphasis::Negative);
    }

    #[test]
    fn ratio_tiers_follow_point_difference() {
        assert_eq!(ratio_tier(70, 70), Tier::OnTarget);
        assert_eq!(ratio_tier(82, 70), Tier::OnTarget);
        assert_eq!(ratio_tier(60, 70), Tier::NearTarget);
        assert_eq!(ratio_tier(59, 70), Tier::FarBelowTarget);
        assert_eq!(ratio_tier(0, 70), Tier::FarBelowTarget);
    }

    #[test]
    fn ratio_emphasis_follows_point_difference() {
        assert_eq!(ratio_emphasis(70, 70), Emphasis::Positive);
        assert_eq!(ratio_emphasis(60, 70), Emphasis::Neutral);
        assert_eq!(ratio_emphasis(59, 70), Emphasis::Negative);
    }

    #[test]
    fn the_two_classifiers_are_distinct_rules() {
        // 35 against 50 is 70% of target but 15 points short
        assert_eq!(objective_tier(35, 50), Tier::BelowTarget);
        assert_eq!(ratio_tier(35, 50), Tier::FarBelowTarget);
    }
}
