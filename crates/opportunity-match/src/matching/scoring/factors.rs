use super::super::domain::{Opportunity, Profile};
use super::super::weights::{MatchFactor, MatchingConfig, PoolPolicy};
use super::FactorScore;

pub(crate) fn score_factors(
    profile: &Profile,
    opportunity: &Opportunity,
    config: &MatchingConfig,
) -> [(MatchFactor, FactorScore); 4] {
    [
        (MatchFactor::Skill, skill_fit(profile, opportunity, config)),
        (
            MatchFactor::Credential,
            credential_fit(profile, opportunity, config),
        ),
        (MatchFactor::Level, level_fit(profile, opportunity, config)),
        (
            MatchFactor::Location,
            location_fit(profile, opportunity, config),
        ),
    ]
}

fn skill_fit(profile: &Profile, opportunity: &Opportunity, config: &MatchingConfig) -> FactorScore {
    let weight = config.weights.skill;
    if opportunity.required_skills.is_empty() {
        return empty_factor(weight, config.pool_policy);
    }

    let earned = opportunity
        .required_skills
        .iter()
        .map(|skill| f64::from(profile.skill_score(skill)) * weight / 100.0)
        .sum();

    FactorScore {
        earned,
        pool: weight * opportunity.required_skills.len() as f64,
    }
}

fn credential_fit(
    profile: &Profile,
    opportunity: &Opportunity,
    config: &MatchingConfig,
) -> FactorScore {
    let weight = config.weights.credential;
    let required = &opportunity.required_credential_categories;
    if required.is_empty() {
        return empty_factor(weight, config.pool_policy);
    }

    let covered = required
        .iter()
        .filter(|category| {
            profile
                .completed_credentials
                .iter()
                .any(|credential| credential_matches(&credential.category, category))
        })
        .count();

    let earned = weight * covered as f64 / required.len().max(1) as f64;

    FactorScore {
        earned: earned.min(weight),
        pool: weight,
    }
}

fn level_fit(profile: &Profile, opportunity: &Opportunity, config: &MatchingConfig) -> FactorScore {
    let weight = config.weights.level;
    let threshold = opportunity.minimum_difficulty.threshold();

    let earned = if profile.proficiency_level >= threshold {
        weight
    } else {
        f64::from(profile.proficiency_level) / f64::from(threshold) * weight
    };

    FactorScore {
        earned,
        pool: weight,
    }
}

fn location_fit(
    profile: &Profile,
    opportunity: &Opportunity,
    config: &MatchingConfig,
) -> FactorScore {
    let weight = config.weights.location;
    let constraint = &opportunity.location;

    let matches = constraint.remote
        || constraint
            .region
            .as_deref()
            .is_some_and(|region| same_text(region, &profile.location_tag));

    FactorScore {
        earned: if matches { weight } else { 0.0 },
        pool: weight,
    }
}

fn empty_factor(weight: f64, policy: PoolPolicy) -> FactorScore {
    match policy {
        PoolPolicy::ExcludeEmpty => FactorScore {
            earned: 0.0,
            pool: 0.0,
        },
        PoolPolicy::PenalizeEmpty => FactorScore {
            earned: 0.0,
            pool: weight,
        },
    }
}

/// A credential satisfies a requirement when its category equals, prefixes, or is contained in
/// the required category (case-insensitive).
pub(crate) fn credential_matches(credential_category: &str, required_category: &str) -> bool {
    let held = credential_category.trim().to_lowercase();
    let required = required_category.trim().to_lowercase();
    if held.is_empty() {
        return false;
    }
    required.contains(&held)
}

fn same_text(left: &str, right: &str) -> bool {
    left.trim().to_lowercase() == right.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_matching_accepts_prefix_and_substring() {
        assert!(credential_matches("production", "production"));
        assert!(credential_matches("Production", "production-advanced"));
        assert!(credential_matches("mixing", "audio-mixing"));
        assert!(!credential_matches("music-production", "production"));
        assert!(!credential_matches("  ", "production"));
    }

    #[test]
    fn region_comparison_ignores_case_and_padding() {
        assert!(same_text("sp", " SP "));
        assert!(!same_text("RJ", "SP"));
    }
}
