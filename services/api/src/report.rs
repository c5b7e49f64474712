use crate::infra::{parse_category, read_json_file, CatalogFile};
use clap::Args;
use opportunity_match::config::MatchingSettings;
use opportunity_match::error::AppError;
use opportunity_match::matching::{
    MatchFactor, MatchingService, OpportunityCategory, RankingFilter, RankingReport,
    RankingRequest,
};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Member profile JSON file
    #[arg(long)]
    pub(crate) profile: PathBuf,
    /// Opportunity catalog JSON file (array, or object with `version` and `opportunities`)
    #[arg(long)]
    pub(crate) catalog: PathBuf,
    /// Only show opportunities in this category
    #[arg(long, value_parser = parse_category)]
    pub(crate) category: Option<OpportunityCategory>,
    /// Only show opportunities scoring at least this much
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub(crate) min_score: Option<u8>,
    /// Only show platform-exclusive opportunities
    #[arg(long)]
    pub(crate) exclusive_only: bool,
    /// Print the report as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        profile,
        catalog,
        category,
        min_score,
        exclusive_only,
        json,
    } = args;

    let settings = MatchingSettings::from_env()?;
    let service = MatchingService::new(settings.engine, settings.cache_capacity)?;

    let profile: Value = read_json_file(&profile)?;
    let (catalog_version, opportunities) = read_json_file::<CatalogFile>(&catalog)?.into_parts();

    let report = service.rank_request(RankingRequest {
        profile,
        profile_version: None,
        catalog_version,
        opportunities,
        filter: RankingFilter {
            category,
            min_score: min_score.map(i64::from),
            exclusive_only,
        },
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }

    Ok(())
}

pub(crate) fn render_report(report: &RankingReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Opportunity ranking for {}\n", report.profile_id.0));
    if let Some(version) = &report.catalog_version {
        out.push_str(&format!("Catalog version: {version}\n"));
    }

    if report.results.is_empty() {
        out.push_str("\nNo opportunities matched\n");
    } else {
        out.push('\n');
        for entry in &report.results {
            let badge = entry
                .category
                .map(|category| format!(" [{}]", category.badge()))
                .unwrap_or_default();
            let deadline = entry
                .deadline
                .map(|date| format!(", due {date}"))
                .unwrap_or_default();
            out.push_str(&format!(
                "{:>3}. {:<32} {:>3}%{} ({}{})\n",
                entry.rank + 1,
                entry.result.opportunity_id,
                entry.result.score,
                badge,
                entry.exclusivity.label(),
                deadline
            ));

            let factors: Vec<String> = MatchFactor::ALL
                .iter()
                .map(|factor| {
                    format!(
                        "{} {:.1}/{:.1}",
                        factor.label(),
                        entry.result.earned(*factor),
                        entry.result.pool(*factor)
                    )
                })
                .collect();
            out.push_str(&format!("     {}\n", factors.join(" | ")));
            if entry.result.is_degenerate() {
                out.push_str("     no weighted requirements apply\n");
            }
        }
    }

    if !report.rejected.is_empty() {
        out.push_str("\nRejected catalog entries\n");
        for rejection in &report.rejected {
            out.push_str(&format!(
                "- #{} {}: {}\n",
                rejection.index,
                rejection.opportunity_id.as_deref().unwrap_or("<no id>"),
                rejection.error
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use opportunity_match::matching::MatchingConfig;
    use serde_json::json;

    fn sample_report() -> RankingReport {
        let service = MatchingService::new(MatchingConfig::default(), 0).expect("valid config");
        let profile = json!({
            "id": "member-042",
            "skills": { "production": 80, "mixing": 60 },
            "completedCredentials": [
                { "id": "cred-1", "category": "production", "tier": "member" }
            ],
            "proficiencyLevel": 6,
            "locationTag": "SP",
            "availability": "open"
        });

        service
            .rank_request(RankingRequest {
                profile,
                catalog_version: Some("weekly-42".to_string()),
                opportunities: vec![
                    json!({
                        "id": "opp-studio-session",
                        "requiredSkills": ["production", "mixing"],
                        "requiredCredentialCategories": ["production"],
                        "minimumDifficulty": "intermediate",
                        "locationConstraint": { "remote": false, "region": "SP" },
                        "exclusivityClass": "platform-exclusive",
                        "deadline": "2026-11-30",
                        "category": "production"
                    }),
                    json!({ "id": "opp-missing-fields" }),
                ],
                ..RankingRequest::default()
            })
            .expect("ranks")
    }

    #[test]
    fn table_lists_scores_breakdown_and_rejections() {
        let rendered = render_report(&sample_report());

        assert!(rendered.contains("Opportunity ranking for member-042"));
        assert!(rendered.contains("Catalog version: weekly-42"));
        assert!(rendered.contains("opp-studio-session"));
        assert!(rendered.contains(" 83% [Production] (platform exclusive, due 2026-11-30)"));
        assert!(rendered.contains("skill 56.0/80.0"));
        assert!(rendered.contains("Rejected catalog entries"));
        assert!(rendered.contains("- #1 opp-missing-fields"));
    }

    #[test]
    fn empty_result_is_called_out() {
        let mut report = sample_report();
        report.results.clear();
        report.rejected.clear();

        let rendered = render_report(&report);
        assert!(rendered.contains("No opportunities matched"));
        assert!(!rendered.contains("Rejected"));
    }
}
