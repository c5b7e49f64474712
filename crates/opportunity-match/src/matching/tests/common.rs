use std::collections::{BTreeMap, BTreeSet};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::matching::domain::{
    Availability, Credential, CredentialTier, Difficulty, ExclusivityClass, LocationConstraint,
    Opportunity, OpportunityCategory, OpportunityId, Profile, ProfileId, RawCredential,
    RawLocationConstraint, RawOpportunity, RawProfile, RawSkills, SkillId,
};
use crate::matching::scoring::ScoringEngine;
use crate::matching::service::MatchingService;

pub(super) fn skill(name: &str) -> SkillId {
    SkillId::normalized(name)
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Member from the documented worked example: strong producer based in São Paulo.
pub(super) fn producer_profile() -> Profile {
    let mut skills = BTreeMap::new();
    skills.insert(skill("production"), 80);
    skills.insert(skill("mixing"), 60);

    Profile {
        id: ProfileId("member-042".to_string()),
        skills,
        completed_credentials: vec![Credential {
            id: "cred-beatmaking-101".to_string(),
            category: "production".to_string(),
            tier: CredentialTier::Member,
        }],
        proficiency_level: 6,
        location_tag: "SP".to_string(),
        availability: Availability::Open,
    }
}

pub(super) fn raw_producer_profile() -> RawProfile {
    RawProfile {
        id: Some("member-042".to_string()),
        skills: RawSkills::from_pairs([("production", 80), ("mixing", 60)]),
        completed_credentials: vec![RawCredential {
            id: Some("cred-beatmaking-101".to_string()),
            category: Some("production".to_string()),
            tier: Some("member".to_string()),
        }],
        proficiency_level: Some(6),
        location_tag: Some("SP".to_string()),
        availability: Some("open".to_string()),
    }
}

/// Opportunity from the documented worked example (expected score 83).
pub(super) fn studio_session() -> Opportunity {
    Opportunity {
        id: OpportunityId("opp-studio-session".to_string()),
        required_skills: [skill("production"), skill("mixing")].into_iter().collect(),
        required_credential_categories: ["production".to_string()].into_iter().collect(),
        minimum_difficulty: Difficulty::Intermediate,
        location: LocationConstraint {
            remote: false,
            region: Some("SP".to_string()),
        },
        exclusivity: ExclusivityClass::PlatformExclusive,
        deadline: Some(date(2026, 11, 30)),
        category: Some(OpportunityCategory::Production),
        metadata: BTreeMap::new(),
    }
}

/// Remote beginner listing with no skill or credential requirements.
pub(super) fn open_call(id: &str) -> Opportunity {
    Opportunity {
        id: OpportunityId(id.to_string()),
        required_skills: BTreeSet::new(),
        required_credential_categories: BTreeSet::new(),
        minimum_difficulty: Difficulty::Beginner,
        location: LocationConstraint {
            remote: true,
            region: None,
        },
        exclusivity: ExclusivityClass::External,
        deadline: None,
        category: None,
        metadata: BTreeMap::new(),
    }
}

pub(super) fn raw_studio_session() -> RawOpportunity {
    RawOpportunity {
        id: Some("opp-studio-session".to_string()),
        required_skills: vec!["production".to_string(), "mixing".to_string()],
        required_credential_categories: vec!["production".to_string()],
        minimum_difficulty: Some("intermediate".to_string()),
        location_constraint: Some(RawLocationConstraint {
            remote: false,
            region: Some("SP".to_string()),
        }),
        exclusivity_class: Some("platform-exclusive".to_string()),
        deadline: Some("2026-11-30".to_string()),
        category: Some("production".to_string()),
        metadata: BTreeMap::new(),
    }
}

pub(super) fn studio_session_json() -> Value {
    json!({
        "id": "opp-studio-session",
        "requiredSkills": ["production", "mixing"],
        "requiredCredentialCategories": ["production"],
        "minimumDifficulty": "intermediate",
        "locationConstraint": { "remote": false, "region": "SP" },
        "exclusivityClass": "platform-exclusive",
        "deadline": "2026-11-30",
        "category": "production",
        "metadata": { "title": "Studio session with label A&R" }
    })
}

pub(super) fn mixing_gig_json() -> Value {
    json!({
        "id": "opp-mixing-gig",
        "required_skills": ["mixing"],
        "minimum_difficulty": "advanced",
        "location_constraint": { "remote": true },
        "exclusivity_class": "external",
        "category": "mixing"
    })
}

pub(super) fn profile_json() -> Value {
    json!({
        "id": "member-042",
        "skills": { "production": 80, "mixing": 60 },
        "completedCredentials": [
            { "id": "cred-beatmaking-101", "category": "production", "tier": "member" }
        ],
        "proficiencyLevel": 6,
        "locationTag": "SP",
        "availability": "open"
    })
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::default()
}

pub(super) fn matching_service() -> MatchingService {
    MatchingService::with_engine(engine(), 16)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
