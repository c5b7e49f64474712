use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier wrapper for member profiles.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub String);

/// Identifier wrapper for catalog entries; unique within one catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OpportunityId(pub String);

/// Skill key, stored trimmed and lowercased so profile and requirement lookups agree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SkillId(pub String);

impl SkillId {
    pub fn normalized(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }
}

impl fmt::Display for OpportunityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Canonical scoring representation produced by the profile accessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    /// Scores are always within `0..=100`.
    pub skills: BTreeMap<SkillId, u8>,
    pub completed_credentials: Vec<Credential>,
    pub proficiency_level: u32,
    pub location_tag: String,
    pub availability: Availability,
}

impl Profile {
    pub fn skill_score(&self, skill: &SkillId) -> u8 {
        self.skills.get(skill).copied().unwrap_or(0)
    }
}

/// Completed credential (course certificate, program badge) held by a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub id: String,
    pub category: String,
    pub tier: CredentialTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialTier {
    Free,
    Member,
    Premium,
}

impl CredentialTier {
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "free" => Some(Self::Free),
            "member" | "basic" => Some(Self::Member),
            "premium" | "pro" => Some(Self::Premium),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    Open,
    Limited,
    Unavailable,
}

impl Availability {
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" | "available" => Some(Self::Open),
            "limited" | "part-time" | "part_time" => Some(Self::Limited),
            "unavailable" => Some(Self::Unavailable),
            _ => None,
        }
    }
}

/// Minimum experience an opportunity expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }

    /// Proficiency level at which the level factor is fully earned.
    pub const fn threshold(self) -> u32 {
        match self {
            Difficulty::Beginner => 3,
            Difficulty::Intermediate => 6,
            Difficulty::Advanced => 9,
        }
    }
}

/// Distinguishes platform-native opportunities from externally sourced ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExclusivityClass {
    PlatformExclusive,
    External,
}

impl ExclusivityClass {
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "platform-exclusive" | "platform_exclusive" | "exclusive" => {
                Some(Self::PlatformExclusive)
            }
            "external" => Some(Self::External),
            _ => None,
        }
    }

    /// Ranking tie-break position; lower sorts first.
    pub const fn precedence(self) -> u8 {
        match self {
            ExclusivityClass::PlatformExclusive => 0,
            ExclusivityClass::External => 1,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ExclusivityClass::PlatformExclusive => "platform exclusive",
            ExclusivityClass::External => "external",
        }
    }
}

/// Closed classification used for category filters and dashboard badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpportunityCategory {
    Production,
    Mixing,
    Mastering,
    Composition,
    SoundDesign,
    Business,
}

impl OpportunityCategory {
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" => Some(Self::Production),
            "mixing" => Some(Self::Mixing),
            "mastering" => Some(Self::Mastering),
            "composition" => Some(Self::Composition),
            "sound-design" | "sound_design" | "sound design" => Some(Self::SoundDesign),
            "business" => Some(Self::Business),
            _ => None,
        }
    }

    pub const fn badge(self) -> &'static str {
        match self {
            OpportunityCategory::Production => "Production",
            OpportunityCategory::Mixing => "Mixing",
            OpportunityCategory::Mastering => "Mastering",
            OpportunityCategory::Composition => "Composition",
            OpportunityCategory::SoundDesign => "Sound Design",
            OpportunityCategory::Business => "Music Business",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationConstraint {
    pub remote: bool,
    pub region: Option<String>,
}

/// Validated catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: OpportunityId,
    pub required_skills: BTreeSet<SkillId>,
    pub required_credential_categories: BTreeSet<String>,
    pub minimum_difficulty: Difficulty,
    pub location: LocationConstraint,
    pub exclusivity: ExclusivityClass,
    pub deadline: Option<NaiveDate>,
    pub category: Option<OpportunityCategory>,
    /// Display-only payload, never read by scoring.
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Profile payload as supplied by the member dashboard, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub skills: RawSkills,
    #[serde(default, alias = "completedCredentials")]
    pub completed_credentials: Vec<RawCredential>,
    #[serde(default, alias = "proficiencyLevel")]
    pub proficiency_level: Option<i64>,
    #[serde(default, alias = "locationTag")]
    pub location_tag: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSkill {
    #[serde(alias = "id")]
    pub skill: String,
    pub score: i64,
}

/// Skill entries in input order. Accepts either a list of `{skill, score}` objects or a JSON
/// object keyed by skill; repeated keys are kept so normalization can reject them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RawSkills(pub Vec<RawSkill>);

impl RawSkills {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, i64)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(skill, score)| RawSkill {
                    skill: skill.to_string(),
                    score,
                })
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for RawSkills {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RawSkillsVisitor;

        impl<'de> Visitor<'de> for RawSkillsVisitor {
            type Value = RawSkills;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of skill to score or a list of {skill, score} entries")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut entries = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(entry) = seq.next_element::<RawSkill>()? {
                    entries.push(entry);
                }
                Ok(RawSkills(entries))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((skill, score)) = map.next_entry::<String, i64>()? {
                    entries.push(RawSkill { skill, score });
                }
                Ok(RawSkills(entries))
            }
        }

        deserializer.deserialize_any(RawSkillsVisitor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCredential {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
}

/// Catalog record as handed over by the opportunity store, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawOpportunity {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "requiredSkills")]
    pub required_skills: Vec<String>,
    #[serde(default, alias = "requiredCredentialCategories")]
    pub required_credential_categories: Vec<String>,
    #[serde(default, alias = "minimumDifficulty")]
    pub minimum_difficulty: Option<String>,
    #[serde(default, alias = "locationConstraint")]
    pub location_constraint: Option<RawLocationConstraint>,
    #[serde(default, alias = "exclusivityClass")]
    pub exclusivity_class: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLocationConstraint {
    #[serde(default)]
    pub remote: bool,
    #[serde(default)]
    pub region: Option<String>,
}
