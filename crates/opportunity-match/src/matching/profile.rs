use std::collections::BTreeMap;

use tracing::debug;

use super::domain::{
    Availability, Credential, CredentialTier, Profile, ProfileId, RawCredential, RawProfile,
    SkillId,
};
use super::error::ValidationError;

const MIN_SKILL_SCORE: i64 = 0;
const MAX_SKILL_SCORE: i64 = 100;

/// Produces canonical `Profile` instances from dashboard payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileAccessor;

impl ProfileAccessor {
    /// Like [`ProfileAccessor::normalize`] but starting from untyped JSON, so a wrongly typed
    /// field is reported as [`ValidationError::Malformed`].
    pub fn normalize_json(value: serde_json::Value) -> Result<Profile, ValidationError> {
        let raw = serde_json::from_value::<RawProfile>(value).map_err(|err| {
            ValidationError::Malformed {
                reason: err.to_string(),
            }
        })?;
        Self::normalize(raw)
    }

    /// Validate and normalize a raw profile.
    ///
    /// Skill scores outside `0..=100` are clamped to the nearest bound; every other defect is
    /// reported as a [`ValidationError`].
    pub fn normalize(raw: RawProfile) -> Result<Profile, ValidationError> {
        let id = required_text(raw.id, "id")?;

        let proficiency_level = match raw.proficiency_level {
            None => {
                return Err(ValidationError::MissingField {
                    field: "proficiency_level",
                })
            }
            Some(found) if found < 0 => {
                return Err(ValidationError::NegativeProficiency { found })
            }
            Some(found) => u32::try_from(found)
                .map_err(|_| ValidationError::ProficiencyOutOfRange { found })?,
        };

        let location_tag = required_text(raw.location_tag, "location_tag")?;

        let availability_label = required_text(raw.availability, "availability")?;
        let availability = Availability::from_label(&availability_label).ok_or(
            ValidationError::UnknownValue {
                field: "availability",
                value: availability_label,
            },
        )?;

        let mut skills = BTreeMap::new();
        for entry in raw.skills.0 {
            if entry.skill.trim().is_empty() {
                return Err(ValidationError::BlankField { field: "skills" });
            }
            let skill = SkillId::normalized(&entry.skill);
            let score = clamp_skill_score(&skill, entry.score);
            if skills.insert(skill.clone(), score).is_some() {
                return Err(ValidationError::DuplicateSkill { skill: skill.0 });
            }
        }

        let completed_credentials = raw
            .completed_credentials
            .into_iter()
            .map(normalize_credential)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Profile {
            id: ProfileId(id),
            skills,
            completed_credentials,
            proficiency_level,
            location_tag,
            availability,
        })
    }
}

fn clamp_skill_score(skill: &SkillId, score: i64) -> u8 {
    let clamped = score.clamp(MIN_SKILL_SCORE, MAX_SKILL_SCORE);
    if clamped != score {
        debug!(skill = %skill.0, score, clamped, "clamped out-of-range skill score");
    }
    clamped as u8
}

fn normalize_credential(raw: RawCredential) -> Result<Credential, ValidationError> {
    let id = required_text(raw.id, "completed_credentials.id")?;
    let category = required_text(raw.category, "completed_credentials.category")?;
    let tier_label = required_text(raw.tier, "completed_credentials.tier")?;
    let tier = CredentialTier::from_label(&tier_label).ok_or(ValidationError::UnknownValue {
        field: "completed_credentials.tier",
        value: tier_label,
    })?;

    Ok(Credential { id, category, tier })
}

/// Trimmed value of a mandatory text field.
pub(crate) fn required_text(
    value: Option<String>,
    field: &'static str,
) -> Result<String, ValidationError> {
    let value = value.ok_or(ValidationError::MissingField { field })?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankField { field });
    }
    Ok(trimmed.to_string())
}
