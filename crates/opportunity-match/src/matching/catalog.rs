use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{
    Difficulty, ExclusivityClass, LocationConstraint, Opportunity, OpportunityCategory,
    OpportunityId, RawOpportunity, SkillId,
};
use super::error::ValidationError;
use super::profile::required_text;

/// Immutable, duplicate-free sequence of opportunities for one ranking call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpportunityCatalog {
    version: Option<String>,
    opportunities: Vec<Opportunity>,
}

/// Catalog entry that failed validation, reported next to the ranked subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedOpportunity {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opportunity_id: Option<String>,
    pub error: String,
    #[serde(skip)]
    pub cause: ValidationError,
}

/// Outcome of loading raw records: the valid catalog plus per-item rejections.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogLoad {
    pub catalog: OpportunityCatalog,
    pub rejected: Vec<RejectedOpportunity>,
}

impl OpportunityCatalog {
    /// Build a catalog from already validated opportunities.
    pub fn new(
        version: Option<String>,
        opportunities: Vec<Opportunity>,
    ) -> Result<Self, ValidationError> {
        let mut seen = HashSet::with_capacity(opportunities.len());
        for opportunity in &opportunities {
            if !seen.insert(opportunity.id.clone()) {
                return Err(ValidationError::DuplicateOpportunity {
                    id: opportunity.id.0.clone(),
                });
            }
        }
        Ok(Self {
            version,
            opportunities,
        })
    }

    /// Validate raw records one by one. Malformed records and repeated ids are rejected
    /// individually; the first occurrence of an id wins.
    pub fn load(version: Option<String>, records: Vec<RawOpportunity>) -> CatalogLoad {
        let mut rejected = Vec::new();
        let mut opportunities = Vec::with_capacity(records.len());
        let mut seen = HashSet::with_capacity(records.len());

        for (index, record) in records.into_iter().enumerate() {
            let raw_id = record.id.as_ref().map(|id| id.trim().to_string());
            match normalize_opportunity(record) {
                Ok(opportunity) => {
                    if seen.insert(opportunity.id.clone()) {
                        opportunities.push(opportunity);
                    } else {
                        rejected.push(RejectedOpportunity::new(
                            index,
                            raw_id,
                            ValidationError::DuplicateOpportunity {
                                id: opportunity.id.0,
                            },
                        ));
                    }
                }
                Err(error) => rejected.push(RejectedOpportunity::new(index, raw_id, error)),
            }
        }

        CatalogLoad {
            catalog: Self {
                version,
                opportunities,
            },
            rejected,
        }
    }

    /// Like [`OpportunityCatalog::load`] but starting from untyped JSON, so a record with a
    /// wrongly typed field is rejected alone instead of failing the whole payload.
    pub fn load_json(version: Option<String>, records: Vec<serde_json::Value>) -> CatalogLoad {
        let mut parsed = Vec::with_capacity(records.len());
        let mut shape_errors = Vec::new();

        for (index, value) in records.into_iter().enumerate() {
            let raw_id = value
                .get("id")
                .and_then(serde_json::Value::as_str)
                .map(|id| id.trim().to_string());
            match serde_json::from_value::<RawOpportunity>(value) {
                Ok(record) => parsed.push((index, record)),
                Err(err) => shape_errors.push(RejectedOpportunity::new(
                    index,
                    raw_id,
                    ValidationError::Malformed {
                        reason: err.to_string(),
                    },
                )),
            }
        }

        let (indices, records): (Vec<usize>, Vec<RawOpportunity>) = parsed.into_iter().unzip();
        let mut load = Self::load(version, records);
        for rejection in &mut load.rejected {
            rejection.index = indices[rejection.index];
        }
        load.rejected.extend(shape_errors);
        load.rejected.sort_by_key(|rejection| rejection.index);
        load
    }

    pub fn list(&self) -> &[Opportunity] {
        &self.opportunities
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn len(&self) -> usize {
        self.opportunities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opportunities.is_empty()
    }
}

impl RejectedOpportunity {
    fn new(index: usize, opportunity_id: Option<String>, cause: ValidationError) -> Self {
        Self {
            index,
            opportunity_id: opportunity_id.filter(|id| !id.is_empty()),
            error: cause.to_string(),
            cause,
        }
    }
}

/// Validate a single raw record into a catalog entry.
pub fn normalize_opportunity(raw: RawOpportunity) -> Result<Opportunity, ValidationError> {
    let id = required_text(raw.id, "id")?;

    let mut required_skills = BTreeSet::new();
    for skill in &raw.required_skills {
        if skill.trim().is_empty() {
            return Err(ValidationError::BlankField {
                field: "required_skills",
            });
        }
        required_skills.insert(SkillId::normalized(skill));
    }

    let mut required_credential_categories = BTreeSet::new();
    for category in &raw.required_credential_categories {
        let category = category.trim();
        if category.is_empty() {
            return Err(ValidationError::BlankField {
                field: "required_credential_categories",
            });
        }
        required_credential_categories.insert(category.to_lowercase());
    }

    let difficulty_label = required_text(raw.minimum_difficulty, "minimum_difficulty")?;
    let minimum_difficulty =
        Difficulty::from_label(&difficulty_label).ok_or(ValidationError::UnknownValue {
            field: "minimum_difficulty",
            value: difficulty_label,
        })?;

    let location = raw
        .location_constraint
        .map(|constraint| LocationConstraint {
            remote: constraint.remote,
            region: constraint
                .region
                .map(|region| region.trim().to_string())
                .filter(|region| !region.is_empty()),
        })
        .ok_or(ValidationError::MissingField {
            field: "location_constraint",
        })?;

    let exclusivity_label = required_text(raw.exclusivity_class, "exclusivity_class")?;
    let exclusivity =
        ExclusivityClass::from_label(&exclusivity_label).ok_or(ValidationError::UnknownValue {
            field: "exclusivity_class",
            value: exclusivity_label,
        })?;

    let deadline = match raw.deadline {
        Some(value) if !value.trim().is_empty() => Some(
            NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
                .map_err(|_| ValidationError::InvalidDeadline { value })?,
        ),
        _ => None,
    };

    let category = match raw.category {
        Some(value) if !value.trim().is_empty() => Some(
            OpportunityCategory::from_label(&value).ok_or(ValidationError::UnknownValue {
                field: "category",
                value,
            })?,
        ),
        _ => None,
    };

    Ok(Opportunity {
        id: OpportunityId(id),
        required_skills,
        required_credential_categories,
        minimum_difficulty,
        location,
        exclusivity,
        deadline,
        category,
        metadata: raw.metadata,
    })
}
