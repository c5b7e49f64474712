use super::weights::MatchFactor;

/// Malformed profile or opportunity input. Never repaired silently, with the exception of the
/// skill-score clamp applied during profile normalization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },
    #[error("field `{field}` must not be blank")]
    BlankField { field: &'static str },
    #[error("skill `{skill}` is listed more than once")]
    DuplicateSkill { skill: String },
    #[error("proficiency level must be non-negative (found {found})")]
    NegativeProficiency { found: i64 },
    #[error("proficiency level {found} is out of range")]
    ProficiencyOutOfRange { found: i64 },
    #[error("unknown value `{value}` for `{field}`")]
    UnknownValue { field: &'static str, value: String },
    #[error("deadline `{value}` is not a YYYY-MM-DD date")]
    InvalidDeadline { value: String },
    #[error("opportunity `{id}` appears more than once in the catalog")]
    DuplicateOpportunity { id: String },
    #[error("malformed record: {reason}")]
    Malformed { reason: String },
}

/// Internal invariant violation while scoring; points at a weight configuration defect.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("{factor} factor produced a negative pool ({pool})")]
    NegativePool { factor: MatchFactor, pool: f64 },
    #[error("{factor} factor earned a negative amount ({earned})")]
    NegativeEarned { factor: MatchFactor, earned: f64 },
    #[error("{factor} factor produced a non-finite value")]
    NonFinite { factor: MatchFactor },
}

/// Static weight table rejected at initialization.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("{factor} weight must be a finite, non-negative number (found {value})")]
    InvalidWeight { factor: MatchFactor, value: f64 },
    #[error("factor weights must sum to {expected} (found {actual})")]
    WeightTotal { expected: f64, actual: f64 },
}
