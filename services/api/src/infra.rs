use metrics_exporter_prometheus::PrometheusHandle;
use opportunity_match::error::AppError;
use opportunity_match::matching::OpportunityCategory;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Catalog export on disk: either a bare array of records or a versioned envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CatalogFile {
    Versioned {
        #[serde(default)]
        version: Option<String>,
        opportunities: Vec<Value>,
    },
    Records(Vec<Value>),
}

impl CatalogFile {
    pub(crate) fn into_parts(self) -> (Option<String>, Vec<Value>) {
        match self {
            CatalogFile::Versioned {
                version,
                opportunities,
            } => (version, opportunities),
            CatalogFile::Records(records) => (None, records),
        }
    }
}

pub(crate) fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let file = File::open(path)?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(value)
}

pub(crate) fn parse_category(raw: &str) -> Result<OpportunityCategory, String> {
    OpportunityCategory::from_label(raw).ok_or_else(|| {
        format!(
            "unknown category '{raw}' (expected production, mixing, mastering, composition, \
             sound-design, or business)"
        )
    })
}
