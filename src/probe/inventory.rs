//! Inventory document parsing and validity rules.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer};

use crate::probe::types::ProbeError;

/// Body of `GET /api/tags`.
#[derive(Debug, Clone, Deserialize)]
pub struct TagsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub models: Vec<ModelDescriptor>,
}

/// One entry in the inventory.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelDescriptor {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub modified_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// An explicit `null` decodes like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl ModelDescriptor {
    fn is_valid(&self, require_digest: bool) -> bool {
        if self.name.is_empty() {
            return false;
        }
        !require_digest || self.digest.as_deref().is_some_and(|d| !d.is_empty())
    }
}

/// Decode a 200 body and return the valid model names.
pub fn classify_body(body: &[u8], require_digest: bool) -> Result<Vec<String>, ProbeError> {
    let tags: TagsResponse =
        serde_json::from_slice(body).map_err(|e| ProbeError::InvalidFormat(e.to_string()))?;
    classify(tags, require_digest)
}

/// Apply the validity rules to a decoded inventory.
pub fn classify(tags: TagsResponse, require_digest: bool) -> Result<Vec<String>, ProbeError> {
    if tags.models.is_empty() {
        return Err(ProbeError::NoModels);
    }

    let names: Vec<String> = tags
        .models
        .into_iter()
        .filter(|m| m.is_valid(require_digest))
        .map(|m| m.name)
        .collect();

    if names.is_empty() {
        return Err(ProbeError::NoValidModels);
    }
    Ok(names)
}
