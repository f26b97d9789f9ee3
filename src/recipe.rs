//! Portable recipe format for pipelines.
//!
//! Export always writes `{"version": 1, "steps": [{"operationId", "config"}]}`. Import also
//! accepts a bare array of steps and the legacy `{"pipeline": [...]}` shape. Step ids are
//! never part of the text; imported steps get freshly minted ids.

use crate::catalog::Catalog;
use crate::operations::OperationConfig;
use crate::pipeline::{Pipeline, PipelineStep};
use serde::Serialize;
use serde_json::Value;

pub const RECIPE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipe {
    pub version: u32,
    pub steps: Vec<RecipeStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeStep {
    pub operation_id: String,
    pub config: OperationConfig,
}

impl Recipe {
    pub fn from_pipeline(pipeline: &Pipeline) -> Self {
        Self {
            version: RECIPE_VERSION,
            steps: pipeline
                .steps()
                .iter()
                .map(|step| RecipeStep {
                    operation_id: step.operation_id().to_string(),
                    config: *step.config(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecipeError {
    #[error("recipe text is empty")]
    EmptyText,
    #[error("recipe is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no steps found")]
    NoSteps,
    #[error("step {position} is malformed")]
    MalformedStep { position: usize },
    #[error("step {position} uses unknown operation: {operation_id}")]
    UnknownOperation {
        position: usize,
        operation_id: String,
    },
    #[error("step {position} has invalid config for `{operation_id}`: {reason}")]
    InvalidConfig {
        position: usize,
        operation_id: String,
        reason: String,
    },
}

/// Two-space indented recipe text.
pub fn serialize_pipeline(pipeline: &Pipeline) -> String {
    // Every field is a string, an integer or a map of booleans with string keys, so
    // serde_json has no failing case to hit.
    serde_json::to_string_pretty(&Recipe::from_pipeline(pipeline))
        .expect("recipe serialization is infallible")
}

pub fn serialize_pipeline_compact(pipeline: &Pipeline) -> String {
    serde_json::to_string(&Recipe::from_pipeline(pipeline))
        .expect("recipe serialization is infallible")
}

/// Builds a pipeline from recipe text. Any bad step rejects the whole recipe.
pub fn deserialize_pipeline(catalog: &Catalog, text: &str) -> Result<Pipeline, RecipeError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(RecipeError::EmptyText);
    }
    let parsed: Value = serde_json::from_str(trimmed)?;
    if let Some(version) = parsed.get("version").and_then(Value::as_u64) {
        if version != u64::from(RECIPE_VERSION) {
            log::debug!("reading recipe version {version} with version {RECIPE_VERSION} rules");
        }
    }
    let raw_steps = locate_steps(&parsed).ok_or(RecipeError::NoSteps)?;

    let mut steps = Vec::with_capacity(raw_steps.len());
    for (index, entry) in raw_steps.iter().enumerate() {
        steps.push(import_step(catalog, index + 1, entry)?);
    }
    log::debug!("imported recipe with {} step(s)", steps.len());
    Ok(Pipeline::from_steps(steps))
}

fn locate_steps(parsed: &Value) -> Option<&Vec<Value>> {
    if let Value::Array(steps) = parsed {
        return Some(steps);
    }
    let object = parsed.as_object()?;
    ["steps", "pipeline"]
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_array))
}

fn import_step(
    catalog: &Catalog,
    position: usize,
    entry: &Value,
) -> Result<PipelineStep, RecipeError> {
    let entry = entry
        .as_object()
        .ok_or(RecipeError::MalformedStep { position })?;
    let operation_id = match entry.get("operationId") {
        Some(Value::String(id)) => id.clone(),
        Some(other) => other.to_string(),
        None => "<missing>".to_string(),
    };
    let operation =
        catalog
            .lookup(&operation_id)
            .ok_or_else(|| RecipeError::UnknownOperation {
                position,
                operation_id: operation_id.clone(),
            })?;

    let defaults = operation.default_config();
    let config = match entry.get("config") {
        None | Some(Value::Null) => defaults,
        Some(Value::Object(patch)) => {
            defaults
                .merged_with(patch)
                .map_err(|reason| RecipeError::InvalidConfig {
                    position,
                    operation_id: operation_id.clone(),
                    reason,
                })?
        }
        Some(other) => {
            log::warn!(
                "step {position} `{operation_id}` config `{other}` is not an object; using defaults"
            );
            defaults
        }
    };
    Ok(PipelineStep::new(operation.id, config))
}
