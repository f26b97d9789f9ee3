use crate::catalog::Catalog;
use crate::pipeline::{Pipeline, StepId};
use std::collections::BTreeMap;

/// Outcome of one step in one run. Steps that were never reached have no state at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionState {
    Output(String),
    Error(String),
}

impl ExecutionState {
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Output(output) => Some(output),
            Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Output(_) => None,
            Self::Error(error) => Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub output: String,
    pub trace: BTreeMap<StepId, ExecutionState>,
}

impl RunReport {
    pub fn state(&self, step_id: StepId) -> Option<&ExecutionState> {
        self.trace.get(&step_id)
    }

    pub fn failed_step(&self) -> Option<StepId> {
        self.trace
            .iter()
            .find(|(_, state)| state.is_error())
            .map(|(step_id, _)| *step_id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionLimits {
    /// Upper bound on the text handed to any single step. Unbounded when `None`.
    pub max_input_bytes: Option<usize>,
}

pub fn run_pipeline(catalog: &Catalog, input: &str, pipeline: &Pipeline) -> RunReport {
    run_pipeline_with_limits(catalog, input, pipeline, ExecutionLimits::default())
}

/// Feeds `input` through each step in order and stops at the first failure. Output
/// produced before the failure is kept as the final output; this call never fails.
pub fn run_pipeline_with_limits(
    catalog: &Catalog,
    input: &str,
    pipeline: &Pipeline,
    limits: ExecutionLimits,
) -> RunReport {
    let mut current = input.to_string();
    let mut trace = BTreeMap::new();

    for (index, step) in pipeline.steps().iter().enumerate() {
        let Some(operation) = catalog.lookup(step.operation_id()) else {
            let error = format!("unknown operation: {}", step.operation_id());
            log::warn!("step {} ({}) stopped the run: {error}", index + 1, step.id());
            trace.insert(step.id(), ExecutionState::Error(error));
            break;
        };

        if let Some(max) = limits.max_input_bytes.filter(|max| current.len() > *max) {
            let error = format!(
                "input of {} bytes exceeds limit of {max} bytes",
                current.len()
            );
            log::warn!("step {} ({}) stopped the run: {error}", index + 1, step.id());
            trace.insert(step.id(), ExecutionState::Error(error));
            break;
        }

        match operation.transform(&current, step.config()) {
            Ok(output) => {
                log::debug!(
                    "step {} ({}) `{}` produced {} bytes",
                    index + 1,
                    step.id(),
                    operation.id,
                    output.len()
                );
                current.clone_from(&output);
                trace.insert(step.id(), ExecutionState::Output(output));
            }
            Err(err) => {
                log::warn!("step {} ({}) `{}` failed: {err}", index + 1, step.id(), operation.id);
                trace.insert(step.id(), ExecutionState::Error(err.to_string()));
                break;
            }
        }
    }

    RunReport {
        output: current,
        trace,
    }
}
