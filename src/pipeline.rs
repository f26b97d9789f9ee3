use crate::catalog::Catalog;
use crate::operations::OperationConfig;
pub use crate::shared::ids::StepId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineStep {
    id: StepId,
    operation_id: String,
    config: OperationConfig,
}

impl PipelineStep {
    pub(crate) fn new(operation_id: impl Into<String>, config: OperationConfig) -> Self {
        Self {
            id: StepId::mint(),
            operation_id: operation_id.into(),
            config,
        }
    }

    pub fn id(&self) -> StepId {
        self.id
    }

    /// The referenced operation is resolved against a catalog each time the step runs.
    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    pub fn config(&self) -> &OperationConfig {
        &self.config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

impl MoveDirection {
    pub fn from_offset(offset: i32) -> Option<Self> {
        match offset {
            -1 => Some(Self::Up),
            1 => Some(Self::Down),
            _ => None,
        }
    }
}

/// Ordered list of steps. Every editing operation returns a new pipeline and leaves
/// the receiver untouched; edits naming an unknown step are no-ops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    steps: Vec<PipelineStep>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_steps(steps: Vec<PipelineStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, step_id: StepId) -> Option<&PipelineStep> {
        self.steps.iter().find(|step| step.id == step_id)
    }

    pub fn position(&self, step_id: StepId) -> Option<usize> {
        self.steps.iter().position(|step| step.id == step_id)
    }

    pub fn add_step(&self, catalog: &Catalog, operation_id: &str) -> Self {
        let Some(operation) = catalog.lookup(operation_id) else {
            log::debug!("ignoring add of unknown operation `{operation_id}`");
            return self.clone();
        };
        let mut steps = self.steps.clone();
        steps.push(PipelineStep::new(operation.id, operation.default_config()));
        Self { steps }
    }

    pub fn remove_step(&self, step_id: StepId) -> Self {
        Self {
            steps: self
                .steps
                .iter()
                .filter(|step| step.id != step_id)
                .cloned()
                .collect(),
        }
    }

    /// Swaps the step with its neighbour. Moving past either end is a no-op.
    pub fn move_step(&self, step_id: StepId, direction: MoveDirection) -> Self {
        let Some(index) = self.position(step_id) else {
            return self.clone();
        };
        let target = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => Some(index + 1).filter(|target| *target < self.steps.len()),
        };
        let Some(target) = target else {
            return self.clone();
        };
        let mut steps = self.steps.clone();
        steps.swap(index, target);
        Self { steps }
    }

    /// Replaces the step's config wholesale. The config is not checked against the
    /// operation here; a mismatch surfaces when the step runs.
    pub fn update_step_config(&self, step_id: StepId, config: OperationConfig) -> Self {
        Self {
            steps: self
                .steps
                .iter()
                .map(|step| {
                    if step.id == step_id {
                        PipelineStep {
                            config,
                            ..step.clone()
                        }
                    } else {
                        step.clone()
                    }
                })
                .collect(),
        }
    }

    pub fn clear(&self) -> Self {
        Self::default()
    }
}
