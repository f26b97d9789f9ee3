use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_STEP_ID: AtomicU64 = AtomicU64::new(0);

/// Runtime identity of a pipeline step. Ids are minted from a process-wide counter, so
/// an id is never handed out twice, including after the step that held it is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StepId(u64);

impl StepId {
    pub fn mint() -> Self {
        Self(NEXT_STEP_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        raw.strip_prefix("step-")
            .and_then(|value| value.parse::<u64>().ok())
            .map(Self)
            .ok_or_else(|| format!("step id must look like `step-<n>`, got `{raw}`"))
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "step-{}", self.0)
    }
}
