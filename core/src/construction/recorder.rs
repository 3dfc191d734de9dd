use super::{ConstructionError, ConstructionResult, ConstructionService, ConstructionStep};

/// Construction service that only records what it was asked to build.
///
/// Used for previews, where no kernel is attached, and in tests. It can be
/// set up to reject one step by label.
#[derive(Debug, Default, Clone)]
pub struct RecordingService {
    pub applied: Vec<ConstructionStep>,
    fail_at: Option<String>,
}

impl RecordingService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(label: &str) -> Self {
        Self {
            applied: Vec::new(),
            fail_at: Some(label.to_string()),
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.applied.iter().map(ConstructionStep::label).collect()
    }
}

impl ConstructionService for RecordingService {
    fn apply(&mut self, step: &ConstructionStep) -> ConstructionResult<()> {
        if self.fail_at.as_deref() == Some(step.label()) {
            return Err(ConstructionError::Rejected(format!(
                "zero-area profile in {}",
                step.label()
            )));
        }
        self.applied.push(step.clone());
        Ok(())
    }
}
