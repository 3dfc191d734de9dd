use super::inputs::{dialog_fields, DialogField, DialogInput, InputId, Readouts};
use super::{CommandError, CommandResult};
use crate::construction::{ConstructionPlan, ConstructionService};
use crate::geometry::GeometryParameters;
use crate::params::{FlowValveDefaults, FlowValveSpec, ParameterError};
use crate::units::AngleUnit;
use std::collections::BTreeMap;
use tracing::{info, warn};
use uuid::Uuid;

/// Editable until executed, then frozen for good.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Editable(FlowValveSpec),
    Frozen(GeometryParameters),
}

#[derive(Debug)]
pub struct CommandSession {
    id: Uuid,
    state: SessionState,
    /// Last rejection per input, cleared once that input is accepted again.
    pending: BTreeMap<InputId, ParameterError>,
}

impl CommandSession {
    pub fn new(defaults: &FlowValveDefaults) -> CommandResult<Self> {
        Ok(Self::with_spec(FlowValveSpec::from_defaults(defaults)?))
    }

    pub fn with_spec(spec: FlowValveSpec) -> Self {
        let id = Uuid::new_v4();
        info!("Command session {} started", id);
        Self {
            id,
            state: SessionState::Editable(spec),
            pending: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self.state, SessionState::Frozen(_))
    }

    pub fn spec(&self) -> Option<&FlowValveSpec> {
        match &self.state {
            SessionState::Editable(spec) => Some(spec),
            SessionState::Frozen(_) => None,
        }
    }

    pub fn parameters(&self) -> Option<&GeometryParameters> {
        match &self.state {
            SessionState::Frozen(params) => Some(params),
            SessionState::Editable(_) => None,
        }
    }

    pub fn pending_errors(&self) -> &BTreeMap<InputId, ParameterError> {
        &self.pending
    }

    /// Route one dialog value to its setter.
    ///
    /// A rejected value leaves the spec as it was and is remembered until the
    /// same input is set to something valid.
    pub fn apply_input(&mut self, input: DialogInput) -> CommandResult<()> {
        let spec = match &mut self.state {
            SessionState::Editable(spec) => spec,
            SessionState::Frozen(_) => {
                warn!("Session {} ignored {} after execute", self.id, input.id);
                return Err(CommandError::Frozen);
            }
        };

        let result = match input.id {
            InputId::Theta => spec.set_angle(AngleUnit::Degrees.to_radians(input.value)),
            InputId::MainDiameter => spec.set_main_diameter(input.value),
            InputId::Length => spec.set_length(input.value),
            InputId::HoleRadius => spec.set_hole_radius(input.value),
            InputId::HoleCount => spec.set_hole_count(input.value),
            InputId::TransducerDistance | InputId::WallThickness => {
                return Err(CommandError::ReadOnlyInput(input.id));
            }
        };

        match result {
            Ok(()) => {
                self.pending.remove(&input.id);
                Ok(())
            }
            Err(e) => {
                self.pending.insert(input.id, e.clone());
                Err(e.into())
            }
        }
    }

    /// Apply a batch in dialog order (angle, diameter, length, hole radius,
    /// hole count) regardless of arrival order. Every input is attempted;
    /// the rejections are returned.
    pub fn apply_inputs<I>(&mut self, inputs: I) -> Vec<(InputId, CommandError)>
    where
        I: IntoIterator<Item = DialogInput>,
    {
        let mut inputs: Vec<DialogInput> = inputs.into_iter().collect();
        inputs.sort_by_key(|input| input.id);

        inputs
            .into_iter()
            .filter_map(|input| self.apply_input(input).err().map(|e| (input.id, e)))
            .collect()
    }

    pub fn readouts(&self) -> Readouts {
        match &self.state {
            SessionState::Editable(spec) => {
                Readouts::new(spec.transducer_distance(), spec.wall_thickness())
            }
            SessionState::Frozen(params) => {
                Readouts::new(params.transducer_distance, params.wall_thickness)
            }
        }
    }

    /// Dialog rows for the editable spec; empty once frozen.
    pub fn fields(&self) -> Vec<DialogField> {
        self.spec().map(dialog_fields).unwrap_or_default()
    }

    fn ensure_no_pending(&self) -> CommandResult<()> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(CommandError::PendingErrors(self.pending.keys().copied().collect()))
        }
    }

    /// Plan for the current values without freezing anything.
    pub fn preview(&self) -> CommandResult<ConstructionPlan> {
        let spec = self.spec().ok_or(CommandError::Frozen)?;
        self.ensure_no_pending()?;
        let params = spec.clone().into_construction_parameters()?;
        Ok(ConstructionPlan::from_parameters(&params))
    }

    /// Freeze the spec and build the valve through `service`.
    ///
    /// The session stays frozen even when the service fails part way; the
    /// parameters were already handed off.
    pub fn execute<S>(&mut self, service: &mut S) -> CommandResult<ConstructionPlan>
    where
        S: ConstructionService + ?Sized,
    {
        let spec = self.spec().ok_or(CommandError::Frozen)?;
        self.ensure_no_pending()?;
        let params = spec.clone().into_construction_parameters()?;
        let plan = ConstructionPlan::from_parameters(&params);

        self.state = SessionState::Frozen(params);
        info!("Session {} frozen, building {} components", self.id, plan.len());
        plan.execute(service)?;
        Ok(plan)
    }
}

impl Drop for CommandSession {
    fn drop(&mut self) {
        info!("Command session {} destroyed", self.id);
    }
}
