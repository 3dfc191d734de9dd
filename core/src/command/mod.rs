//! Per-invocation command context.
//!
//! One [`CommandSession`] exists per invocation of the flow-valve command. It
//! owns the editable spec, reads dialog inputs into it, and hands the frozen
//! parameters to a construction service. Dropping the session ends the
//! invocation; nothing outlives it.

pub mod inputs;
pub mod session;


pub use inputs::{dialog_fields, DialogField, DialogInput, InputId, Readouts};
pub use session::{CommandSession, SessionState};

use crate::construction::ConstructionError;
use crate::params::ParameterError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CommandError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error("Unknown command input '{0}'")]
    UnknownInput(String),

    #[error("Input '{0}' is read-only")]
    ReadOnlyInput(InputId),

    #[error("Command already executed; parameters are frozen")]
    Frozen,

    #[error("Invalid inputs must be corrected first: {}", join_ids(.0))]
    PendingErrors(Vec<InputId>),
}

fn join_ids(ids: &[InputId]) -> String {
    ids.iter().map(InputId::as_str).collect::<Vec<_>>().join(", ")
}

impl CommandError {
    /// Stable code reported to hosts alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Parameter(ParameterError::DegenerateAngle { .. }) => "DEGENERATE_ANGLE",
            Self::Parameter(ParameterError::InvalidDimension { .. }) => "INVALID_DIMENSION",
            Self::Construction(_) => "CONSTRUCTION_FAILED",
            Self::UnknownInput(_) => "UNKNOWN_INPUT",
            Self::ReadOnlyInput(_) => "READ_ONLY_INPUT",
            Self::Frozen => "FROZEN",
            Self::PendingErrors(_) => "PENDING_ERRORS",
        }
    }
}

pub type CommandResult<T> = Result<T, CommandError>;
