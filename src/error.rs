use std::io;

use pp_ffi::{PpInstance, PpResource};

pub type PpResult<T> = Result<T, PpError>;

#[derive(Debug, thiserror::Error)]
pub enum PpError {
    #[error("invariant violated: {0}")]
    Violation(#[from] Violation),
    #[error("instance {0:?} failed to initialize")]
    InitializeFail(PpInstance),
    #[error("instance {0:?} already exists")]
    InstanceExists(PpInstance),
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Programmer errors. These are never expected at runtime; how they
/// surface is decided by [`FaultAttitude`](crate::config::FaultAttitude).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("an object for interface `{name}` is already registered")]
    DoubleRegistration { name: String },
    #[error("no object is registered for interface `{name}`")]
    UnregisterMissing { name: String },
    #[error("object removed for interface `{name}` is not the registered one")]
    ObjectMismatch { name: String },
    #[error("resource already holds {held:?}, cannot adopt {incoming:?}")]
    AdoptIntoNonNull {
        held: PpResource,
        incoming: PpResource,
    },
    #[error("instance {instance:?} destroyed with per-instance objects still registered: {names:?}")]
    LeakedPerInstanceObjects {
        instance: PpInstance,
        names: Vec<String>,
    },
}

impl PpError {
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Self::Violation(v) => Some(v),
            _ => None,
        }
    }
}
