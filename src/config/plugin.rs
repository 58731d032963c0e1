use serde::{Deserialize, Serialize};

/// Reaction to a programmer error detected by the wrapper
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FaultAttitude {
    #[default]
    /// Log with a backtrace, then panic
    FastFault,
    /// Log and hand the violation back to the caller as an error
    ///
    /// The operation continues on its best-effort path, which may leave
    /// a dangling per-instance object behind
    Ignore,
}
