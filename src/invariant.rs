use std::thread;

use tracing::error;

use crate::config::FaultAttitude;
use crate::error::{PpError, Violation};

/// Reports a programmer error. Under [`FaultAttitude::FastFault`] this never
/// returns; otherwise the violation comes back as an error for the caller to
/// propagate.
pub fn report(attitude: FaultAttitude, violation: Violation) -> PpError {
    match attitude {
        FaultAttitude::FastFault if !thread::panicking() => {
            error!(
                "{}\nstack backtrace:\n{:?}",
                violation,
                backtrace::Backtrace::new()
            );
            panic!("{violation}");
        }
        // a second panic while unwinding would abort the process
        FaultAttitude::FastFault | FaultAttitude::Ignore => {
            error!("{}", violation);
            PpError::Violation(violation)
        }
    }
}
