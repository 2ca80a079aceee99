//! Reporting sinks for non-fatal failures.

use std::sync::{Arc, Mutex};

use stookwijzer_common::{StookwijzerError, StookwijzerResult};
use tracing::{debug, error, warn};

/// Receives every failure the client swallows.
pub trait Reporter: Send + Sync {
    fn report(&self, error: &StookwijzerError);
}

/// Emits failures as tracing events. Lost responses log at error level, a
/// single missing property at warn.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, err: &StookwijzerError) {
        match err {
            StookwijzerError::Timeout(_) => {
                error!(kind = err.kind(), error = %err, "Timeout getting Stookwijzer data")
            }
            StookwijzerError::Network(_) => {
                error!(kind = err.kind(), error = %err, "Error getting Stookwijzer data")
            }
            StookwijzerError::MalformedResponse(_) => {
                error!(kind = err.kind(), error = %err, "Received invalid response from Stookwijzer")
            }
            StookwijzerError::PropertyUnavailable(_) => {
                warn!(kind = err.kind(), error = %err, "Property not available")
            }
            StookwijzerError::InvalidConfig(_) => {
                debug!(kind = err.kind(), error = %err, "Configuration problem")
            }
        }
    }
}

/// Unwrap a field read, handing a failure to `reporter`.
pub(crate) fn reported<T>(result: StookwijzerResult<T>, reporter: &dyn Reporter) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            reporter.report(&err);
            None
        }
    }
}

/// Collects failures in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryReporter {
    errors: Arc<Mutex<Vec<StookwijzerError>>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything reported so far.
    pub fn errors(&self) -> Vec<StookwijzerError> {
        match self.errors.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, error: &StookwijzerError) {
        match self.errors.lock() {
            Ok(mut guard) => guard.push(error.clone()),
            Err(poisoned) => poisoned.into_inner().push(error.clone()),
        }
    }
}
