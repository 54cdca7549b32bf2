//! Cancellable execution context passed to every contract operation

use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Execution context threaded through capability-contract calls
///
/// The orchestration layer forwards it untouched; backends decide how to
/// honour cancellation and which timeouts apply.
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    token: CancellationToken,
}

impl OperationContext {
    /// Fresh, uncancelled context
    pub fn new() -> Self {
        Self::default()
    }

    /// Context driven by an existing token
    pub fn from_token(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Context cancelled together with this one, but cancellable on its own
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    /// Cancel this context and its children
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Underlying token, for `select!` against `cancelled()`
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Fail with `Error::Cancelled` when cancellation was requested
    pub fn ensure_active(&self, operation: &str) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::cancelled(operation))
        } else {
            Ok(())
        }
    }
}
