use std::fmt;

use tracing::{error, info, warn};

use crate::{
    connectors::Release,
    errors::{ReleaseError, Stage},
};

/// LIFO stack of acquired handles.
///
/// Handles are released in reverse acquisition order. Anything still on the
/// stack when it is dropped is dropped in that same order.
#[derive(Default)]
pub struct ReleaseStack {
    handles: Vec<Box<dyn Release>>,
}

impl fmt::Debug for ReleaseStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseStack")
            .field("stages", &self.stages())
            .finish()
    }
}

impl ReleaseStack {
    pub fn push(&mut self, handle: Box<dyn Release>) {
        self.handles.push(handle);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Stages currently held, in acquisition order.
    pub fn stages(&self) -> Vec<Stage> {
        self.handles.iter().map(|handle| handle.stage()).collect()
    }

    /// Release every handle, newest first.
    ///
    /// A failing release does not stop the rest; all failures are returned
    /// together. On success the released stages come back in release order.
    pub async fn release_all(
        &mut self,
    ) -> Result<Vec<Stage>, Vec<ReleaseError>> {
        let mut released = Vec::with_capacity(self.handles.len());
        let mut failures = Vec::new();

        while let Some(handle) = self.handles.pop() {
            let stage = handle.stage();
            match handle.release().await {
                Ok(()) => {
                    info!(stage = %stage, "released connection");
                    released.push(stage);
                }
                Err(err) => {
                    error!(
                        stage = %stage,
                        error = %err.source,
                        "failed to release connection"
                    );
                    failures.push(err);
                }
            }
        }

        if failures.is_empty() {
            Ok(released)
        } else {
            Err(failures)
        }
    }
}

impl Drop for ReleaseStack {
    fn drop(&mut self) {
        while let Some(handle) = self.handles.pop() {
            warn!(
                stage = %handle.stage(),
                "dropping connection without orderly release"
            );
            drop(handle);
        }
    }
}
