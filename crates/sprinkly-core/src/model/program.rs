// ── Program handle ──

use std::sync::Arc;

use tracing::{Instrument, Span, debug};

use sprinkly_api::DeviceClient;

use crate::error::CoreError;

/// A stored watering program, bound to its index on the device.
#[derive(Debug, Clone)]
pub struct Program {
    name: String,
    index: usize,
    api: Arc<DeviceClient>,
    span: Span,
}

impl Program {
    pub(crate) fn new(name: String, index: usize, api: Arc<DeviceClient>, span: Span) -> Self {
        Self {
            name,
            index,
            api,
            span,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Start the program now, without water-level scaling.
    pub async fn activate(&self) -> Result<(), CoreError> {
        async {
            debug!(program = self.index, name = %self.name, "activating program");
            self.api.run_program(self.index, false).await?;
            Ok(())
        }
        .instrument(self.span.clone())
        .await
    }
}
