// ── Station handle ──

use std::sync::{Arc, Weak};

use tracing::{Instrument, Span, debug};

use sprinkly_api::DeviceClient;

use crate::controller::ControllerInner;
use crate::error::CoreError;
use crate::model::ProgramStatus;
use crate::store::Section;

/// Longest manual run the firmware accepts, in minutes (18 h).
pub const MAX_RUN_MINUTES: u32 = 1080;

/// One irrigation zone, bound to its index on the device.
///
/// Handles are cheap views created by [`Controller::stations`]. Reads go
/// through the controller's shared cache; commands go straight to the
/// device. A handle does not keep its controller alive.
///
/// [`Controller::stations`]: crate::Controller::stations
#[derive(Debug, Clone)]
pub struct Station {
    name: String,
    index: usize,
    api: Arc<DeviceClient>,
    controller: Weak<ControllerInner>,
    span: Span,
}

impl Station {
    pub(crate) fn new(
        name: String,
        index: usize,
        api: Arc<DeviceClient>,
        controller: Weak<ControllerInner>,
        span: Span,
    ) -> Self {
        Self {
            name,
            index,
            api,
            controller,
            span,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 0-based position on the device.
    pub fn index(&self) -> usize {
        self.index
    }

    fn controller(&self) -> Result<Arc<ControllerInner>, CoreError> {
        self.controller
            .upgrade()
            .ok_or(CoreError::ControllerDisconnected)
    }

    /// Whether the station is currently watering (`status.sn[index]`).
    pub async fn status(&self) -> Result<bool, CoreError> {
        let controller = self.controller()?;
        let index = self.index;
        let on: i64 = controller
            .read(Section::Status, "sn", |snap| {
                snap.element(Section::Status, "sn", index)
            })
            .await?;
        Ok(on != 0)
    }

    /// Program state of this station (`settings.ps[index]`).
    pub async fn program_status(&self) -> Result<ProgramStatus, CoreError> {
        let controller = self.controller()?;
        let index = self.index;
        controller
            .read(Section::Settings, "ps", |snap| {
                snap.element(Section::Settings, "ps", index)
            })
            .await
    }

    /// Run the station for `minutes` (1 to 1080).
    ///
    /// Always sends a request; repeated calls are not collapsed.
    pub async fn turn_on(&self, minutes: u32) -> Result<(), CoreError> {
        if !(1..=MAX_RUN_MINUTES).contains(&minutes) {
            return Err(CoreError::Validation {
                message: format!(
                    "run time must be between 1 and {MAX_RUN_MINUTES} minutes, got {minutes}"
                ),
            });
        }
        let secs = u64::from(minutes) * 60;
        async {
            debug!(station = self.index, secs, "turning station on");
            self.api.set_station(self.index, true, Some(secs)).await?;
            Ok(())
        }
        .instrument(self.span.clone())
        .await
    }

    pub async fn turn_off(&self) -> Result<(), CoreError> {
        async {
            debug!(station = self.index, "turning station off");
            self.api.set_station(self.index, false, None).await?;
            Ok(())
        }
        .instrument(self.span.clone())
        .await
    }
}
