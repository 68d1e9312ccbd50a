// Device command endpoints
//
// Side-effecting calls. Nothing here touches cached state; the response
// body is only used to log rejected commands.

use tracing::debug;

use crate::device::client::DeviceClient;
use crate::error::Error;

impl DeviceClient {
    /// Switch a station on for `duration_secs`, or off.
    ///
    /// `GET /cm?sid={sid}&en={0|1}[&t={secs}]`
    pub async fn set_station(
        &self,
        sid: usize,
        enable: bool,
        duration_secs: Option<u64>,
    ) -> Result<(), Error> {
        debug!(sid, enable, ?duration_secs, "sending station command");
        let mut params = vec![("sid", sid.to_string()), ("en", u8::from(enable).to_string())];
        if let Some(secs) = duration_secs {
            params.push(("t", secs.to_string()));
        }
        self.command("/cm", &params).await
    }

    /// Start a program immediately.
    ///
    /// `GET /mp?pid={pid}&uwt={0|1}` -- `uwt=1` scales run times by the
    /// current water level.
    pub async fn run_program(&self, pid: usize, use_weather: bool) -> Result<(), Error> {
        debug!(pid, use_weather, "activating program");
        self.command(
            "/mp",
            &[("pid", pid.to_string()), ("uwt", u8::from(use_weather).to_string())],
        )
        .await
    }
}
