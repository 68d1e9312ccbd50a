// Device state endpoints
//
// Read-only queries: the aggregate state used by the cache, and the
// station/program listings used for enumeration.

use tracing::debug;

use crate::device::client::DeviceClient;
use crate::device::models::{AllData, ProgramData, StationNames};
use crate::error::Error;

impl DeviceClient {
    /// Fetch status, settings and options in a single call.
    ///
    /// `GET /ja`
    pub async fn get_all(&self) -> Result<AllData, Error> {
        debug!("fetching aggregate state");
        self.fetch("/ja", &[]).await
    }

    /// Fetch station names, ordered by station index.
    ///
    /// `GET /jn`
    pub async fn get_station_names(&self) -> Result<StationNames, Error> {
        debug!("fetching station names");
        self.fetch("/jn", &[]).await
    }

    /// Fetch program definitions, ordered by program index.
    ///
    /// `GET /jp`
    pub async fn get_programs(&self) -> Result<ProgramData, Error> {
        debug!("fetching programs");
        self.fetch("/jp", &[]).await
    }
}
