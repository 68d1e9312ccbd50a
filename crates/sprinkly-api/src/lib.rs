// sprinkly-api: Async Rust client for the OpenSprinkler JSON API

pub mod device;
pub mod error;
pub mod transport;

pub use device::models::{AllData, ProgramData, RawProgram, ResultCode, StationNames};
pub use device::{DeviceClient, base_url_for_host};
pub use error::Error;
pub use transport::{DEFAULT_TIMEOUT, TlsMode, TransportConfig};
