// Device JSON API
//
// One client per device. Endpoint methods are spread across `state.rs`
// (reads) and `commands.rs` (writes) as inherent impls on `DeviceClient`.

pub mod client;
mod commands;
pub mod models;
mod state;

pub use client::{DeviceClient, base_url_for_host};
