// ── Domain model ──
//
// Per-entity handles and typed views of array-shaped device fields.

pub mod program;
pub mod readings;
pub mod station;

pub use program::Program;
pub use readings::{LastRun, ProgramStatus};
pub use station::{MAX_RUN_MINUTES, Station};
