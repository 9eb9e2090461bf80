pub mod aggregation;
pub mod error;
pub mod loader;
pub mod output;
pub mod period;
pub mod pipeline;
pub mod present;

pub use error::StartupError;
pub use pipeline::{Dashboard, InitialRender, Refresh, RefreshRender};
