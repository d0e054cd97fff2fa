//! Client for the ZCS Azzurro third-party inverter API.
//!
//! ```no_run
//! # async fn run() -> Result<(), zcs_azzurro_rs::Error> {
//! let inverter = zcs_azzurro_rs::api::inverter("client".to_string(), "ZA1ES123456789".to_string(), None);
//! let _record = zcs_azzurro_rs::api::realtime_data(&inverter, &["powerGenerating"]).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod model;

pub use api::Error;
