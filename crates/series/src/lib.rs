//! mrlens' series library.
//!
//! Reads the rating series embedded in a ranked history page, computes the
//! moving averages drawn over it, persists the overlay settings and aggregates
//! the matchup table.
//!
//! **WARNING**: This library is the mrlens' internal library and there are no
//! plans to stabilize it. The API may break at any time without notice.

#![warn(missing_docs)]

mod season;

pub mod average;
pub mod error;
pub mod extract;
pub mod filter;
pub mod matchup;
pub mod settings;
pub mod store;
pub mod time;

pub use crate::average::AverageKind;
pub use crate::extract::CleanedSeries;
pub use crate::extract::SeriesExtractor;
pub use crate::extract::SeriesKind;
pub use crate::filter::DateRange;
pub use crate::season::split_seasons;
pub use crate::settings::LineConfig;
pub use crate::settings::OverlaySettings;
pub use crate::settings::SettingsStore;
pub use crate::settings::XAxisMode;
pub use crate::store::KeyValueStore;
pub use crate::store::MemoryStore;
