//! mrlens' visualization library.
//!
//! Turns a rating series and the overlay settings into a chart
//! specification, drives the overlay over a host page and renders the chart
//! page and the matchup table.
//!
//! **WARNING**: This library is the mrlens' visualization internal library and
//! there are no plans to stabilize it. The API may break at any time without notice.

#![warn(missing_docs)]

pub(crate) mod template;

pub mod chart;
pub mod config;
pub mod error;
pub mod id;
pub mod layout;
pub mod overlay;
pub mod panel;
pub mod render;

pub use crate::config::ChartConfigBuilder;
pub use crate::overlay::OverlayController;
pub use crate::panel::SettingsPanel;
