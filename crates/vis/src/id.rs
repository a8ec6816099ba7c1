//! Identifiers of the chart instances drawn on a canvas.

use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use serde::Serialize;

/// Identifies a chart instance created on a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct ChartId(u64);

impl ChartId {
    /// Allocates a new, process-wide unique id.
    pub fn next() -> ChartId {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);

        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The DOM id of the canvas element the chart is drawn on.
    pub fn element_id(&self) -> String {
        format!("mrlens-chart-{}", self.0)
    }
}

impl Display for ChartId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let first = ChartId::next();
        let second = ChartId::next();

        assert!(second > first);
        assert_ne!(first.element_id(), second.element_id());
    }
}
