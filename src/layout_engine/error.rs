use thiserror::Error;

use crate::model::widget::WidgetId;

/// A fixup that could not run this tick. Never fatal; the next triggering
/// event retries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FixupError {
    #[error("widget {0} is not mounted")]
    WidgetMissing(WidgetId),
    #[error("widget {parent} has {found} dynamic children, expected {expected}")]
    UnexpectedChildCount {
        parent: WidgetId,
        expected: usize,
        found: usize,
    },
}
