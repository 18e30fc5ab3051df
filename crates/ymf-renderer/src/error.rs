//! Render error types.

use std::time::Duration;

/// Error returned when a document cannot be converted.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// Markdown conversion exceeded the configured time limit.
    #[error("markdown parsing exceeded {limit:?} (gave up after {elapsed:?})")]
    ParseTimeout {
        /// Time spent before giving up.
        elapsed: Duration,
        /// Configured limit.
        limit: Duration,
    },
}
