//! Monotonic element id allocation.
//!
//! Diagram placeholders, generic code blocks and heading anchors all draw
//! their numeric suffix from one [`ElementIdCounter`]. Which counter a render
//! uses is decided by [`IdScope`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

static GLOBAL: LazyLock<Arc<ElementIdCounter>> = LazyLock::new(|| Arc::new(ElementIdCounter::new()));

/// Thread-safe counter handing out element ids starting at 1.
///
/// Every call to [`next_id`](Self::next_id) returns the current value and
/// advances it, so no id is ever handed out twice by the same counter.
#[derive(Debug)]
pub struct ElementIdCounter {
    next: AtomicU64,
}

impl ElementIdCounter {
    /// Create a counter whose first id is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create a counter whose first id is `first`.
    #[must_use]
    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Process-wide counter shared by every render that asks for it.
    ///
    /// # Example
    ///
    /// ```
    /// use ymf_renderer::ElementIdCounter;
    ///
    /// let a = ElementIdCounter::global();
    /// let b = ElementIdCounter::global();
    /// let first = a.next_id();
    /// assert!(b.next_id() > first);
    /// ```
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Return the current id and advance the counter.
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Id the next call to [`next_id`](Self::next_id) will return.
    #[must_use]
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for ElementIdCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Which counter a render session draws element ids from.
#[derive(Clone, Debug, Default)]
pub enum IdScope {
    /// Fresh counter per render; ids restart at 1 for every document.
    #[default]
    Session,
    /// Counter shared across renders; ids stay unique across documents.
    Shared(Arc<ElementIdCounter>),
}

impl IdScope {
    /// Scope backed by the process-wide counter.
    #[must_use]
    pub fn global() -> Self {
        Self::Shared(ElementIdCounter::global())
    }

    /// Resolve the counter a single render should use.
    #[must_use]
    pub fn counter(&self) -> Arc<ElementIdCounter> {
        match self {
            Self::Session => Arc::new(ElementIdCounter::new()),
            Self::Shared(counter) => Arc::clone(counter),
        }
    }
}
