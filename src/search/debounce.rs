use std::time::Duration;

use tokio::time::Instant;

/// Holds the raw search text and commits it once edits have stopped for
/// the quiet period. Only the latest value is ever committed.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    raw: String,
    committed: String,
    deadline: Option<Instant>,
}

impl Debouncer {
    #[must_use]
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            raw: String::new(),
            committed: String::new(),
            deadline: None,
        }
    }

    pub fn edit(&mut self, text: impl Into<String>, now: Instant) {
        self.raw = text.into();
        self.deadline = Some(now + self.quiet);
    }

    /// Returns the newly committed term once the quiet period has passed.
    /// A settled value equal to the current committed term commits nothing.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }

        self.deadline = None;
        if self.raw == self.committed {
            return None;
        }

        self.committed.clone_from(&self.raw);
        Some(self.committed.clone())
    }

    /// When the pending edit settles, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn committed(&self) -> &str {
        &self.committed
    }
}
