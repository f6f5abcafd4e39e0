use std::time::{SystemTime, UNIX_EPOCH};

/// Width of a ticket identifier in digits.
pub const TICKET_ID_LEN: usize = 6;

/// A short, human-typeable ticket identifier.
///
/// Derived from the low-order six digits of a millisecond clock reading, so
/// identifiers sort by creation order in the common case. Uniqueness is
/// probabilistic: two tickets opened in the same millisecond (or exactly
/// 1000 seconds apart) collide. The engine keeps no uniqueness ledger — at
/// the expected ticket volume the risk is accepted, and the channel
/// directory's own name-uniqueness behavior is the downstream guard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TicketId(String);

impl TicketId {
    /// Derive an identifier from a millisecond timestamp.
    #[must_use]
    pub fn from_millis(ms: u128) -> Self {
        Self(format!("{:06}", ms % 1_000_000))
    }

    /// Generate an identifier from the current wall clock.
    #[must_use]
    pub fn generate() -> Self {
        let ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        Self::from_millis(ms)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
