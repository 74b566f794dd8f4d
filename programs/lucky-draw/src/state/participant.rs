use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, stable identity of a chat user (participant or operator).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A participant of the current round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,

    /// Name shown in announcements and recorded in draw history
    pub display_name: String,

    /// Weighted chances in the current round, never below 1
    pub tickets: u32,

    /// Extra tickets granted by the bonus roll at entry
    pub bonus_tickets: u32,

    /// Wins recorded while the participant stayed in the ledger
    pub wins: u32,
}

impl Participant {
    /// Matches a `@handle` style reference against the display name, ignoring
    /// case and leading `@` on either side.
    pub fn handle_matches(&self, handle: &str) -> bool {
        let wanted = handle.trim().trim_start_matches('@');
        !wanted.is_empty()
            && self
                .display_name
                .trim_start_matches('@')
                .eq_ignore_ascii_case(wanted)
    }
}
