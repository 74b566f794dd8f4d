use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit record of one completed draw.
///
/// Winners are stored by display name as they were at draw time; the ledger is
/// reset after the draw, so there is nothing left to reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    /// Monotonic draw number, never reused
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub prize: Option<String>,

    /// Winners in the order they were drawn
    pub winners: Vec<String>,
    pub total_participants: u32,
    pub total_tickets: u64,
}

impl DrawRecord {
    pub fn prize_label(&self) -> &str {
        self.prize.as_deref().unwrap_or("-")
    }
}
