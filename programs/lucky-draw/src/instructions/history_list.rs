use anchor_lang::prelude::*;

use crate::constants::DEFAULT_HISTORY_LEN;
use crate::room::RaffleRoom;
use crate::state::DrawRecord;

/// Latest `n` draws (default 10), oldest first.
pub async fn list_history(room: &RaffleRoom, n: Option<usize>) -> Result<Vec<DrawRecord>> {
    room.coordinator()
        .history()
        .list_recent(n.unwrap_or(DEFAULT_HISTORY_LEN))
}
