use anchor_lang::prelude::*;

use crate::constants::STATS_TOP_LEN;
use crate::room::RaffleRoom;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomStats {
    /// Draws completed since the room was opened
    pub draws_this_session: u64,
    pub participants: usize,
    pub total_tickets: u64,

    /// Bonus tickets rolled at entry by the current participants
    pub bonus_tickets: u64,

    /// Display name and wins, most wins first; only participants with wins
    pub top_winners: Vec<(String, u32)>,

    /// Display name and tickets, most tickets first
    pub top_holders: Vec<(String, u32)>,
}

/// Session summary. Ties keep join order.
pub async fn room_stats(room: &RaffleRoom) -> Result<RoomStats> {
    let snapshot = room.state().ledger.lock().await.list_all();

    let mut top_winners: Vec<(String, u32)> = snapshot
        .iter()
        .filter(|p| p.wins > 0)
        .map(|p| (p.display_name.clone(), p.wins))
        .collect();
    top_winners.sort_by(|a, b| b.1.cmp(&a.1));
    top_winners.truncate(STATS_TOP_LEN);

    let mut top_holders: Vec<(String, u32)> = snapshot
        .iter()
        .map(|p| (p.display_name.clone(), p.tickets))
        .collect();
    top_holders.sort_by(|a, b| b.1.cmp(&a.1));
    top_holders.truncate(STATS_TOP_LEN);

    Ok(RoomStats {
        draws_this_session: room.coordinator().completed_draws(),
        participants: snapshot.len(),
        total_tickets: snapshot.total_tickets(),
        bonus_tickets: snapshot.iter().map(|p| u64::from(p.bonus_tickets)).sum(),
        top_winners,
        top_holders,
    })
}
