use anchor_lang::prelude::*;

use crate::authorizer::require_operator;
use crate::room::RaffleRoom;
use crate::state::ParticipantId;

/// Drop every participant of the current round without drawing.
pub async fn clear_participants(room: &RaffleRoom, actor: &ParticipantId) -> Result<usize> {
    require_operator(room.authorizer(), actor, room.id())?;

    let removed = room.state().ledger.lock().await.clear();
    tracing::info!(operator = %actor, removed, "participants cleared");

    Ok(removed)
}
