use anchor_lang::prelude::*;

use crate::authorizer::require_operator;
use crate::room::RaffleRoom;
use crate::state::{LedgerSnapshot, ParticipantId};

/// Current participants in join order.
pub async fn list_participants(room: &RaffleRoom, actor: &ParticipantId) -> Result<LedgerSnapshot> {
    require_operator(room.authorizer(), actor, room.id())?;
    Ok(room.state().ledger.lock().await.list_all())
}
