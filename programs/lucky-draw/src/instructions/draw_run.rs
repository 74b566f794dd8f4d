use anchor_lang::prelude::*;

use crate::authorizer::require_operator;
use crate::coordinator::{DrawRequest, DrawResult};
use crate::room::RaffleRoom;
use crate::state::ParticipantId;

/// Operator-triggered draw. Scheduled draws enter the coordinator at the same
/// point, after their own checks.
pub async fn draw(
    room: &RaffleRoom,
    actor: &ParticipantId,
    request: DrawRequest,
) -> Result<DrawResult> {
    require_operator(room.authorizer(), actor, room.id())?;

    tracing::info!(operator = %actor, winners = request.winners, "draw requested");
    room.coordinator().run(request).await
}
