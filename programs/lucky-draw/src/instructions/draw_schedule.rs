use anchor_lang::prelude::*;

use crate::authorizer::require_operator;
use crate::room::RaffleRoom;
use crate::scheduler::ScheduleTicket;
use crate::state::{ParticipantId, ScheduleId, ScheduleRequest, ScheduledDraw};

pub async fn schedule_draw(
    room: &RaffleRoom,
    actor: &ParticipantId,
    request: ScheduleRequest,
) -> Result<ScheduleTicket> {
    require_operator(room.authorizer(), actor, room.id())?;
    room.scheduler().schedule(request).await
}

pub async fn cancel_scheduled_draw(
    room: &RaffleRoom,
    actor: &ParticipantId,
    id: ScheduleId,
) -> Result<ScheduledDraw> {
    require_operator(room.authorizer(), actor, room.id())?;
    room.scheduler().cancel(id).await
}

pub async fn list_scheduled_draws(
    room: &RaffleRoom,
    actor: &ParticipantId,
) -> Result<Vec<ScheduledDraw>> {
    require_operator(room.authorizer(), actor, room.id())?;
    Ok(room.scheduler().pending().await)
}
