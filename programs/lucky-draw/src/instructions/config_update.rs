use anchor_lang::prelude::*;

use crate::authorizer::require_operator;
use crate::room::RaffleRoom;
use crate::state::{ConfigUpdate, ParticipantId, RaffleConfig};

/// Apply an operator's partial config change and return the new config.
///
/// Invalid bonus odds or ranges are rejected as a whole; the previous config
/// stays in place.
pub async fn update_config(
    room: &RaffleRoom,
    actor: &ParticipantId,
    update: ConfigUpdate,
) -> Result<RaffleConfig> {
    require_operator(room.authorizer(), actor, room.id())?;

    let mut config = room.state().config.write().await;
    config.apply(&update)?;

    tracing::info!(
        operator = %actor,
        bonus_enabled = config.bonus.enabled,
        bonus_chance = config.bonus.chance,
        membership_required = config.membership_required,
        "config updated"
    );

    Ok(config.clone())
}

pub async fn view_config(room: &RaffleRoom, actor: &ParticipantId) -> Result<RaffleConfig> {
    require_operator(room.authorizer(), actor, room.id())?;
    Ok(room.state().config.read().await.clone())
}
