use anchor_lang::prelude::*;

use crate::authorizer::require_operator;
use crate::constants::MIN_TICKETS;
use crate::errors::RaffleError;
use crate::room::RaffleRoom;
use crate::state::{Participant, ParticipantId, TicketLedger};

/// Participant addressed by an operator command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TicketTarget {
    Id(ParticipantId),

    /// Display name, with or without a leading `@`
    Handle(String),
}

impl TicketTarget {
    fn resolve(&self, ledger: &TicketLedger) -> Option<ParticipantId> {
        match self {
            TicketTarget::Id(id) => Some(id.clone()),
            TicketTarget::Handle(handle) => ledger.find_by_handle(handle).map(|p| p.id.clone()),
        }
    }
}

/// Add (or with a negative `delta`, remove) tickets; the count never drops
/// below 1.
///
/// `create_as` lets an operator grant tickets to someone addressed by identity
/// who has not entered yet; without it unknown participants are `NotFound`.
pub async fn add_tickets(
    room: &RaffleRoom,
    actor: &ParticipantId,
    target: TicketTarget,
    delta: i64,
    create_as: Option<&str>,
) -> Result<Participant> {
    require_operator(room.authorizer(), actor, room.id())?;

    let mut ledger = room.state().ledger.lock().await;
    let id = target.resolve(&ledger).ok_or(RaffleError::NotFound)?;
    let create_as = match target {
        TicketTarget::Id(_) => create_as,
        TicketTarget::Handle(_) => None,
    };
    let tickets = ledger.adjust_tickets(&id, delta, create_as)?;

    tracing::info!(operator = %actor, participant = %id, delta, tickets, "tickets adjusted");

    ledger
        .participant(&id)
        .cloned()
        .ok_or_else(|| error!(RaffleError::NotFound))
}

/// Overwrite a participant's tickets; values below 1 become 1.
pub async fn set_tickets(
    room: &RaffleRoom,
    actor: &ParticipantId,
    target: TicketTarget,
    value: i64,
) -> Result<Participant> {
    require_operator(room.authorizer(), actor, room.id())?;

    let mut ledger = room.state().ledger.lock().await;
    let id = target.resolve(&ledger).ok_or(RaffleError::NotFound)?;
    let tickets = ledger.set_tickets(&id, value)?;

    tracing::info!(operator = %actor, participant = %id, tickets, "tickets set");

    ledger
        .participant(&id)
        .cloned()
        .ok_or_else(|| error!(RaffleError::NotFound))
}

/// Put a participant back to a single ticket.
pub async fn reset_tickets(
    room: &RaffleRoom,
    actor: &ParticipantId,
    target: TicketTarget,
) -> Result<Participant> {
    set_tickets(room, actor, target, i64::from(MIN_TICKETS)).await
}
