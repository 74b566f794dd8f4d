use anchor_lang::prelude::*;

use crate::bonus::grant_bonus;
use crate::constants::MAX_DISPLAY_NAME_LEN;
use crate::errors::RaffleError;
use crate::room::RaffleRoom;
use crate::state::ParticipantId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryReceipt {
    pub participant: ParticipantId,
    pub display_name: String,

    /// Tickets held after entering, bonus included
    pub tickets: u32,
    pub bonus: u32,
}

/// Enter `actor` into the current round.
///
/// # Operations
/// 1. Validate the display name
/// 2. Check channel membership if the room requires it
/// 3. Reject a second entry for the same identity
/// 4. Roll the bonus once and insert the participant
pub async fn enter(
    room: &RaffleRoom,
    actor: &ParticipantId,
    display_name: &str,
) -> Result<EntryReceipt> {
    let display_name = display_name.trim();
    require!(
        !display_name.is_empty() && display_name.len() <= MAX_DISPLAY_NAME_LEN,
        RaffleError::InvalidDisplayName
    );

    let config = room.state().config.read().await.clone();

    if let Some(channel) = config.membership_channel() {
        match room.authorizer().is_member(actor, channel) {
            Ok(true) => {}
            Ok(false) => return err!(RaffleError::MembershipRequired),
            Err(error) => {
                tracing::warn!(%actor, channel, %error, "membership check failed");
                return err!(RaffleError::MembershipUnverified);
            }
        }
    }

    let mut ledger = room.state().ledger.lock().await;
    if let Some(existing) = ledger.participant(actor) {
        tracing::debug!(%actor, tickets = existing.tickets, "already entered");
        return err!(RaffleError::AlreadyEntered);
    }

    let bonus = {
        let mut rng = room.state().rng.lock().await;
        grant_bonus(&config.bonus, &mut *rng)
    };
    let tickets = ledger.enter(actor.clone(), display_name.to_string(), bonus)?;

    tracing::info!(%actor, name = display_name, tickets, bonus, "participant entered");

    Ok(EntryReceipt {
        participant: actor.clone(),
        display_name: display_name.to_string(),
        tickets,
        bonus,
    })
}
