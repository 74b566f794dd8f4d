use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use anchor_lang::prelude::*;

use crate::constants::{BASE_TICKETS, MIN_TICKETS};
use crate::errors::RaffleError;
use crate::state::{Participant, ParticipantId};

/// Participants of the current round and their tickets.
///
/// Entries are keyed by an insertion slot so listings come back in join order,
/// with a side index for identity lookups. Every participant holds at least
/// `MIN_TICKETS`.
#[derive(Debug, Default)]
pub struct TicketLedger {
    entries: BTreeMap<u64, Participant>,
    index: HashMap<ParticipantId, u64>,
    next_slot: u64,
}

impl TicketLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new participant with the base ticket plus `bonus`.
    ///
    /// Fails with `AlreadyEntered` without touching the existing entry; the
    /// current count stays available through [`TicketLedger::participant`].
    pub fn enter(&mut self, id: ParticipantId, display_name: String, bonus: u32) -> Result<u32> {
        require!(!self.index.contains_key(&id), RaffleError::AlreadyEntered);

        let tickets = BASE_TICKETS
            .checked_add(bonus)
            .ok_or(RaffleError::InvalidCalculation)?;

        let slot = self.next_slot;
        self.next_slot = slot
            .checked_add(1)
            .ok_or(RaffleError::InvalidCalculation)?;

        self.index.insert(id.clone(), slot);
        self.entries.insert(
            slot,
            Participant {
                id,
                display_name,
                tickets,
                bonus_tickets: bonus,
                wins: 0,
            },
        );

        Ok(tickets)
    }

    /// Add `delta` tickets (may be negative), flooring the result at 1.
    ///
    /// Unknown identities fail with `NotFound` unless `create_as` names the
    /// participant, in which case they are entered first with the base ticket.
    pub fn adjust_tickets(
        &mut self,
        id: &ParticipantId,
        delta: i64,
        create_as: Option<&str>,
    ) -> Result<u32> {
        if !self.index.contains_key(id) {
            match create_as {
                Some(display_name) => {
                    self.enter(id.clone(), display_name.to_string(), 0)?;
                }
                None => return err!(RaffleError::NotFound),
            }
        }

        let participant = self.get_mut(id).ok_or(RaffleError::NotFound)?;
        let adjusted = i64::from(participant.tickets)
            .checked_add(delta)
            .ok_or(RaffleError::InvalidCalculation)?;
        participant.tickets = floor_tickets(adjusted)?;

        Ok(participant.tickets)
    }

    /// Overwrite the ticket count; anything below 1 becomes 1.
    pub fn set_tickets(&mut self, id: &ParticipantId, value: i64) -> Result<u32> {
        let participant = self.get_mut(id).ok_or(RaffleError::NotFound)?;
        participant.tickets = floor_tickets(value)?;
        Ok(participant.tickets)
    }

    pub fn record_win(&mut self, id: &ParticipantId) -> Result<u32> {
        let participant = self.get_mut(id).ok_or(RaffleError::NotFound)?;
        participant.wins = participant
            .wins
            .checked_add(1)
            .ok_or(RaffleError::InvalidCalculation)?;
        Ok(participant.wins)
    }

    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.index.get(id).and_then(|slot| self.entries.get(slot))
    }

    /// First participant whose display name matches `@handle`, in join order.
    pub fn find_by_handle(&self, handle: &str) -> Option<&Participant> {
        self.entries.values().find(|p| p.handle_matches(handle))
    }

    /// Immutable copy of the ledger in join order.
    pub fn list_all(&self) -> LedgerSnapshot {
        LedgerSnapshot::new(self.entries.values().cloned().collect())
    }

    /// Remove every participant. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.index.clear();
        removed
    }

    /// Remove the participants captured in `snapshot`, keeping anyone who
    /// entered after it was taken.
    pub fn retire(&mut self, snapshot: &LedgerSnapshot) -> usize {
        let mut removed = 0;
        for participant in snapshot.iter() {
            if let Some(slot) = self.index.remove(&participant.id) {
                self.entries.remove(&slot);
                removed += 1;
            }
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_tickets(&self) -> u64 {
        self.entries.values().map(|p| u64::from(p.tickets)).sum()
    }

    fn get_mut(&mut self, id: &ParticipantId) -> Option<&mut Participant> {
        let slot = self.index.get(id)?;
        self.entries.get_mut(slot)
    }
}

fn floor_tickets(value: i64) -> Result<u32> {
    u32::try_from(value.max(i64::from(MIN_TICKETS)))
        .map_err(|_| error!(RaffleError::InvalidCalculation))
}

/// Point-in-time copy of a [`TicketLedger`].
///
/// Cheap to clone and safe to hand across tasks; iterating it any number of
/// times yields the same participants in the same order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    participants: Arc<[Participant]>,
    total_tickets: u64,
}

impl LedgerSnapshot {
    pub fn new(participants: Vec<Participant>) -> Self {
        let total_tickets = participants.iter().map(|p| u64::from(p.tickets)).sum();
        Self {
            participants: participants.into(),
            total_tickets,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Participant> {
        self.participants.iter()
    }

    pub fn as_slice(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn total_tickets(&self) -> u64 {
        self.total_tickets
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.participants.iter().any(|p| &p.id == id)
    }
}

impl<'a> IntoIterator for &'a LedgerSnapshot {
    type Item = &'a Participant;
    type IntoIter = std::slice::Iter<'a, Participant>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
