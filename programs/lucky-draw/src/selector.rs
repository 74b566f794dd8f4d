//! Weighted winner selection over a ledger snapshot.

use anchor_lang::prelude::*;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::errors::RaffleError;
use crate::state::{LedgerSnapshot, Participant};

/// Draw `count` winners from `snapshot`, each with probability proportional to
/// their tickets.
///
/// Without repeats, every pick removes all of the winner's tickets from the pool
/// before the next step, so at most `snapshot.len()` winners come back. With
/// `allow_repeats` every pick samples the full pool and exactly `count` picks are
/// returned. Winners are returned in draw order; an empty snapshot yields no
/// winners.
pub fn draw_winners<R: Rng + ?Sized>(
    snapshot: &LedgerSnapshot,
    count: u32,
    allow_repeats: bool,
    rng: &mut R,
) -> Result<Vec<Participant>> {
    require!(count > 0, RaffleError::InvalidWinnerCount);

    if snapshot.is_empty() || snapshot.total_tickets() == 0 {
        return Ok(Vec::new());
    }

    let pool = snapshot.as_slice();
    let weights: Vec<u64> = pool.iter().map(|p| u64::from(p.tickets)).collect();
    let mut dist =
        WeightedIndex::new(&weights).map_err(|_| error!(RaffleError::InvalidCalculation))?;

    let requested = usize::try_from(count).map_err(|_| error!(RaffleError::InvalidCalculation))?;
    let eligible = weights.iter().filter(|w| **w > 0).count();
    let picks = if allow_repeats {
        requested
    } else {
        requested.min(eligible)
    };

    let mut winners = Vec::with_capacity(picks);
    for step in 0..picks {
        let chosen = dist.sample(rng);
        winners.push(pool[chosen].clone());

        let last_pick = step + 1 == picks;
        if allow_repeats || last_pick {
            continue;
        }

        dist.update_weights(&[(chosen, &0)])
            .map_err(|_| error!(RaffleError::InvalidCalculation))?;
    }

    Ok(winners)
}
