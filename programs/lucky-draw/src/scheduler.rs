//! Unattended draws fired at a future time.

use std::collections::BTreeMap;
use std::sync::Arc;

use anchor_lang::error::Error;
use anchor_lang::prelude::*;
use chrono::Utc;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

use crate::constants::MAX_PRIZE_LEN;
use crate::coordinator::{DrawCoordinator, DrawRequest, DrawResult, RoomState};
use crate::errors::RaffleError;
use crate::events::{Announcement, ScheduledDrawCancelled};
use crate::state::{ScheduleId, ScheduleRequest, ScheduledDraw};

/// What happened to a scheduled draw.
#[derive(Debug)]
pub enum ScheduleOutcome {
    /// The draw ran through the coordinator
    Completed(DrawResult),

    /// Too few participants when the trigger fired; nothing was drawn
    Skipped { required: usize, present: usize },

    /// The coordinator refused or failed the draw
    Failed(Error),

    /// Cancelled by an operator before firing
    Cancelled,
}

/// Handle returned when a draw is scheduled.
#[derive(Debug)]
pub struct ScheduleTicket {
    pub draw: ScheduledDraw,
    outcome: oneshot::Receiver<ScheduleOutcome>,
}

impl ScheduleTicket {
    pub fn id(&self) -> ScheduleId {
        self.draw.id
    }

    /// Wait for the scheduled draw to fire or be cancelled.
    pub async fn outcome(self) -> ScheduleOutcome {
        self.outcome.await.unwrap_or(ScheduleOutcome::Cancelled)
    }
}

struct Pending {
    draw: ScheduledDraw,
    task: JoinHandle<()>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    pending: BTreeMap<ScheduleId, Pending>,
}

/// Registry of cancellable scheduled draws for one room.
///
/// Each schedule is a spawned task that sleeps until its trigger. A fired
/// trigger holds the room's fire lock until its draw finishes, so scheduled
/// draws of one room never overlap each other; against manual draws they are
/// kept apart by the coordinator's single-draw guard.
pub struct Scheduler {
    state: Arc<RoomState>,
    coordinator: Arc<DrawCoordinator>,
    registry: Arc<Mutex<Registry>>,
    fire_lock: Arc<Mutex<()>>,
}

impl Scheduler {
    pub fn new(state: Arc<RoomState>, coordinator: Arc<DrawCoordinator>) -> Self {
        Self {
            state,
            coordinator,
            registry: Arc::new(Mutex::new(Registry::default())),
            fire_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Register a draw to run at `request.trigger`.
    pub async fn schedule(&self, request: ScheduleRequest) -> Result<ScheduleTicket> {
        require!(request.winners > 0, RaffleError::InvalidWinnerCount);
        let prize = request
            .prize
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        if let Some(prize) = &prize {
            require!(prize.len() <= MAX_PRIZE_LEN, RaffleError::PrizeTooLong);
        }

        let now = Utc::now();
        let fires_at = request.trigger.resolve(now)?;
        let delay = (fires_at - now).to_std().unwrap_or_default();

        // Hold the registry while spawning so the task cannot look itself up
        // before it is registered.
        let mut registry = self.registry.lock().await;
        let id = ScheduleId(registry.next_id);
        registry.next_id = registry
            .next_id
            .checked_add(1)
            .ok_or(RaffleError::InvalidCalculation)?;

        let draw = ScheduledDraw {
            id,
            fires_at,
            winners: request.winners,
            prize,
            min_participants: request.min_participants,
            created_at: now,
        };

        let (sender, outcome) = oneshot::channel();
        let task = tokio::spawn(fire(
            draw.clone(),
            delay,
            Arc::clone(&self.state),
            Arc::clone(&self.coordinator),
            Arc::clone(&self.registry),
            Arc::clone(&self.fire_lock),
            sender,
        ));
        registry.pending.insert(
            id,
            Pending {
                draw: draw.clone(),
                task,
            },
        );

        tracing::info!(
            schedule = %id,
            fires_at = %fires_at,
            winners = draw.winners,
            min_participants = draw.min_participants,
            "draw scheduled"
        );

        Ok(ScheduleTicket { draw, outcome })
    }

    /// Cancel a pending draw. Fails with `ScheduleNotFound` once it has fired.
    pub async fn cancel(&self, id: ScheduleId) -> Result<ScheduledDraw> {
        let pending = self
            .registry
            .lock()
            .await
            .pending
            .remove(&id)
            .ok_or(RaffleError::ScheduleNotFound)?;
        pending.task.abort();

        tracing::info!(schedule = %id, "scheduled draw cancelled by operator");
        Ok(pending.draw)
    }

    /// Pending draws ordered by id.
    pub async fn pending(&self) -> Vec<ScheduledDraw> {
        self.registry
            .lock()
            .await
            .pending
            .values()
            .map(|p| p.draw.clone())
            .collect()
    }

    /// Abort every pending draw.
    pub async fn shutdown(&self) -> usize {
        let mut registry = self.registry.lock().await;
        let aborted = registry.pending.len();
        for (_, pending) in std::mem::take(&mut registry.pending) {
            pending.task.abort();
        }
        aborted
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Ok(mut registry) = self.registry.try_lock() {
            for (_, pending) in std::mem::take(&mut registry.pending) {
                pending.task.abort();
            }
        }
    }
}

/// Body of a scheduled draw task.
///
/// # Operations
/// 1. Sleep until the trigger
/// 2. Take the room's fire lock
/// 3. Leave the registry; from here on the draw can no longer be cancelled
/// 4. Check the participant precondition, reporting a skip if unmet
/// 5. Run the draw through the coordinator
async fn fire(
    draw: ScheduledDraw,
    delay: std::time::Duration,
    state: Arc<RoomState>,
    coordinator: Arc<DrawCoordinator>,
    registry: Arc<Mutex<Registry>>,
    fire_lock: Arc<Mutex<()>>,
    outcome: oneshot::Sender<ScheduleOutcome>,
) {
    tokio::time::sleep(delay).await;
    let _firing = fire_lock.lock().await;

    if registry.lock().await.pending.remove(&draw.id).is_none() {
        return;
    }

    let present = state.ledger.lock().await.len();
    if present < draw.min_participants {
        tracing::warn!(
            schedule = %draw.id,
            required = draw.min_participants,
            present,
            "not enough participants for scheduled draw"
        );
        let report = Announcement::ScheduleCancelled(ScheduledDrawCancelled {
            schedule: draw.id.0,
            required: draw.min_participants as u64,
            present: present as u64,
            prize: draw.prize.clone(),
        });
        if let Err(error) = coordinator.presenter().present(&report) {
            tracing::warn!(schedule = %draw.id, %error, "cancellation report failed");
        }
        let _ = outcome.send(ScheduleOutcome::Skipped {
            required: draw.min_participants,
            present,
        });
        return;
    }

    tracing::info!(schedule = %draw.id, present, "scheduled draw firing");
    let result = coordinator
        .run(DrawRequest::new(draw.winners, draw.prize.clone()))
        .await;
    let report = match result {
        Ok(result) => ScheduleOutcome::Completed(result),
        Err(error) => {
            tracing::warn!(schedule = %draw.id, %error, "scheduled draw failed");
            ScheduleOutcome::Failed(error)
        }
    };
    let _ = outcome.send(report);
}
