//! Single-draw lifecycle: snapshot, select, announce, commit.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anchor_lang::prelude::*;
use chrono::Utc;
use rand::rngs::StdRng;
use tokio::sync::{watch, Mutex, RwLock};

use crate::constants::MAX_PRIZE_LEN;
use crate::errors::RaffleError;
use crate::events::{Announcement, DrawSummarized, WheelSpun, WinnerRevealed};
use crate::history::HistorySink;
use crate::presenter::Presenter;
use crate::selector::draw_winners;
use crate::state::{DrawRecord, LedgerSnapshot, Participant, RaffleConfig, TicketLedger};

/// Where the coordinator is in a draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawPhase {
    Idle,
    Snapshotting,
    Selecting,
    Announcing,
    Committing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawRequest {
    pub winners: u32,
    pub prize: Option<String>,
}

impl DrawRequest {
    pub fn new(winners: u32, prize: Option<String>) -> Self {
        let prize = prize
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        Self { winners, prize }
    }
}

/// Non-fatal problem hit after the winners were already decided.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawWarning {
    HistorySinkFailure { reason: String },
    PresentationFailure { announcement: &'static str, reason: String },
}

/// Outcome of a completed draw. The record is authoritative even when
/// warnings are present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawResult {
    pub record: DrawRecord,
    pub warnings: Vec<DrawWarning>,
}

impl DrawResult {
    pub fn history_saved(&self) -> bool {
        !self
            .warnings
            .iter()
            .any(|w| matches!(w, DrawWarning::HistorySinkFailure { .. }))
    }
}

/// State shared by every operation of a room.
#[derive(Debug)]
pub struct RoomState {
    pub ledger: Mutex<TicketLedger>,
    pub config: RwLock<RaffleConfig>,
    pub rng: Mutex<StdRng>,
}

impl RoomState {
    pub fn new(config: RaffleConfig, rng: StdRng) -> Self {
        Self {
            ledger: Mutex::new(TicketLedger::new()),
            config: RwLock::new(config),
            rng: Mutex::new(rng),
        }
    }
}

/// Runs draws one at a time for a room.
pub struct DrawCoordinator {
    state: Arc<RoomState>,
    history: Arc<dyn HistorySink>,
    presenter: Arc<dyn Presenter>,
    phase: Arc<watch::Sender<DrawPhase>>,
    next_sequence: AtomicU64,
    completed: AtomicU64,
}

/// Holds the coordinator out of `Idle`; dropping it returns to `Idle`, so any
/// early return releases the draw slot.
struct PhaseGuard {
    phase: Arc<watch::Sender<DrawPhase>>,
}

impl PhaseGuard {
    fn acquire(phase: &Arc<watch::Sender<DrawPhase>>) -> Option<Self> {
        let acquired = phase.send_if_modified(|current| {
            if *current == DrawPhase::Idle {
                *current = DrawPhase::Snapshotting;
                true
            } else {
                false
            }
        });
        acquired.then(|| Self {
            phase: Arc::clone(phase),
        })
    }

    fn advance(&self, next: DrawPhase) {
        tracing::trace!(?next, "draw phase");
        self.phase.send_replace(next);
    }
}

impl Drop for PhaseGuard {
    fn drop(&mut self) {
        self.phase.send_replace(DrawPhase::Idle);
    }
}

/// A draw whose winners are decided and only has to be announced and
/// committed.
struct SelectedDraw {
    sequence: u64,
    prize: Option<String>,
    snapshot: LedgerSnapshot,
    winners: Vec<Participant>,
    config: RaffleConfig,
}

impl DrawCoordinator {
    pub fn new(
        state: Arc<RoomState>,
        history: Arc<dyn HistorySink>,
        presenter: Arc<dyn Presenter>,
    ) -> Result<Self> {
        let last = history.last_sequence()?.unwrap_or(0);
        let next = last.checked_add(1).ok_or(RaffleError::InvalidCalculation)?;
        let (phase, _) = watch::channel(DrawPhase::Idle);

        Ok(Self {
            state,
            history,
            presenter,
            phase: Arc::new(phase),
            next_sequence: AtomicU64::new(next),
            completed: AtomicU64::new(0),
        })
    }

    pub fn phase(&self) -> DrawPhase {
        *self.phase.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<DrawPhase> {
        self.phase.subscribe()
    }

    /// Draws completed by this coordinator since it was created.
    pub fn completed_draws(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }

    pub fn history(&self) -> &Arc<dyn HistorySink> {
        &self.history
    }

    pub fn presenter(&self) -> &Arc<dyn Presenter> {
        &self.presenter
    }

    /// Run one complete draw.
    ///
    /// Once winners are selected the rest of the draw runs on its own task, so
    /// dropping the returned future no longer stops it from being announced,
    /// recorded and reset.
    ///
    /// # Operations
    /// 1. Validate the request, reject if a draw is running or nobody entered
    /// 2. Snapshot the ledger under its lock, then release it
    /// 3. Select winners from the snapshot
    /// 4. Announce winners with pacing, without holding the ledger
    /// 5. Append the draw record to history
    /// 6. Reset the round and return to `Idle`
    #[tracing::instrument(level = "debug", skip(self), fields(winners = request.winners))]
    pub async fn run(self: &Arc<Self>, request: DrawRequest) -> Result<DrawResult> {
        require!(request.winners > 0, RaffleError::InvalidWinnerCount);
        if let Some(prize) = &request.prize {
            require!(prize.len() <= MAX_PRIZE_LEN, RaffleError::PrizeTooLong);
        }

        let config = self.state.config.read().await.clone();

        let (guard, snapshot) = {
            let ledger = self.state.ledger.lock().await;
            require!(self.phase() == DrawPhase::Idle, RaffleError::DrawInProgress);
            require!(!ledger.is_empty(), RaffleError::NoParticipants);
            let guard = PhaseGuard::acquire(&self.phase).ok_or(RaffleError::DrawInProgress)?;
            (guard, ledger.list_all())
        };

        guard.advance(DrawPhase::Selecting);
        let winners = {
            let mut rng = self.state.rng.lock().await;
            draw_winners(&snapshot, request.winners, config.allow_repeat_winners, &mut *rng)?
        };

        // The draw number is consumed from here on, even if history fails.
        let sequence = self.next_sequence.fetch_add(1, Ordering::AcqRel);
        let selected = SelectedDraw {
            sequence,
            prize: request.prize,
            snapshot,
            winners,
            config,
        };

        let coordinator = Arc::clone(self);
        tokio::spawn(async move { coordinator.complete(selected, guard).await })
            .await
            .map_err(|error| {
                tracing::error!(draw = sequence, %error, "draw task did not finish");
                error!(RaffleError::InvalidCalculation)
            })?
    }

    async fn complete(&self, draw: SelectedDraw, guard: PhaseGuard) -> Result<DrawResult> {
        let SelectedDraw {
            sequence,
            prize,
            snapshot,
            winners,
            config,
        } = draw;

        let total_participants =
            u32::try_from(snapshot.len()).map_err(|_| error!(RaffleError::InvalidCalculation))?;
        let total_tickets = snapshot.total_tickets();
        let winner_names: Vec<String> = winners.iter().map(|w| w.display_name.clone()).collect();

        tracing::info!(
            draw = sequence,
            participants = total_participants,
            tickets = total_tickets,
            winners = winner_names.len(),
            "winners selected"
        );

        guard.advance(DrawPhase::Announcing);
        let mut warnings = Vec::new();
        for (position, winner) in winners.iter().enumerate() {
            let index = u32::try_from(position + 1).unwrap_or(u32::MAX);
            self.announce(
                Announcement::Spin(WheelSpun {
                    draw: sequence,
                    index,
                }),
                &mut warnings,
            );
            if !config.reveal_pacing.is_zero() {
                tokio::time::sleep(config.reveal_pacing).await;
            }
            self.announce(
                Announcement::Winner(WinnerRevealed {
                    draw: sequence,
                    index,
                    display_name: winner.display_name.clone(),
                    prize: prize.clone(),
                }),
                &mut warnings,
            );
        }
        self.announce(
            Announcement::Summary(DrawSummarized {
                draw: sequence,
                prize: prize.clone(),
                total_participants,
                total_tickets,
                winners: winner_names.clone(),
            }),
            &mut warnings,
        );

        guard.advance(DrawPhase::Committing);
        let record = DrawRecord {
            sequence,
            timestamp: Utc::now(),
            prize,
            winners: winner_names,
            total_participants,
            total_tickets,
        };
        if let Err(error) = self.history.append(&record) {
            tracing::error!(draw = sequence, %error, "draw history append failed");
            warnings.push(DrawWarning::HistorySinkFailure {
                reason: error.to_string(),
            });
        }

        self.reset_round(&snapshot, &winners, config.clear_after_draw).await;
        self.completed.fetch_add(1, Ordering::AcqRel);
        drop(guard);

        Ok(DrawResult { record, warnings })
    }

    fn announce(&self, announcement: Announcement, warnings: &mut Vec<DrawWarning>) {
        if let Err(error) = self.presenter.present(&announcement) {
            tracing::warn!(kind = announcement.kind(), %error, "announcement failed");
            warnings.push(DrawWarning::PresentationFailure {
                announcement: announcement.kind(),
                reason: error.to_string(),
            });
        }
    }

    async fn reset_round(&self, snapshot: &LedgerSnapshot, winners: &[Participant], clear: bool) {
        let mut ledger = self.state.ledger.lock().await;
        if clear {
            let removed = ledger.retire(snapshot);
            tracing::debug!(removed, remaining = ledger.len(), "round reset");
            return;
        }
        for winner in winners {
            if let Err(error) = ledger.record_win(&winner.id) {
                tracing::debug!(participant = %winner.id, %error, "win not recorded");
            }
        }
    }
}
