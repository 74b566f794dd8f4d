use std::sync::{Arc, Mutex};

use anchor_lang::prelude::*;

use crate::errors::RaffleError;
use crate::events::Announcement;

/// Receives announcements while a draw is revealed.
///
/// Purely a sink: the engine only looks at the result to log and attach a
/// warning, never to change the outcome of a draw.
pub trait Presenter: Send + Sync {
    fn present(&self, announcement: &Announcement) -> Result<()>;
}

/// Writes announcements to the tracing log.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingPresenter;

impl Presenter for TracingPresenter {
    fn present(&self, announcement: &Announcement) -> Result<()> {
        match announcement {
            Announcement::Spin(spin) => {
                tracing::info!(draw = spin.draw, index = spin.index, "spinning for winner");
            }
            Announcement::Winner(winner) => {
                tracing::info!(
                    draw = winner.draw,
                    index = winner.index,
                    winner = %winner.display_name,
                    prize = winner.prize.as_deref().unwrap_or("-"),
                    "winner revealed"
                );
            }
            Announcement::Summary(summary) => {
                tracing::info!(
                    draw = summary.draw,
                    participants = summary.total_participants,
                    tickets = summary.total_tickets,
                    winners = ?summary.winners,
                    "lucky draw complete"
                );
            }
            Announcement::ScheduleCancelled(cancelled) => {
                tracing::warn!(
                    schedule = cancelled.schedule,
                    required = cancelled.required,
                    present = cancelled.present,
                    "scheduled draw cancelled"
                );
            }
        }
        Ok(())
    }
}

/// Keeps every announcement in memory, in arrival order.
#[derive(Clone, Debug, Default)]
pub struct RecordingPresenter {
    seen: Arc<Mutex<Vec<Announcement>>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn announcements(&self) -> Vec<Announcement> {
        self.seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }
}

impl Presenter for RecordingPresenter {
    fn present(&self, announcement: &Announcement) -> Result<()> {
        let mut seen = self
            .seen
            .lock()
            .map_err(|_| error!(RaffleError::PresentationFailure))?;
        seen.push(announcement.clone());
        Ok(())
    }
}

/// Keeps every announcement as its encoded event frame, the form an event log
/// or a remote renderer receives.
#[derive(Clone, Debug, Default)]
pub struct EventLogPresenter {
    frames: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl EventLogPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.frames
            .lock()
            .map(|frames| frames.clone())
            .unwrap_or_default()
    }

    /// Decode the stored frames back into announcements, in arrival order.
    pub fn replay(&self) -> Result<Vec<Announcement>> {
        self.frames()
            .iter()
            .map(|frame| Announcement::decode(frame))
            .collect()
    }
}

impl Presenter for EventLogPresenter {
    fn present(&self, announcement: &Announcement) -> Result<()> {
        let frame = announcement.encode();
        tracing::trace!(kind = announcement.kind(), bytes = frame.len(), "event frame");
        self.frames
            .lock()
            .map_err(|_| error!(RaffleError::PresentationFailure))?
            .push(frame);
        Ok(())
    }
}
