use std::sync::Arc;

use anchor_lang::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::watch;

use crate::authorizer::{Authorizer, RoomId};
use crate::coordinator::{DrawCoordinator, DrawPhase, DrawRequest, DrawResult, RoomState};
use crate::history::{HistorySink, MemoryHistory};
use crate::instructions::{self, EntryReceipt, RoomStats, TicketTarget};
use crate::presenter::{Presenter, TracingPresenter};
use crate::scheduler::{ScheduleTicket, Scheduler};
use crate::state::{
    ConfigUpdate, DrawRecord, LedgerSnapshot, Participant, ParticipantId, RaffleConfig,
    ScheduleId, ScheduleRequest, ScheduledDraw,
};

/// One raffle room: the ledger of the running round plus everything needed to
/// draw it.
///
/// Cloning is cheap and every clone drives the same room.
#[derive(Clone)]
pub struct RaffleRoom {
    inner: Arc<RoomInner>,
}

struct RoomInner {
    id: RoomId,
    state: Arc<RoomState>,
    authorizer: Arc<dyn Authorizer>,
    coordinator: Arc<DrawCoordinator>,
    scheduler: Scheduler,
}

pub struct RoomBuilder {
    id: RoomId,
    authorizer: Arc<dyn Authorizer>,
    config: RaffleConfig,
    history: Arc<dyn HistorySink>,
    presenter: Arc<dyn Presenter>,
    seed: Option<u64>,
}

impl RoomBuilder {
    pub fn config(mut self, config: RaffleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn history(mut self, history: Arc<dyn HistorySink>) -> Self {
        self.history = history;
        self
    }

    pub fn presenter(mut self, presenter: Arc<dyn Presenter>) -> Self {
        self.presenter = presenter;
        self
    }

    /// Seed the room's random source for reproducible bonuses and draws.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Must be called within a tokio runtime; scheduled draws are spawned on it.
    pub fn build(self) -> Result<RaffleRoom> {
        self.config.bonus.validate()?;

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = Arc::new(RoomState::new(self.config, rng));
        let coordinator = Arc::new(DrawCoordinator::new(
            Arc::clone(&state),
            self.history,
            self.presenter,
        )?);
        let scheduler = Scheduler::new(Arc::clone(&state), Arc::clone(&coordinator));

        tracing::info!(room = %self.id, "raffle room opened");

        Ok(RaffleRoom {
            inner: Arc::new(RoomInner {
                id: self.id,
                state,
                authorizer: self.authorizer,
                coordinator,
                scheduler,
            }),
        })
    }
}

impl RaffleRoom {
    pub fn builder(id: impl Into<RoomId>, authorizer: Arc<dyn Authorizer>) -> RoomBuilder {
        RoomBuilder {
            id: id.into(),
            authorizer,
            config: RaffleConfig::default(),
            history: Arc::new(MemoryHistory::new()),
            presenter: Arc::new(TracingPresenter),
            seed: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub(crate) fn state(&self) -> &RoomState {
        &self.inner.state
    }

    pub(crate) fn authorizer(&self) -> &dyn Authorizer {
        self.inner.authorizer.as_ref()
    }

    pub(crate) fn coordinator(&self) -> &Arc<DrawCoordinator> {
        &self.inner.coordinator
    }

    pub(crate) fn scheduler(&self) -> &Scheduler {
        &self.inner.scheduler
    }

    pub fn phase(&self) -> DrawPhase {
        self.inner.coordinator.phase()
    }

    pub fn watch_phase(&self) -> watch::Receiver<DrawPhase> {
        self.inner.coordinator.subscribe()
    }

    pub async fn participant(&self, id: &ParticipantId) -> Option<Participant> {
        self.state().ledger.lock().await.participant(id).cloned()
    }

    pub async fn participant_count(&self) -> usize {
        self.state().ledger.lock().await.len()
    }

    /// Tear the room down, aborting pending scheduled draws.
    pub async fn shutdown(&self) -> usize {
        let aborted = self.inner.scheduler.shutdown().await;
        tracing::info!(room = %self.inner.id, aborted, "raffle room closed");
        aborted
    }

    pub async fn enter(&self, actor: &ParticipantId, display_name: &str) -> Result<EntryReceipt> {
        instructions::enter(self, actor, display_name).await
    }

    pub async fn participants(&self, actor: &ParticipantId) -> Result<LedgerSnapshot> {
        instructions::list_participants(self, actor).await
    }

    pub async fn add_tickets(
        &self,
        actor: &ParticipantId,
        target: TicketTarget,
        delta: i64,
        create_as: Option<&str>,
    ) -> Result<Participant> {
        instructions::add_tickets(self, actor, target, delta, create_as).await
    }

    pub async fn set_tickets(
        &self,
        actor: &ParticipantId,
        target: TicketTarget,
        value: i64,
    ) -> Result<Participant> {
        instructions::set_tickets(self, actor, target, value).await
    }

    pub async fn reset_tickets(
        &self,
        actor: &ParticipantId,
        target: TicketTarget,
    ) -> Result<Participant> {
        instructions::reset_tickets(self, actor, target).await
    }

    pub async fn clear(&self, actor: &ParticipantId) -> Result<usize> {
        instructions::clear_participants(self, actor).await
    }

    pub async fn draw(&self, actor: &ParticipantId, request: DrawRequest) -> Result<DrawResult> {
        instructions::draw(self, actor, request).await
    }

    pub async fn schedule(
        &self,
        actor: &ParticipantId,
        request: ScheduleRequest,
    ) -> Result<ScheduleTicket> {
        instructions::schedule_draw(self, actor, request).await
    }

    pub async fn cancel_schedule(
        &self,
        actor: &ParticipantId,
        id: ScheduleId,
    ) -> Result<ScheduledDraw> {
        instructions::cancel_scheduled_draw(self, actor, id).await
    }

    pub async fn scheduled(&self, actor: &ParticipantId) -> Result<Vec<ScheduledDraw>> {
        instructions::list_scheduled_draws(self, actor).await
    }

    pub async fn update_config(
        &self,
        actor: &ParticipantId,
        update: ConfigUpdate,
    ) -> Result<RaffleConfig> {
        instructions::update_config(self, actor, update).await
    }

    pub async fn config(&self, actor: &ParticipantId) -> Result<RaffleConfig> {
        instructions::view_config(self, actor).await
    }

    pub async fn history(&self, n: Option<usize>) -> Result<Vec<DrawRecord>> {
        instructions::list_history(self, n).await
    }

    pub async fn stats(&self) -> Result<RoomStats> {
        instructions::room_stats(self).await
    }
}
