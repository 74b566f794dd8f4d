#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use anchor_lang::prelude::*;
use lucky_draw::events::Announcement;
use lucky_draw::history::HistorySink;
use lucky_draw::presenter::Presenter;
use lucky_draw::state::{DrawRecord, ParticipantId, RaffleConfig};
use lucky_draw::{RaffleError, RaffleRoom, RecordingPresenter, StaticAuthorizer};

pub const ROOM: &str = "evon77";

pub fn operator() -> ParticipantId {
    ParticipantId::new("op-1")
}

pub fn user(n: usize) -> ParticipantId {
    ParticipantId::new(format!("user-{n}"))
}

pub fn quick_config() -> RaffleConfig {
    RaffleConfig {
        reveal_pacing: Duration::ZERO,
        ..RaffleConfig::default()
    }
}

pub fn authorizer() -> Arc<StaticAuthorizer> {
    Arc::new(StaticAuthorizer::new([operator()]))
}

pub struct Harness {
    pub room: RaffleRoom,
    pub presenter: RecordingPresenter,
}

pub fn harness(config: RaffleConfig) -> Harness {
    harness_with(config, Arc::new(lucky_draw::MemoryHistory::new()))
}

pub fn harness_with(config: RaffleConfig, history: Arc<dyn HistorySink>) -> Harness {
    let presenter = RecordingPresenter::new();
    let room = RaffleRoom::builder(ROOM, authorizer())
        .config(config)
        .history(history)
        .presenter(Arc::new(presenter.clone()))
        .seed(77)
        .build()
        .unwrap();
    Harness { room, presenter }
}

pub async fn enter_users(room: &RaffleRoom, count: usize) {
    for n in 0..count {
        room.enter(&user(n), &format!("User{n}")).await.unwrap();
    }
}

/// History that rejects every append.
#[derive(Default)]
pub struct BrokenHistory;

impl HistorySink for BrokenHistory {
    fn append(&self, _record: &DrawRecord) -> Result<()> {
        err!(RaffleError::HistorySinkFailure)
    }

    fn list_recent(&self, _n: usize) -> Result<Vec<DrawRecord>> {
        Ok(Vec::new())
    }

    fn last_sequence(&self) -> Result<Option<u64>> {
        Ok(None)
    }
}

/// Presenter that cannot deliver anything.
#[derive(Default)]
pub struct BrokenPresenter;

impl Presenter for BrokenPresenter {
    fn present(&self, _announcement: &Announcement) -> Result<()> {
        err!(RaffleError::PresentationFailure)
    }
}
