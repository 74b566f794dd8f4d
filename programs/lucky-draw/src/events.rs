use anchor_lang::prelude::*;
use anchor_lang::{Discriminator, Event};

use crate::errors::RaffleError;

/// Filler emitted before each winner is revealed.
#[event]
#[derive(Clone, Debug, PartialEq)]
pub struct WheelSpun {
    pub draw: u64,
    pub index: u32,
}

#[event]
#[derive(Clone, Debug, PartialEq)]
pub struct WinnerRevealed {
    pub draw: u64,
    /// 1-based position in draw order
    pub index: u32,
    pub display_name: String,
    pub prize: Option<String>,
}

#[event]
#[derive(Clone, Debug, PartialEq)]
pub struct DrawSummarized {
    pub draw: u64,
    pub prize: Option<String>,
    pub total_participants: u32,
    pub total_tickets: u64,
    pub winners: Vec<String>,
}

#[event]
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledDrawCancelled {
    pub schedule: u64,
    pub required: u64,
    pub present: u64,
    pub prize: Option<String>,
}

/// Everything the presentation side can be asked to show.
#[derive(Clone, Debug, PartialEq)]
pub enum Announcement {
    Spin(WheelSpun),
    Winner(WinnerRevealed),
    Summary(DrawSummarized),
    ScheduleCancelled(ScheduledDrawCancelled),
}

impl Announcement {
    pub fn kind(&self) -> &'static str {
        match self {
            Announcement::Spin(_) => "spin",
            Announcement::Winner(_) => "winner",
            Announcement::Summary(_) => "summary",
            Announcement::ScheduleCancelled(_) => "schedule_cancelled",
        }
    }

    /// Discriminator-prefixed borsh frame, as carried in a program event log.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Announcement::Spin(event) => event.data(),
            Announcement::Winner(event) => event.data(),
            Announcement::Summary(event) => event.data(),
            Announcement::ScheduleCancelled(event) => event.data(),
        }
    }

    pub fn decode(frame: &[u8]) -> Result<Self> {
        if let Some(event) = decode_event::<WheelSpun>(frame) {
            return event.map(Announcement::Spin);
        }
        if let Some(event) = decode_event::<WinnerRevealed>(frame) {
            return event.map(Announcement::Winner);
        }
        if let Some(event) = decode_event::<DrawSummarized>(frame) {
            return event.map(Announcement::Summary);
        }
        if let Some(event) = decode_event::<ScheduledDrawCancelled>(frame) {
            return event.map(Announcement::ScheduleCancelled);
        }
        err!(RaffleError::PresentationFailure)
    }
}

/// `None` when the frame belongs to another event type.
fn decode_event<T>(frame: &[u8]) -> Option<Result<T>>
where
    T: Discriminator + AnchorDeserialize,
{
    let body = frame.strip_prefix(T::DISCRIMINATOR)?;
    Some(T::try_from_slice(body).map_err(|_| error!(RaffleError::PresentationFailure)))
}
