use std::fmt;
use std::time::Duration;

use anchor_lang::prelude::*;
use chrono::{DateTime, NaiveTime, TimeZone, Utc};

use crate::constants::{DEFAULT_MIN_PARTICIPANTS, DEFAULT_WINNER_COUNT};
use crate::errors::RaffleError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleId(pub u64);

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// When a scheduled draw fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// Relative to the moment the draw is scheduled
    After(Duration),

    /// Absolute instant, must be in the future
    At(DateTime<Utc>),

    /// Next occurrence of a wall-clock time (UTC); tomorrow if already past
    DailyAt(NaiveTime),
}

impl Trigger {
    /// Resolve the trigger to an absolute instant relative to `now`.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        match *self {
            Trigger::After(delay) => {
                let delay = chrono::Duration::from_std(delay)
                    .map_err(|_| error!(RaffleError::InvalidCalculation))?;
                now.checked_add_signed(delay)
                    .ok_or_else(|| error!(RaffleError::InvalidCalculation))
            }
            Trigger::At(at) => {
                require!(at > now, RaffleError::ScheduleInPast);
                Ok(at)
            }
            Trigger::DailyAt(time) => Ok(next_daily_occurrence(now, time)),
        }
    }
}

/// Next instant strictly after `now` whose UTC wall-clock time is `time`.
pub fn next_daily_occurrence(now: DateTime<Utc>, time: NaiveTime) -> DateTime<Utc> {
    let today = Utc.from_utc_datetime(&now.date_naive().and_time(time));
    if today <= now {
        today + chrono::Duration::days(1)
    } else {
        today
    }
}

/// Operator request to run a draw later.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub trigger: Trigger,
    pub winners: u32,
    pub prize: Option<String>,

    /// Cancel instead of drawing when fewer participants are present
    pub min_participants: usize,
}

impl ScheduleRequest {
    /// Single-winner draw without a prize that needs one participant.
    pub fn new(trigger: Trigger) -> Self {
        Self {
            trigger,
            winners: DEFAULT_WINNER_COUNT,
            prize: None,
            min_participants: DEFAULT_MIN_PARTICIPANTS,
        }
    }
}

/// A registered, not yet fired scheduled draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledDraw {
    pub id: ScheduleId,
    pub fires_at: DateTime<Utc>,
    pub winners: u32,
    pub prize: Option<String>,
    pub min_participants: usize,
    pub created_at: DateTime<Utc>,
}
