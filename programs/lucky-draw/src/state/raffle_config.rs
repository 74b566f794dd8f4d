use std::time::Duration;

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::RaffleError;

/// Odds and size of the bonus tickets rolled once per entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BonusPolicy {
    pub enabled: bool,

    /// Probability in [0, 1] that an entry receives a bonus
    pub chance: f64,

    /// Inclusive bonus range
    pub min: u32,
    pub max: u32,
}

impl Default for BonusPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            chance: DEFAULT_BONUS_CHANCE,
            min: DEFAULT_BONUS_MIN,
            max: DEFAULT_BONUS_MAX,
        }
    }
}

impl BonusPolicy {
    pub fn validate(&self) -> Result<()> {
        require!(
            self.chance.is_finite() && (0.0..=1.0).contains(&self.chance),
            RaffleError::InvalidBonusChance
        );
        require!(self.min <= self.max, RaffleError::InvalidBonusRange);
        Ok(())
    }
}

/// Session configuration of a raffle room. Not persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct RaffleConfig {
    pub bonus: BonusPolicy,

    /// Gate entries on membership of `required_channel`
    pub membership_required: bool,
    pub required_channel: Option<String>,

    /// Let one participant win several prizes in the same draw
    pub allow_repeat_winners: bool,

    /// Reset the round after each draw. When off, participants stay and
    /// winners get their win counter bumped instead.
    pub clear_after_draw: bool,

    /// Pause between the spin and the reveal of each winner
    pub reveal_pacing: Duration,
}

impl Default for RaffleConfig {
    fn default() -> Self {
        Self {
            bonus: BonusPolicy::default(),
            membership_required: false,
            required_channel: None,
            allow_repeat_winners: false,
            clear_after_draw: true,
            reveal_pacing: REVEAL_PACING,
        }
    }
}

impl RaffleConfig {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Unset keys keep
    /// their defaults; unparsable values are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_REQUIRE_MEMBERSHIP) {
            config.membership_required = parse_flag(&raw);
        }
        if let Some(raw) = lookup(ENV_REQUIRED_CHANNEL) {
            config.required_channel = normalize_channel(&raw);
        }
        if let Some(raw) = lookup(ENV_BONUS_ENABLED) {
            config.bonus.enabled = parse_flag(&raw);
        }
        if let Some(chance) = lookup_value(&lookup, ENV_BONUS_CHANCE) {
            config.bonus.chance = chance;
        }
        if let Some(min) = lookup_value(&lookup, ENV_BONUS_MIN) {
            config.bonus.min = min;
        }
        if let Some(max) = lookup_value(&lookup, ENV_BONUS_MAX) {
            config.bonus.max = max;
        }
        if let Some(ms) = lookup_value::<u64, _>(&lookup, ENV_REVEAL_PACING_MS) {
            config.reveal_pacing = Duration::from_millis(ms);
        }

        config.bonus.validate()?;
        Ok(config)
    }

    /// Channel entrants must belong to, if membership is enforced.
    pub fn membership_channel(&self) -> Option<&str> {
        if !self.membership_required {
            return None;
        }
        self.required_channel.as_deref().filter(|c| !c.is_empty())
    }

    /// Apply a partial update. Nothing changes if the result is invalid.
    pub fn apply(&mut self, update: &ConfigUpdate) -> Result<()> {
        let mut next = self.clone();

        if let Some(enabled) = update.bonus_enabled {
            next.bonus.enabled = enabled;
        }
        if let Some(chance) = update.bonus_chance {
            next.bonus.chance = chance;
        }
        if let Some(min) = update.bonus_min {
            next.bonus.min = min;
        }
        if let Some(max) = update.bonus_max {
            next.bonus.max = max;
        }
        if let Some(required) = update.membership_required {
            next.membership_required = required;
        }
        if let Some(channel) = &update.required_channel {
            next.required_channel = normalize_channel(channel);
        }
        if let Some(allow) = update.allow_repeat_winners {
            next.allow_repeat_winners = allow;
        }
        if let Some(clear) = update.clear_after_draw {
            next.clear_after_draw = clear;
        }
        if let Some(pacing) = update.reveal_pacing {
            next.reveal_pacing = pacing;
        }

        next.bonus.validate()?;
        *self = next;
        Ok(())
    }
}

/// Partial configuration change requested by an operator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigUpdate {
    pub bonus_enabled: Option<bool>,
    pub bonus_chance: Option<f64>,
    pub bonus_min: Option<u32>,
    pub bonus_max: Option<u32>,
    pub membership_required: Option<bool>,
    pub required_channel: Option<String>,
    pub allow_repeat_winners: Option<bool>,
    pub clear_after_draw: Option<bool>,
    pub reveal_pacing: Option<Duration>,
}

/// Accepts `on`, `true` and `1` (any case) as enabled.
pub fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "on" | "true" | "1")
}

fn normalize_channel(raw: &str) -> Option<String> {
    let channel = raw.trim().trim_start_matches('@');
    (!channel.is_empty()).then(|| channel.to_string())
}

fn lookup_value<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable config value");
            None
        }
    }
}
