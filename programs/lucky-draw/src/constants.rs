use std::time::Duration;

pub const BASE_TICKETS: u32 = 1;
pub const MIN_TICKETS: u32 = 1;

pub const DEFAULT_BONUS_CHANCE: f64 = 0.15;
pub const DEFAULT_BONUS_MIN: u32 = 2;
pub const DEFAULT_BONUS_MAX: u32 = 3;

pub const DEFAULT_WINNER_COUNT: u32 = 1;
pub const DEFAULT_MIN_PARTICIPANTS: usize = 1;

pub const DEFAULT_HISTORY_LEN: usize = 10;
pub const STATS_TOP_LEN: usize = 5;

pub const REVEAL_PACING: Duration = Duration::from_millis(1200);

pub const MAX_PRIZE_LEN: usize = 128;
pub const MAX_DISPLAY_NAME_LEN: usize = 64;

pub const ENV_REQUIRE_MEMBERSHIP: &str = "REQUIRE_MEMBERSHIP";
pub const ENV_REQUIRED_CHANNEL: &str = "REQUIRED_CHANNEL";
pub const ENV_BONUS_ENABLED: &str = "BONUS_ENABLED";
pub const ENV_BONUS_CHANCE: &str = "BONUS_CHANCE";
pub const ENV_BONUS_MIN: &str = "BONUS_MIN";
pub const ENV_BONUS_MAX: &str = "BONUS_MAX";
pub const ENV_REVEAL_PACING_MS: &str = "REVEAL_PACING_MS";
