//! Raffle room state

pub mod draw_record;
pub mod participant;
pub mod raffle_config;
pub mod scheduled_draw;
pub mod ticket_ledger;

pub use draw_record::*;
pub use participant::*;
pub use raffle_config::*;
pub use scheduled_draw::*;
pub use ticket_ledger::*;
