//! Ticket-weighted lucky draws for a group chat room.
//!
//! A [`RaffleRoom`] owns the ledger of the running round. Participants enter
//! with one ticket (plus an optional bonus roll), operators adjust tickets and
//! trigger or schedule draws, and every completed draw is appended to a
//! [`HistorySink`]. Chat transport, operator lookup and rendering stay outside
//! the crate behind the [`Authorizer`] and [`Presenter`] traits.

pub mod authorizer;
pub mod bonus;
pub mod constants;
pub mod coordinator;
pub mod errors;
pub mod events;
pub mod history;
pub mod instructions;
pub mod presenter;
pub mod room;
pub mod scheduler;
pub mod selector;
pub mod state;

pub use authorizer::{Authorizer, StaticAuthorizer};
pub use coordinator::{DrawCoordinator, DrawPhase, DrawRequest, DrawResult, DrawWarning};
pub use errors::{is_raffle_error, RaffleError};
pub use history::{HistorySink, JsonlHistory, MemoryHistory};
pub use instructions::{EntryReceipt, RoomStats, TicketTarget};
pub use presenter::{EventLogPresenter, Presenter, RecordingPresenter, TracingPresenter};
pub use room::{RaffleRoom, RoomBuilder};
pub use scheduler::{ScheduleOutcome, ScheduleTicket, Scheduler};
