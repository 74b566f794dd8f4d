pub mod config_update;
pub mod draw_run;
pub mod draw_schedule;
pub mod history_list;
pub mod participants_clear;
pub mod participants_list;
pub mod stats_view;
pub mod ticket_adjust;
pub mod ticket_enter;

pub use config_update::*;
pub use draw_run::*;
pub use draw_schedule::*;
pub use history_list::*;
pub use participants_clear::*;
pub use participants_list::*;
pub use stats_view::*;
pub use ticket_adjust::*;
pub use ticket_enter::*;
