//! Transcript core: pure state machine for the Download / Copy actions.
mod effect;
mod msg;
mod share_page;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use share_page::is_share_page;
pub use state::{Action, AppState};
pub use update::update;
pub use view_model::{AppViewModel, StatusKind, StatusLine};
