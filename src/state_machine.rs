//! Planning session state machine
//!
//! Pure transitions over `TravelState`: provider calls and replies are
//! returned as effects for the runtime to execute.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{TravelState, TravelStep};
pub use transition::{transition, TransitionError};
