//! Session state, its transition function, and the actor that drives it.

mod actor;
mod reducer;
mod state;
mod submitter;

pub use actor::{SessionConfig, SessionHandle, spawn_session};
pub use reducer::{Action, Effect, Transition, reduce};
pub use state::{ClaimTicket, ConnectionState, Session, SessionPhase};
pub use submitter::validate_claim;
