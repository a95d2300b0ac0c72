//! # livefact-client
//!
//! Session/state-reconciliation layer for a real-time fact-checking backend.
//!
//! ## Data Flow
//!
//! `transport` (WebSocket frames) → `decoder` (typed [`InboundEvent`]s) →
//! `session` (pure reducer over an immutable [`Session`] snapshot) →
//! observers via [`SessionHandle::subscribe`].
//!
//! Manual claim checks go through [`transport::http::ClaimChecker`] and land
//! in the same reducer, so the result list has a single writer.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `decoder` | Raw payload → zero or more [`InboundEvent`]s |
//! | `transport` | Connection lifecycle events, socket ownership, HTTP claim channel |
//! | `session` | State, reducer, claim submitter, actor + handle |

#![deny(unsafe_code)]

pub mod decoder;
pub mod session;
pub mod transport;

pub use decoder::{InboundEvent, decode};
pub use session::{
    Action, ClaimTicket, ConnectionState, Effect, Session, SessionConfig, SessionHandle, SessionPhase,
    Transition, reduce, spawn_session,
};
