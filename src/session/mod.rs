//! Session service providing multi-session support with an async actor
//! model.
//!
//! This module implements:
//! - `SessionActor`: async actor owning a single game session
//! - `SessionManager`: spawns, resumes, and routes to session actors
//! - Message-based communication with tokio channels
//! - Session configuration and lifecycle management
//!
//! ## Architecture
//!
//! Each session runs in a separate tokio task with an mpsc message inbox,
//! which is what serializes writers per session id. The `SessionManager`
//! spawns and tracks `SessionActor` instances, resurrects sessions from
//! the record store on demand, and cleans them up on close.

pub mod actor;
pub mod config;
pub mod manager;
pub mod messages;

pub use actor::{SessionActor, SessionHandle};
pub use config::SessionConfig;
pub use manager::{EngineError, SessionManager};
pub use messages::{SessionMessage, SessionResponse, SessionSnapshot};
