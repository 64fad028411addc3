//! # Liar's Bar
//!
//! A turn-based bluffing card game engine: players take turns placing
//! face-down card claims, may challenge the preceding claim, and the
//! losing party of a challenge fires a six-chamber revolver with exactly
//! one loaded chamber.
//!
//! The core game is a three-phase state machine (waiting, playing,
//! finished) owned by a [`game::Session`] value. For multi-session
//! services, the [`session`] module wraps each game in a tokio actor so
//! same-session operations serialize and different sessions run in
//! parallel, with records persisted through the [`store`] contract.
//!
//! ## Rules in brief
//!
//! - 20-card deck: 6 Queens, 6 Kings, 6 Aces, 2 Jokers; 5 cards each to
//!   exactly 4 players.
//! - One theme kind per round; Jokers always count as the theme.
//! - A claim declares a count only; hands are never consumed by claims.
//! - A challenge inspects the accused's whole hand: a truthful claim
//!   shoots the challenger, a lie shoots the accused.
//! - Elimination is by deterministic non-re-spinning revolver; the last
//!   player standing wins.
//!
//! ## Example
//!
//! ```
//! use liars_bar::game::{GameRng, GameSettings, Session, Username};
//! use uuid::Uuid;
//!
//! let mut session = Session::new(
//!     Uuid::new_v4(),
//!     "channel-1",
//!     GameSettings::default(),
//!     GameRng::new(42),
//! );
//! for name in ["alice", "bob", "carol", "dana"] {
//!     session.join(&Username::new(name)).unwrap();
//! }
//! session.start().unwrap();
//! assert!(session.theme.is_some());
//! ```

/// Core game logic, entities, and the session state machine.
pub mod game;
pub use game::{
    Card, ChallengeOutcome, Claim, Deck, GameRng, GameSettings, Phase, Revolver, Session,
    SessionError, SessionEvent, SessionId, Theme, Username, constants,
};

/// Async actor layer for running many sessions side by side.
pub mod session;
pub use session::{
    EngineError, SessionConfig, SessionManager, SessionResponse, SessionSnapshot,
};

/// Persistence contract for session records.
pub mod store;
pub use store::{MemoryStore, SessionStore, StoreError};
