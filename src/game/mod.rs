//! Liar's Bar game engine - core state machine and game logic.
//!
//! This module provides the foundational game implementation including:
//! - The three-phase session state machine (waiting, playing, finished)
//! - Roster management, dealing, and the revolver elimination mechanic
//! - Claim/challenge resolution and event generation
//! - Seedable randomness for deterministic replay under test

pub mod constants;
pub mod entities;
pub mod rng;
pub mod state_machine;

pub use entities::{Card, ChallengeOutcome, Claim, Deck, Phase, Revolver, Theme, Username};
pub use rng::{GameRng, GameRngState};
pub use state_machine::{GameSettings, Session, SessionError, SessionEvent, SessionId};
