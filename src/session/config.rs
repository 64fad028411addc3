//! Session service configuration models.

use serde::{Deserialize, Serialize};

use crate::game::{
    GameSettings,
    constants::{DECK_SIZE, HAND_SIZE},
};

/// Configuration for sessions spawned by the manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Game rules applied to every new session.
    pub settings: GameSettings,

    /// Actor mailbox depth before senders are backpressured.
    pub mailbox_capacity: usize,

    /// Attempts per save before the actor gives up and logs an error.
    pub save_retries: u32,

    /// Backoff before the first save retry, doubled per attempt.
    pub save_retry_backoff_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            settings: GameSettings::default(),
            mailbox_capacity: 64,
            save_retries: 3,
            save_retry_backoff_ms: 50,
        }
    }
}

impl SessionConfig {
    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.settings.min_players < 2 {
            return Err("a game needs at least 2 players".to_string());
        }

        if self.settings.max_players < self.settings.min_players {
            return Err("max players must be at least min players".to_string());
        }

        if HAND_SIZE * self.settings.max_players > DECK_SIZE {
            return Err(format!(
                "a deck of {DECK_SIZE} can't deal {} hands of {HAND_SIZE}",
                self.settings.max_players
            ));
        }

        if self.mailbox_capacity == 0 {
            return Err("mailbox capacity must be nonzero".to_string());
        }

        if self.save_retries == 0 {
            return Err("save retries must be nonzero".to_string());
        }

        Ok(())
    }
}
