//! Session actor message types.

use tokio::sync::oneshot;

use crate::game::{
    ChallengeOutcome, Phase, SessionError, SessionEvent, SessionId, Theme, Username,
};

/// Messages that can be sent to a `SessionActor`.
#[derive(Debug)]
pub enum SessionMessage {
    /// Add a player to the roster.
    Join {
        player: Username,
        respond_to: oneshot::Sender<SessionResponse>,
    },

    /// Start the game (deal hands, arm revolvers, pick the theme).
    Start {
        respond_to: oneshot::Sender<SessionResponse>,
    },

    /// Place a face-down claim.
    PlayClaim {
        player: Username,
        count: u8,
        respond_to: oneshot::Sender<SessionResponse>,
    },

    /// Challenge the most recent claim.
    Challenge {
        player: Username,
        respond_to: oneshot::Sender<SessionResponse>,
    },

    /// Get a read-only snapshot of the session.
    GetState {
        respond_to: oneshot::Sender<SessionSnapshot>,
    },

    /// Shut the actor down. The stored record stays behind.
    Close {
        respond_to: oneshot::Sender<SessionResponse>,
    },
}

/// Response from session operations.
///
/// Successful responses carry the gameplay events drained by the
/// operation so the transport can render them without another round trip.
#[derive(Debug, Clone)]
pub enum SessionResponse {
    /// Player joined (or was already seated, `added == false`).
    Joined {
        added: bool,
        events: Vec<SessionEvent>,
    },

    /// Game started with the chosen theme.
    Started {
        theme: Theme,
        events: Vec<SessionEvent>,
    },

    /// Claim accepted; `next_player` now holds the turn.
    ClaimAccepted {
        next_player: Username,
        events: Vec<SessionEvent>,
    },

    /// Challenge resolved, trigger pulled.
    ChallengeResolved {
        outcome: ChallengeOutcome,
        events: Vec<SessionEvent>,
    },

    /// Actor shut down.
    Closed,

    /// Operation rejected; prior state intact.
    Error(SessionError),
}

impl SessionResponse {
    /// Check if response is success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self, SessionResponse::Error(_))
    }

    /// Get error message if response is an error.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match self {
            SessionResponse::Error(err) => Some(err.to_string()),
            _ => None,
        }
    }

    /// Gameplay events carried by a successful response.
    #[must_use]
    pub fn events(&self) -> &[SessionEvent] {
        match self {
            SessionResponse::Joined { events, .. }
            | SessionResponse::Started { events, .. }
            | SessionResponse::ClaimAccepted { events, .. }
            | SessionResponse::ChallengeResolved { events, .. } => events,
            _ => &[],
        }
    }
}

/// Read-only session snapshot.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionSnapshot {
    /// Session ID.
    pub session_id: SessionId,

    /// Opaque chat venue reference.
    pub channel: String,

    /// Current game phase.
    pub phase: Phase,

    /// Theme for the round, once playing.
    pub theme: Option<Theme>,

    /// Player names in seating order.
    pub players: Vec<String>,

    /// Unresolved claims on the table.
    pub claim_count: usize,

    /// Whose turn it is, while playing.
    pub current_player: Option<String>,

    /// The sole survivor, once finished.
    pub winner: Option<String>,
}
