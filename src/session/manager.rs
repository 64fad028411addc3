//! Session manager for spawning and managing multiple session actors.

use std::{collections::HashMap, sync::Arc};
use thiserror::Error;
use tokio::sync::{RwLock, oneshot};
use uuid::Uuid;

use super::{
    actor::{SessionActor, SessionHandle},
    config::SessionConfig,
    messages::{SessionMessage, SessionResponse, SessionSnapshot},
};
use crate::{
    game::{GameRng, Session, SessionError, SessionId, Username},
    store::{SessionStore, StoreError},
};

/// Errors surfaced by the manager around the game engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("session {0} not found")]
    SessionNotFound(SessionId),
    #[error("session mailbox closed")]
    SessionClosed,
    #[error("invalid session config: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Game(#[from] SessionError),
}

/// Manager owning the session actors for a multi-session service.
///
/// Operations on different sessions run fully in parallel; operations on
/// the same session serialize through that session's actor mailbox.
pub struct SessionManager {
    /// Record store shared with every actor.
    store: Arc<dyn SessionStore>,

    /// Configuration applied to new sessions.
    config: SessionConfig,

    /// Active session handles.
    sessions: Arc<RwLock<HashMap<SessionId, SessionHandle>>>,
}

impl SessionManager {
    /// Create a new session manager.
    pub fn new(store: Arc<dyn SessionStore>, config: SessionConfig) -> Result<Self, EngineError> {
        config.validate().map_err(EngineError::InvalidConfig)?;
        Ok(Self {
            store,
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Create and spawn a new session for a chat venue.
    pub async fn create_session(&self, channel: &str) -> Result<SessionId, EngineError> {
        self.create_session_with_rng(channel, GameRng::from_entropy())
            .await
    }

    /// Create a session with a fixed seed. Deterministic shuffles,
    /// chambers, and theme for replay and tests.
    pub async fn create_session_seeded(
        &self,
        channel: &str,
        seed: u64,
    ) -> Result<SessionId, EngineError> {
        self.create_session_with_rng(channel, GameRng::new(seed))
            .await
    }

    async fn create_session_with_rng(
        &self,
        channel: &str,
        rng: GameRng,
    ) -> Result<SessionId, EngineError> {
        let id = Uuid::new_v4();
        let session = Session::new(id, channel, self.config.settings, rng);

        // Persist the initial record before the actor takes ownership so a
        // crash right after creation still leaves a loadable session.
        self.store.save(&session).await?;
        self.spawn(session).await;

        log::info!("created session {id} for channel {channel}");
        Ok(id)
    }

    /// Spawn an actor for a session and register its handle.
    async fn spawn(&self, session: Session) -> SessionHandle {
        let (actor, handle) =
            SessionActor::new(session, self.store.clone(), self.config.clone());

        let mut sessions = self.sessions.write().await;
        sessions.insert(handle.session_id(), handle.clone());
        drop(sessions);

        tokio::spawn(actor.run());
        handle
    }

    /// Get the handle for a session, resurrecting it from the store if no
    /// actor is live. `SessionNotFound` means the store has no record
    /// either; the caller decides whether to create a new session.
    async fn handle(&self, id: SessionId) -> Result<SessionHandle, EngineError> {
        {
            let sessions = self.sessions.read().await;
            if let Some(handle) = sessions.get(&id) {
                return Ok(handle.clone());
            }
        }

        let session = self
            .store
            .load(id)
            .await?
            .ok_or(EngineError::SessionNotFound(id))?;
        log::info!("resumed session {id} from store");
        Ok(self.spawn(session).await)
    }

    /// Join a player into a session.
    pub async fn join(
        &self,
        id: SessionId,
        player: &Username,
    ) -> Result<SessionResponse, EngineError> {
        let handle = self.handle(id).await?;
        let (tx, rx) = oneshot::channel();
        handle
            .send(SessionMessage::Join {
                player: player.clone(),
                respond_to: tx,
            })
            .await
            .map_err(|_| EngineError::SessionClosed)?;
        rx.await.map_err(|_| EngineError::SessionClosed)
    }

    /// Start a session's game.
    pub async fn start(&self, id: SessionId) -> Result<SessionResponse, EngineError> {
        let handle = self.handle(id).await?;
        let (tx, rx) = oneshot::channel();
        handle
            .send(SessionMessage::Start { respond_to: tx })
            .await
            .map_err(|_| EngineError::SessionClosed)?;
        rx.await.map_err(|_| EngineError::SessionClosed)
    }

    /// Place a claim on behalf of a player.
    pub async fn play_claim(
        &self,
        id: SessionId,
        player: &Username,
        count: u8,
    ) -> Result<SessionResponse, EngineError> {
        let handle = self.handle(id).await?;
        let (tx, rx) = oneshot::channel();
        handle
            .send(SessionMessage::PlayClaim {
                player: player.clone(),
                count,
                respond_to: tx,
            })
            .await
            .map_err(|_| EngineError::SessionClosed)?;
        rx.await.map_err(|_| EngineError::SessionClosed)
    }

    /// Challenge the most recent claim.
    pub async fn challenge(
        &self,
        id: SessionId,
        player: &Username,
    ) -> Result<SessionResponse, EngineError> {
        let handle = self.handle(id).await?;
        let (tx, rx) = oneshot::channel();
        handle
            .send(SessionMessage::Challenge {
                player: player.clone(),
                respond_to: tx,
            })
            .await
            .map_err(|_| EngineError::SessionClosed)?;
        rx.await.map_err(|_| EngineError::SessionClosed)
    }

    /// Get a read-only snapshot of a session.
    pub async fn get_state(&self, id: SessionId) -> Result<SessionSnapshot, EngineError> {
        let handle = self.handle(id).await?;
        let (tx, rx) = oneshot::channel();
        handle
            .send(SessionMessage::GetState { respond_to: tx })
            .await
            .map_err(|_| EngineError::SessionClosed)?;
        rx.await.map_err(|_| EngineError::SessionClosed)
    }

    /// Shut a session's actor down. The stored record stays behind so the
    /// session can be resumed later.
    pub async fn close_session(&self, id: SessionId) -> Result<(), EngineError> {
        let handle = {
            let mut sessions = self.sessions.write().await;
            sessions.remove(&id)
        };
        let Some(handle) = handle else {
            return Err(EngineError::SessionNotFound(id));
        };

        let (tx, rx) = oneshot::channel();
        handle
            .send(SessionMessage::Close { respond_to: tx })
            .await
            .map_err(|_| EngineError::SessionClosed)?;
        rx.await.map_err(|_| EngineError::SessionClosed)?;

        log::info!("closed session {id}");
        Ok(())
    }

    /// Delete a session: stop its actor if live and drop the record.
    pub async fn delete_session(&self, id: SessionId) -> Result<(), EngineError> {
        // A missing live actor is fine; the record is removed either way.
        let _ = self.close_session(id).await;
        self.store.delete(id).await?;
        log::info!("deleted session {id}");
        Ok(())
    }

    /// Get active session count.
    pub async fn active_session_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }
}
