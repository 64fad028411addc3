//! Session actor implementation with async message handling.
//!
//! One actor owns one [`Session`], which gives each session the
//! single-writer discipline the engine requires: operations on the same
//! session are serialized through the mailbox, operations on different
//! sessions run fully in parallel.

use std::sync::Arc;
use tokio::{sync::mpsc, time::Duration};

use super::{
    config::SessionConfig,
    messages::{SessionMessage, SessionResponse, SessionSnapshot},
};
use crate::{
    game::{Session, SessionId},
    store::SessionStore,
};

/// Session actor handle for sending messages.
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionMessage>,
    session_id: SessionId,
}

impl SessionHandle {
    /// Create a new session handle.
    #[must_use]
    pub fn new(sender: mpsc::Sender<SessionMessage>, session_id: SessionId) -> Self {
        Self { sender, session_id }
    }

    /// Get session ID.
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Send a message to the session actor.
    pub async fn send(&self, message: SessionMessage) -> Result<(), String> {
        self.sender
            .send(message)
            .await
            .map_err(|_| "session is closed".to_string())
    }
}

/// Actor managing a single game session.
pub struct SessionActor {
    /// The owned game state.
    session: Session,

    /// Message inbox.
    inbox: mpsc::Receiver<SessionMessage>,

    /// Store for mutate-then-persist record writes.
    store: Arc<dyn SessionStore>,

    /// Save retry policy.
    config: SessionConfig,

    /// Set once a Close message is handled.
    is_closed: bool,
}

impl SessionActor {
    /// Create a new session actor and its handle.
    pub fn new(
        session: Session,
        store: Arc<dyn SessionStore>,
        config: SessionConfig,
    ) -> (Self, SessionHandle) {
        let (sender, inbox) = mpsc::channel(config.mailbox_capacity);
        let session_id = session.id;

        let actor = Self {
            session,
            inbox,
            store,
            config,
            is_closed: false,
        };
        let handle = SessionHandle::new(sender, session_id);

        (actor, handle)
    }

    /// Run the session actor event loop.
    pub async fn run(mut self) {
        log::info!(
            "session {} open in channel {}",
            self.session.id,
            self.session.channel
        );

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message).await;

            if self.is_closed {
                break;
            }
        }

        log::info!("session {} closed", self.session.id);
    }

    /// Handle a session message.
    async fn handle_message(&mut self, message: SessionMessage) {
        match message {
            SessionMessage::Join { player, respond_to } => {
                let response = match self.session.join(&player) {
                    Ok(added) => {
                        let events = self.persist_and_drain().await;
                        SessionResponse::Joined { added, events }
                    }
                    Err(err) => SessionResponse::Error(err),
                };
                let _ = respond_to.send(response);
            }

            SessionMessage::Start { respond_to } => {
                let response = match self.session.start() {
                    Ok(()) => {
                        let events = self.persist_and_drain().await;
                        // start() set the theme; the fallback is unreachable
                        // but keeps the response infallible.
                        let theme = self.session.theme.unwrap_or(crate::game::Theme::Queen);
                        SessionResponse::Started { theme, events }
                    }
                    Err(err) => SessionResponse::Error(err),
                };
                let _ = respond_to.send(response);
            }

            SessionMessage::PlayClaim {
                player,
                count,
                respond_to,
            } => {
                let response = match self.session.play_claim(&player, count) {
                    Ok(()) => {
                        let events = self.persist_and_drain().await;
                        match self.session.current_player() {
                            Ok(next_player) => SessionResponse::ClaimAccepted {
                                next_player: next_player.clone(),
                                events,
                            },
                            Err(err) => SessionResponse::Error(err),
                        }
                    }
                    Err(err) => SessionResponse::Error(err),
                };
                let _ = respond_to.send(response);
            }

            SessionMessage::Challenge { player, respond_to } => {
                let response = match self.session.challenge(&player) {
                    Ok(outcome) => {
                        let events = self.persist_and_drain().await;
                        SessionResponse::ChallengeResolved { outcome, events }
                    }
                    Err(err) => SessionResponse::Error(err),
                };
                let _ = respond_to.send(response);
            }

            SessionMessage::GetState { respond_to } => {
                let _ = respond_to.send(self.snapshot());
            }

            SessionMessage::Close { respond_to } => {
                self.is_closed = true;
                let _ = respond_to.send(SessionResponse::Closed);
            }
        }
    }

    /// Persist the mutated record, then drain gameplay events.
    ///
    /// Saves are whole-record and idempotent, so the retry loop is safe to
    /// re-run; after the last attempt the in-memory state stays
    /// authoritative and the failure is logged.
    async fn persist_and_drain(&mut self) -> Vec<crate::game::SessionEvent> {
        let mut backoff = Duration::from_millis(self.config.save_retry_backoff_ms);
        for attempt in 1..=self.config.save_retries {
            match self.store.save(&self.session).await {
                Ok(()) => break,
                Err(err) if attempt < self.config.save_retries => {
                    log::warn!(
                        "session {}: save attempt {attempt} failed: {err}",
                        self.session.id
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                Err(err) => {
                    log::error!(
                        "session {}: giving up on save after {attempt} attempts: {err}",
                        self.session.id
                    );
                }
            }
        }
        self.session.drain_events().into()
    }

    /// Build a read-only snapshot of the session.
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session.id,
            channel: self.session.channel.clone(),
            phase: self.session.phase,
            theme: self.session.theme,
            players: self
                .session
                .roster
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            claim_count: self.session.table_claims.len(),
            current_player: self
                .session
                .current_player()
                .ok()
                .map(|p| p.as_str().to_string()),
            winner: self.session.winner().map(|p| p.as_str().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameRng, GameSettings, Phase, Username};
    use crate::store::MemoryStore;
    use tokio::sync::oneshot;
    use uuid::Uuid;

    async fn spawn_actor(store: Arc<MemoryStore>) -> SessionHandle {
        let session = Session::new(
            Uuid::new_v4(),
            "channel-7",
            GameSettings::default(),
            GameRng::new(21),
        );
        let (actor, handle) = SessionActor::new(session, store, SessionConfig::default());
        tokio::spawn(actor.run());
        handle
    }

    async fn request(
        handle: &SessionHandle,
        build: impl FnOnce(oneshot::Sender<SessionResponse>) -> SessionMessage,
    ) -> SessionResponse {
        let (tx, rx) = oneshot::channel();
        handle.send(build(tx)).await.unwrap();
        rx.await.unwrap()
    }

    #[tokio::test]
    async fn test_join_persists_record() {
        let store = Arc::new(MemoryStore::new());
        let handle = spawn_actor(store.clone()).await;

        let response = request(&handle, |tx| SessionMessage::Join {
            player: Username::new("alice"),
            respond_to: tx,
        })
        .await;
        assert!(matches!(
            response,
            SessionResponse::Joined { added: true, .. }
        ));

        let stored = store.load(handle.session_id()).await.unwrap().unwrap();
        assert_eq!(stored.roster, vec![Username::new("alice")]);
    }

    #[tokio::test]
    async fn test_rejected_operation_returns_error_response() {
        let store = Arc::new(MemoryStore::new());
        let handle = spawn_actor(store).await;

        let response = request(&handle, |tx| SessionMessage::Start { respond_to: tx }).await;
        assert!(!response.is_success());
        assert_eq!(response.error_message(), Some("need 4+ players".to_string()));
    }

    #[tokio::test]
    async fn test_snapshot_reflects_phase() {
        let store = Arc::new(MemoryStore::new());
        let handle = spawn_actor(store).await;

        for name in ["alice", "bob", "carol", "dana"] {
            request(&handle, |tx| SessionMessage::Join {
                player: Username::new(name),
                respond_to: tx,
            })
            .await;
        }
        request(&handle, |tx| SessionMessage::Start { respond_to: tx }).await;

        let (tx, rx) = oneshot::channel();
        handle
            .send(SessionMessage::GetState { respond_to: tx })
            .await
            .unwrap();
        let snapshot = rx.await.unwrap();
        assert_eq!(snapshot.phase, Phase::Playing);
        assert_eq!(snapshot.current_player, Some("alice".to_string()));
        assert_eq!(snapshot.players.len(), 4);
    }

    #[tokio::test]
    async fn test_close_stops_the_actor() {
        let store = Arc::new(MemoryStore::new());
        let handle = spawn_actor(store).await;

        let response = request(&handle, |tx| SessionMessage::Close { respond_to: tx }).await;
        assert!(matches!(response, SessionResponse::Closed));

        // Give the actor task a beat to drop its inbox.
        tokio::time::sleep(Duration::from_millis(20)).await;

        let (tx, _rx) = oneshot::channel();
        let send_result = handle
            .send(SessionMessage::GetState { respond_to: tx })
            .await;
        assert!(send_result.is_err());
    }
}
