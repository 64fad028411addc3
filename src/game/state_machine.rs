//! Liar's Bar session state machine.
//!
//! A [`Session`] owns one game end-to-end: roster, hands, deck, revolvers,
//! table claims, turn pointer, and phase. Every operation either succeeds
//! with a state mutation or fails with a [`SessionError`] and the prior
//! state intact; validation always runs before the first write.

use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, VecDeque},
    fmt,
};
use thiserror::Error;
use uuid::Uuid;

use super::constants::{HAND_SIZE, MAX_CLAIM, MAX_PLAYERS, MIN_CLAIM, MIN_PLAYERS};
use super::entities::{Card, ChallengeOutcome, Claim, Deck, Phase, Revolver, Theme, Username};
use super::rng::GameRng;

/// Opaque session identifier.
pub type SessionId = Uuid;

/// Errors reported to callers of session operations.
///
/// All of these are validation failures: human-readable, never fatal, and
/// never leaving a half-applied mutation behind.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum SessionError {
    #[error("game already started")]
    GameAlreadyStarted,
    #[error("game is over")]
    GameOver,
    #[error("game has not started")]
    NotStarted,
    #[error("table is full")]
    CapacityReached,
    #[error("need {min}+ players")]
    NotEnoughPlayers { min: usize },
    #[error("a deck of {deck} can't deal {players} hands")]
    UnevenDeal { deck: usize, players: usize },
    #[error("not your turn")]
    NotYourTurn,
    #[error("claim must be between 1 and 5 cards, got {count}")]
    InvalidClaimCount { count: u8 },
    #[error("nothing on the table to challenge")]
    NothingToChallenge,
    #[error("can't challenge your own claim")]
    CannotChallengeSelf,
    #[error("{0} is not in this game")]
    UnknownPlayer(Username),
    #[error("invalid game state: turn index {0} out of bounds")]
    InvalidTurnIndex(usize),
}

/// Events that occur during gameplay.
///
/// The transport layer renders these into chat messages; the engine only
/// accumulates them. Rejected operations emit no events.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SessionEvent {
    PlayerJoined(Username),
    RoundStarted { theme: Theme },
    ClaimPlaced { player: Username, count: u8 },
    ChallengeCalled { challenger: Username, accused: Username, truthful: bool },
    TriggerPulled { player: Username, survived: bool },
    PlayerEliminated(Username),
    GameFinished { winner: Username },
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::PlayerJoined(player) => format!("{player} sat down at the table"),
            Self::RoundStarted { theme } => format!("the round begins: {theme} are on the table"),
            Self::ClaimPlaced { player, count } => {
                format!("{player} places {count} card(s) face down")
            }
            Self::ChallengeCalled {
                challenger,
                accused,
                truthful,
            } => {
                if *truthful {
                    format!("{challenger} calls out {accused}, but the cards don't lie")
                } else {
                    format!("{challenger} calls out {accused}, and catches a liar")
                }
            }
            Self::TriggerPulled { player, survived } => {
                if *survived {
                    format!("{player} pulls the trigger... click")
                } else {
                    format!("{player} pulls the trigger... bang")
                }
            }
            Self::PlayerEliminated(player) => format!("{player} is out of the game"),
            Self::GameFinished { winner } => format!("{winner} is the last one standing"),
        };
        write!(f, "{repr}")
    }
}

/// Game configuration settings.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameSettings {
    pub min_players: usize,
    pub max_players: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new(MIN_PLAYERS, MAX_PLAYERS)
    }
}

impl GameSettings {
    #[must_use]
    pub const fn new(min_players: usize, max_players: usize) -> Self {
        Self {
            min_players,
            max_players,
        }
    }
}

/// One game instance.
///
/// The whole record serializes flat (scalars plus JSON-structured
/// collections), which is exactly the shape the persistence contract
/// stores and reloads.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Session {
    pub id: SessionId,
    /// Opaque reference to the originating chat venue. Owned by the
    /// transport layer; only stored and passed through here.
    pub channel: String,
    /// Seating order. Insertion order on join, shrunk by elimination.
    pub roster: Vec<Username>,
    pub phase: Phase,
    pub theme: Option<Theme>,
    /// Index into `roster` of whose turn it is. Not a stable player id;
    /// `remove_player` keeps it consistent when the roster shrinks.
    pub turn_index: usize,
    /// Claims made since the last resolved challenge.
    pub table_claims: Vec<Claim>,
    pub hands: HashMap<Username, Vec<Card>>,
    pub revolvers: HashMap<Username, Revolver>,
    pub deck: Deck,
    pub settings: GameSettings,
    rng: GameRng,
    events: VecDeque<SessionEvent>,
}

impl Session {
    /// Create a session in `Waiting` with an empty roster and a freshly
    /// shuffled deck.
    #[must_use]
    pub fn new(id: SessionId, channel: &str, settings: GameSettings, mut rng: GameRng) -> Self {
        let mut deck = Deck::default();
        deck.shuffle(&mut rng);
        Self {
            id,
            channel: channel.to_string(),
            roster: Vec::with_capacity(settings.max_players),
            phase: Phase::Waiting,
            theme: None,
            turn_index: 0,
            table_claims: Vec::new(),
            hands: HashMap::with_capacity(settings.max_players),
            revolvers: HashMap::with_capacity(settings.max_players),
            deck,
            settings,
            rng,
            events: VecDeque::new(),
        }
    }

    /// Add a player to the roster. Returns whether the add occurred;
    /// joining twice is a no-op, joining a started game is an error.
    pub fn join(&mut self, player: &Username) -> Result<bool, SessionError> {
        match self.phase {
            Phase::Waiting => {}
            Phase::Playing => return Err(SessionError::GameAlreadyStarted),
            Phase::Finished => return Err(SessionError::GameOver),
        }
        if self.roster.contains(player) {
            return Ok(false);
        }
        if self.roster.len() >= self.settings.max_players {
            return Err(SessionError::CapacityReached);
        }
        self.roster.push(player.clone());
        self.events.push_back(SessionEvent::PlayerJoined(player.clone()));
        Ok(true)
    }

    /// Start the game: pick a theme, deal hands, hand out revolvers.
    ///
    /// Hands are consecutive blocks of [`HAND_SIZE`] off the reshuffled
    /// deck in roster order. Failure leaves the session untouched.
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Waiting => {}
            Phase::Playing => return Err(SessionError::GameAlreadyStarted),
            Phase::Finished => return Err(SessionError::GameOver),
        }
        if self.roster.len() < self.settings.min_players {
            return Err(SessionError::NotEnoughPlayers {
                min: self.settings.min_players,
            });
        }
        if HAND_SIZE * self.roster.len() > self.deck.cards().len() {
            return Err(SessionError::UnevenDeal {
                deck: self.deck.cards().len(),
                players: self.roster.len(),
            });
        }

        self.deck.shuffle(&mut self.rng);
        let seats = self.roster.clone();
        for player in seats {
            let hand: Vec<Card> = (0..HAND_SIZE).map(|_| self.deck.deal_card()).collect();
            self.hands.insert(player.clone(), hand);
            self.revolvers
                .insert(player, Revolver::assign(&mut self.rng));
        }
        let theme = Theme::ALL[usize::from(self.rng.roll(Theme::ALL.len() as u8))];
        self.theme = Some(theme);
        self.turn_index = 0;
        self.phase = Phase::Playing;
        self.events.push_back(SessionEvent::RoundStarted { theme });
        Ok(())
    }

    /// Place a face-down claim of `count` theme cards.
    ///
    /// Only the player at `turn_index` may claim, and hand contents are
    /// neither inspected nor removed: truth is assessed at challenge time
    /// against the claimant's whole hand.
    pub fn play_claim(&mut self, player: &Username, count: u8) -> Result<(), SessionError> {
        match self.phase {
            Phase::Playing => {}
            Phase::Waiting => return Err(SessionError::NotStarted),
            Phase::Finished => return Err(SessionError::GameOver),
        }
        if self.current_player()? != player {
            return Err(SessionError::NotYourTurn);
        }
        if !(MIN_CLAIM..=MAX_CLAIM).contains(&count) {
            return Err(SessionError::InvalidClaimCount { count });
        }
        self.table_claims.push(Claim {
            player: player.clone(),
            count,
        });
        self.turn_index = (self.turn_index + 1) % self.roster.len();
        self.events.push_back(SessionEvent::ClaimPlaced {
            player: player.clone(),
            count,
        });
        Ok(())
    }

    /// Challenge the most recent claim.
    ///
    /// A truthful claim sends the bullet to the challenger; a lie sends it
    /// to the accused. Either way the table claims are cleared.
    pub fn challenge(&mut self, challenger: &Username) -> Result<ChallengeOutcome, SessionError> {
        match self.phase {
            Phase::Playing => {}
            Phase::Waiting => return Err(SessionError::NotStarted),
            Phase::Finished => return Err(SessionError::GameOver),
        }
        if !self.roster.contains(challenger) {
            return Err(SessionError::UnknownPlayer(challenger.clone()));
        }
        let Some(claim) = self.table_claims.last() else {
            return Err(SessionError::NothingToChallenge);
        };
        let accused = claim.player.clone();
        if accused == *challenger {
            return Err(SessionError::CannotChallengeSelf);
        }
        let Some(theme) = self.theme else {
            return Err(SessionError::NotStarted);
        };

        let truthful = self
            .hands
            .get(&accused)
            .is_some_and(|hand| hand.iter().any(|card| theme.matches(*card)));
        let shooter = if truthful {
            challenger.clone()
        } else {
            accused.clone()
        };
        self.events.push_back(SessionEvent::ChallengeCalled {
            challenger: challenger.clone(),
            accused: accused.clone(),
            truthful,
        });

        let survived = self.fire_revolver(&shooter)?;
        self.table_claims.clear();
        Ok(ChallengeOutcome {
            challenger: challenger.clone(),
            accused,
            truthful,
            shooter,
            survived,
        })
    }

    /// Pull the trigger on a player's revolver. Returns whether they
    /// survived; elimination removes them from the roster and, if one
    /// player remains, finishes the game. Only a live game has triggers
    /// to pull.
    pub fn fire_revolver(&mut self, player: &Username) -> Result<bool, SessionError> {
        match self.phase {
            Phase::Playing => {}
            Phase::Waiting => return Err(SessionError::NotStarted),
            Phase::Finished => return Err(SessionError::GameOver),
        }
        let Some(revolver) = self.revolvers.get_mut(player) else {
            return Err(SessionError::UnknownPlayer(player.clone()));
        };
        let survived = revolver.pull_trigger();
        self.events.push_back(SessionEvent::TriggerPulled {
            player: player.clone(),
            survived,
        });
        if !survived {
            self.events
                .push_back(SessionEvent::PlayerEliminated(player.clone()));
            self.remove_player(player);
            if self.phase == Phase::Playing
                && let [winner] = self.roster.as_slice()
            {
                self.phase = Phase::Finished;
                self.events.push_back(SessionEvent::GameFinished {
                    winner: winner.clone(),
                });
            }
        }
        Ok(survived)
    }

    /// Whose turn it is.
    pub fn current_player(&self) -> Result<&Username, SessionError> {
        match self.phase {
            Phase::Playing => self
                .roster
                .get(self.turn_index)
                .ok_or(SessionError::InvalidTurnIndex(self.turn_index)),
            Phase::Waiting => Err(SessionError::NotStarted),
            Phase::Finished => Err(SessionError::GameOver),
        }
    }

    /// The sole survivor, once the game is finished.
    #[must_use]
    pub fn winner(&self) -> Option<&Username> {
        match (self.phase, self.roster.as_slice()) {
            (Phase::Finished, [winner]) => Some(winner),
            _ => None,
        }
    }

    /// Drain accumulated gameplay events for the transport to render.
    pub fn drain_events(&mut self) -> VecDeque<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Remove a player by identity and re-derive the turn pointer.
    ///
    /// Seats before the current one shift the index down by one; an index
    /// that falls off the end wraps to 0. The player whose turn it was
    /// keeps it unless they are the one removed, in which case the next
    /// live seat acts.
    fn remove_player(&mut self, player: &Username) {
        let Some(idx) = self.roster.iter().position(|p| p == player) else {
            return;
        };
        self.roster.remove(idx);
        self.hands.remove(player);
        self.revolvers.remove(player);
        if idx < self.turn_index {
            self.turn_index -= 1;
        }
        if self.turn_index >= self.roster.len() {
            self.turn_index = 0;
        }
    }
}
