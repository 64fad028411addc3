use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::constants::{self, CYLINDER_SIZE, DECK_SIZE, JOKER_COPIES, THEMED_COPIES};
use super::rng::GameRng;

/// A card kind. The deck carries no suits or values, only kinds:
/// 6 Queens, 6 Kings, 6 Aces, and 2 Jokers.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Card {
    Queen,
    King,
    Ace,
    Joker,
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Queen => "Q",
            Self::King => "K",
            Self::Ace => "A",
            Self::Joker => "J*",
        };
        write!(f, "{repr}")
    }
}

/// The "truth" kind for a round. Jokers match every theme.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Theme {
    Queen,
    King,
    Ace,
}

impl Theme {
    pub const ALL: [Self; 3] = [Self::Queen, Self::King, Self::Ace];

    /// Whether a card counts as truthful under this theme.
    #[must_use]
    pub fn matches(self, card: Card) -> bool {
        match (self, card) {
            (_, Card::Joker) => true,
            (Self::Queen, Card::Queen) => true,
            (Self::King, Card::King) => true,
            (Self::Ace, Card::Ace) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Queen => "Queens",
            Self::King => "Kings",
            Self::Ace => "Aces",
        };
        write!(f, "{repr}")
    }
}

/// The 20-card deck. Reshuffled once per deal; cards past `deal_idx`
/// stay in the deck as an unused reserve.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Deck {
    cards: Vec<Card>,
    deal_idx: usize,
}

impl Deck {
    pub fn deal_card(&mut self) -> Card {
        let card = self.cards[self.deal_idx];
        self.deal_idx += 1;
        card
    }

    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.cards);
        self.deal_idx = 0;
    }

    /// Cards not yet dealt.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.deal_idx
    }

    /// All cards in deck order, dealt and reserve alike.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl Default for Deck {
    fn default() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for kind in [Card::Queen, Card::King, Card::Ace] {
            cards.extend(std::iter::repeat_n(kind, THEMED_COPIES));
        }
        cards.extend(std::iter::repeat_n(Card::Joker, JOKER_COPIES));
        Self { cards, deal_idx: 0 }
    }
}

/// A player name. Whitespace is replaced and overlong names truncated so
/// names are safe to echo back into chat transports.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Username(String);

impl Username {
    pub fn new(s: &str) -> Self {
        let mut name: String = s
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect();
        name.truncate(constants::MAX_NAME_LENGTH);
        Self(name)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for Username {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

impl From<&str> for Username {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Username {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

/// A face-down declaration: "I put down `count` of the theme kind."
/// Card identities are never recorded, only the declared count.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Claim {
    pub player: Username,
    pub count: u8,
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} claims {} card(s)", self.player, self.count)
    }
}

/// Per-player elimination device.
///
/// One chamber is loaded at assignment and never moves. The trigger
/// position starts at 0 and advances by one on every survived pull, so a
/// player fires at most [`CYLINDER_SIZE`] times before the loaded chamber
/// comes up.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Revolver {
    pub chamber: u8,
    pub position: u8,
}

impl Revolver {
    /// Spin up a revolver with a uniformly random loaded chamber.
    pub fn assign(rng: &mut GameRng) -> Self {
        Self {
            chamber: rng.roll(CYLINDER_SIZE),
            position: 0,
        }
    }

    /// Fixed-chamber constructor for tests and record restore.
    #[must_use]
    pub fn with_chamber(chamber: u8) -> Self {
        Self {
            chamber: chamber % CYLINDER_SIZE,
            position: 0,
        }
    }

    /// Pull the trigger. Returns whether the player survived; on survival
    /// the cylinder advances to the next chamber.
    pub fn pull_trigger(&mut self) -> bool {
        if self.position == self.chamber {
            return false;
        }
        self.position = (self.position + 1) % CYLINDER_SIZE;
        true
    }

    /// Survived pulls remaining before the loaded chamber comes up.
    #[must_use]
    pub fn pulls_until_fatal(&self) -> u8 {
        (self.chamber + CYLINDER_SIZE - self.position) % CYLINDER_SIZE
    }
}

/// Session lifecycle phase.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Waiting,
    Playing,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Waiting => "waiting",
            Self::Playing => "playing",
            Self::Finished => "finished",
        };
        write!(f, "{repr}")
    }
}

/// Resolution of a challenge against the most recent claim.
///
/// If the claim was truthful the challenger fires; if it was a lie the
/// accused fires. That asymmetry is the whole bluffing incentive.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ChallengeOutcome {
    pub challenger: Username,
    pub accused: Username,
    /// Whether the accused's hand held at least one theme card or Joker.
    pub truthful: bool,
    pub shooter: Username,
    pub survived: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Card / Theme tests ===

    #[test]
    fn test_joker_matches_every_theme() {
        for theme in Theme::ALL {
            assert!(theme.matches(Card::Joker));
        }
    }

    #[test]
    fn test_theme_matches_own_kind_only() {
        assert!(Theme::Queen.matches(Card::Queen));
        assert!(!Theme::Queen.matches(Card::King));
        assert!(!Theme::Queen.matches(Card::Ace));
        assert!(Theme::King.matches(Card::King));
        assert!(!Theme::King.matches(Card::Ace));
        assert!(Theme::Ace.matches(Card::Ace));
        assert!(!Theme::Ace.matches(Card::Queen));
    }

    // === Deck tests ===

    #[test]
    fn test_deck_composition() {
        let deck = Deck::default();
        assert_eq!(deck.cards().len(), DECK_SIZE);
        for kind in [Card::Queen, Card::King, Card::Ace] {
            let copies = deck.cards().iter().filter(|c| **c == kind).count();
            assert_eq!(copies, THEMED_COPIES);
        }
        let jokers = deck.cards().iter().filter(|c| **c == Card::Joker).count();
        assert_eq!(jokers, JOKER_COPIES);
    }

    #[test]
    fn test_deck_shuffle_resets_deal_index() {
        let mut deck = Deck::default();
        let mut rng = GameRng::new(1);
        deck.deal_card();
        deck.deal_card();
        deck.shuffle(&mut rng);
        assert_eq!(deck.remaining(), DECK_SIZE);
    }

    #[test]
    fn test_deck_deal_advances() {
        let mut deck = Deck::default();
        for i in 1..=5 {
            deck.deal_card();
            assert_eq!(deck.remaining(), DECK_SIZE - i);
        }
    }

    // === Username tests ===

    #[test]
    fn test_username_sanitizes_whitespace() {
        let name = Username::new("billy the kid");
        assert_eq!(name.as_str(), "billy_the_kid");
    }

    #[test]
    fn test_username_truncates() {
        let name = Username::new("a-very-long-name-that-keeps-going");
        assert_eq!(name.as_str().len(), constants::MAX_NAME_LENGTH);
    }

    // === Revolver tests ===

    #[test]
    fn test_revolver_survives_until_loaded_chamber() {
        let mut revolver = Revolver::with_chamber(3);
        assert!(revolver.pull_trigger());
        assert_eq!(revolver.position, 1);
        assert!(revolver.pull_trigger());
        assert_eq!(revolver.position, 2);
        assert!(revolver.pull_trigger());
        assert_eq!(revolver.position, 3);
        assert!(!revolver.pull_trigger());
    }

    #[test]
    fn test_revolver_chamber_zero_is_instantly_fatal() {
        let mut revolver = Revolver::with_chamber(0);
        assert!(!revolver.pull_trigger());
    }

    #[test]
    fn test_revolver_pulls_until_fatal() {
        for chamber in 0..CYLINDER_SIZE {
            let revolver = Revolver::with_chamber(chamber);
            assert_eq!(revolver.pulls_until_fatal(), chamber);
        }
    }

    #[test]
    fn test_assigned_chamber_in_range() {
        let mut rng = GameRng::new(5);
        for _ in 0..100 {
            let revolver = Revolver::assign(&mut rng);
            assert!(revolver.chamber < CYLINDER_SIZE);
            assert_eq!(revolver.position, 0);
        }
    }
}
