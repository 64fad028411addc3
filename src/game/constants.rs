//! Fixed parameters of the Liar's Bar ruleset.

/// Copies of each themed card kind in the deck.
pub const THEMED_COPIES: usize = 6;

/// Jokers in the deck. Jokers always count as the table theme.
pub const JOKER_COPIES: usize = 2;

/// Total deck size: 6 Queens + 6 Kings + 6 Aces + 2 Jokers.
pub const DECK_SIZE: usize = 3 * THEMED_COPIES + JOKER_COPIES;

/// Cards dealt to each player at the start of a round.
pub const HAND_SIZE: usize = 5;

/// Minimum players required for the elimination mechanic to mean anything.
pub const MIN_PLAYERS: usize = 4;

/// Seats at the table. The 20-card deck deals 5 cards to exactly 4 players
/// with nothing left over, so this is also the only startable roster size.
pub const MAX_PLAYERS: usize = DECK_SIZE / HAND_SIZE;

/// Chambers in a revolver cylinder. Exactly one is loaded.
pub const CYLINDER_SIZE: u8 = 6;

/// Smallest count a claim may declare.
pub const MIN_CLAIM: u8 = 1;

/// Largest count a claim may declare (a full hand).
pub const MAX_CLAIM: u8 = HAND_SIZE as u8;

/// Longest accepted player name. Longer names are truncated.
pub const MAX_NAME_LENGTH: usize = 16;
