//! Card values and the shared deck.

use core::fmt;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::EmptyDeck;

/// Value of an Ace before any soft reduction.
pub const ACE: u8 = 11;

/// The 13 card values of one suit. Ten, Jack, Queen and King all count 10.
pub const SUIT_TEMPLATE: [u8; 13] = [2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 10, 10, ACE];

/// Number of cards in a fresh deck.
pub const DECK_SIZE: usize = SUIT_TEMPLATE.len() * 4;

/// A playing card, identified only by its blackjack value.
///
/// Values run from 2 to 11, where 11 is an Ace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card(u8);

impl Card {
    /// Creates a card from its value.
    ///
    /// Note: This function does not validate the value. Values outside 2..=11
    /// are accepted but may yield non-standard results when evaluating a hand.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Returns the card value (11 for an Ace).
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns whether this card is an Ace.
    #[must_use]
    pub const fn is_ace(self) -> bool {
        self.0 == ACE
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ace() {
            write!(f, "{}*", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// The cards left to deal at one table.
///
/// A deck is shuffled once when created and dealt from the top, which draws
/// uniformly at random without replacement. It is never reshuffled.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Creates a full 52-card deck shuffled with the given seed.
    #[must_use]
    pub fn shuffled(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut cards = Vec::with_capacity(DECK_SIZE);

        for _ in 0..4 {
            cards.extend(SUIT_TEMPLATE.iter().copied().map(Card::new));
        }

        cards.shuffle(&mut rng);
        Self { cards }
    }

    /// Creates a deck that deals exactly `draws`, first element first.
    #[must_use]
    pub fn from_draws(draws: &[Card]) -> Self {
        let mut cards = draws.to_vec();
        cards.reverse();
        Self { cards }
    }

    /// Removes and returns the next card.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyDeck`] if no cards are left.
    pub fn draw(&mut self) -> Result<Card, EmptyDeck> {
        self.cards.pop().ok_or(EmptyDeck)
    }

    /// Returns the number of cards left.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// Returns whether the deck is exhausted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
