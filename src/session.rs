//! One player's hands at a table.

use crate::card::{Card, Deck};
use crate::error::ActionError;
use crate::hand::{Hand, HandStatus};
use crate::ledger::{Ledger, UserId};

/// A player's seat: every hand they play this round and which one is up.
///
/// Each [`Hand`] carries its own bet and flags, so a hand and its stake are
/// always created together and never removed independently.
#[derive(Debug, Clone)]
pub struct PlayerSession {
    /// The player.
    user: UserId,
    /// Hands in play order. Split hands are appended at the end.
    hands: Vec<Hand>,
    /// Index of the hand currently taking actions.
    cursor: usize,
}

impl PlayerSession {
    /// Creates a session with no hands.
    #[must_use]
    pub fn new(user: impl Into<UserId>) -> Self {
        Self {
            user: user.into(),
            hands: Vec::new(),
            cursor: 0,
        }
    }

    /// Returns the player.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Appends a hand with its bet.
    pub fn add_hand(&mut self, cards: Vec<Card>, bet: usize) {
        self.hands.push(Hand::new(cards, bet));
    }

    /// Returns all hands.
    #[must_use]
    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    pub(crate) fn hands_mut(&mut self) -> &mut [Hand] {
        &mut self.hands
    }

    /// Returns the index of the current hand.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) const fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    /// Returns the hand under the cursor.
    #[must_use]
    pub fn current_hand(&self) -> Option<&Hand> {
        self.hands.get(self.cursor)
    }

    fn current_hand_mut(&mut self) -> Result<&mut Hand, ActionError> {
        self.hands
            .get_mut(self.cursor)
            .ok_or(ActionError::InvalidState)
    }

    /// Returns the bet on the hand under the cursor.
    #[must_use]
    pub fn current_bet(&self) -> Option<usize> {
        self.current_hand().map(Hand::bet)
    }

    /// Returns the total staked across all hands.
    #[must_use]
    pub fn total_bet(&self) -> usize {
        self.hands.iter().map(Hand::bet).sum()
    }

    /// Draws one card onto the current hand.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no current active hand or the deck is
    /// empty.
    pub fn hit(&mut self, deck: &mut Deck) -> Result<Card, ActionError> {
        let hand = self.current_hand_mut()?;
        if !hand.needs_action() {
            return Err(ActionError::InvalidState);
        }

        let card = deck.draw()?;
        hand.add_card(card);
        Ok(card)
    }

    /// Ends the current hand without drawing.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no current active hand.
    pub fn stand(&mut self) -> Result<(), ActionError> {
        let hand = self.current_hand_mut()?;
        if !hand.needs_action() {
            return Err(ActionError::InvalidState);
        }

        hand.set_status(HandStatus::Stand);
        Ok(())
    }

    /// Doubles the bet on the current two-card hand and deals exactly one card.
    ///
    /// The hand is finished afterwards whatever its value.
    ///
    /// # Errors
    ///
    /// Returns an error if the hand does not have exactly two cards, the deck
    /// is empty, or the ledger cannot cover the extra bet. No funds move on
    /// error.
    pub fn double(&mut self, deck: &mut Deck, ledger: &Ledger) -> Result<Card, ActionError> {
        let user = self.user.clone();
        let hand = self.current_hand_mut()?;

        if !hand.can_double() {
            return Err(ActionError::CannotDouble);
        }
        if deck.is_empty() {
            return Err(ActionError::EmptyDeck);
        }
        if !ledger.debit(&user, hand.bet()) {
            return Err(ActionError::InsufficientFunds);
        }

        let card = deck.draw()?;
        hand.double_bet();
        hand.add_card(card);

        if hand.status() == HandStatus::Active {
            hand.set_status(HandStatus::Stand);
        }

        Ok(card)
    }

    /// Splits the current pair into two hands.
    ///
    /// The second card moves to a new hand appended at the end of the list
    /// with the same bet; each half then receives one fresh card, the new hand
    /// first. The current hand keeps taking actions.
    ///
    /// # Errors
    ///
    /// Returns an error if the hand is not a two-card pair, the deck cannot
    /// deal two cards, or the ledger cannot cover the extra bet. No funds
    /// move on error.
    pub fn split(&mut self, deck: &mut Deck, ledger: &Ledger) -> Result<(), ActionError> {
        let user = self.user.clone();
        let hand = self.current_hand_mut()?;

        if !hand.can_split() {
            return Err(ActionError::CannotSplit);
        }
        if deck.remaining() < 2 {
            return Err(ActionError::EmptyDeck);
        }

        let bet = hand.bet();
        if !ledger.debit(&user, bet) {
            return Err(ActionError::InsufficientFunds);
        }

        let moved = hand.take_split_card().ok_or(ActionError::CannotSplit)?;
        let new_card = deck.draw()?;
        hand.add_card(deck.draw()?);

        self.hands.push(Hand::new(vec![moved, new_card], bet));
        Ok(())
    }
}
