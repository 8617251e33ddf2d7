use tracing::info;

use crate::card::Card;
use crate::error::{BetError, RoundError};
use crate::session::PlayerSession;

use super::{GameState, Table};

/// A successful join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joined {
    /// Index of the new hand within the player's session.
    pub hand_index: usize,
    /// The two cards dealt to it.
    pub cards: Vec<Card>,
    /// Whether the player already had a session and got another hand.
    pub extra_hand: bool,
}

impl Table {
    /// Seats a player with a bet and deals them two cards.
    ///
    /// A player who already joined gets an additional hand instead of a second
    /// session. The bet is debited before any card is dealt.
    ///
    /// # Errors
    ///
    /// Returns an error if the round has started, the bet is below the table
    /// minimum, the deck cannot deal this hand and still leave the dealer two
    /// cards, or the ledger cannot cover the bet.
    pub fn add_player(&mut self, user: &str, bet: usize) -> Result<Joined, BetError> {
        if self.state != GameState::Forming {
            return Err(BetError::InvalidState);
        }

        if bet < self.options.min_bet {
            return Err(BetError::BelowMinimum {
                minimum: self.options.min_bet,
            });
        }

        // Two cards for this hand, two held back for the dealer.
        if self.deck.remaining() < 4 {
            return Err(BetError::EmptyDeck);
        }

        self.ledger.ensure(user);
        if !self.ledger.debit(user, bet) {
            return Err(BetError::InsufficientFunds);
        }

        let cards = vec![self.deck.draw()?, self.deck.draw()?];

        let existing = self.players.iter().position(|p| p.user() == user);
        let extra_hand = existing.is_some();
        let index = existing.unwrap_or_else(|| {
            self.players.push(PlayerSession::new(user));
            self.players.len() - 1
        });

        let session = &mut self.players[index];
        session.add_hand(cards.clone(), bet);
        let hand_index = session.hands().len() - 1;

        info!(guild = self.guild, user, bet, hand_index, "player joined");

        Ok(Joined {
            hand_index,
            cards,
            extra_hand,
        })
    }

    /// Deals the dealer's two cards and closes the table to new players.
    ///
    /// Returns the dealer's up card.
    ///
    /// # Errors
    ///
    /// Returns an error if the round has already started, nobody has joined,
    /// or the deck cannot deal two cards.
    pub fn deal_dealer(&mut self) -> Result<Card, RoundError> {
        if self.state != GameState::Forming {
            return Err(RoundError::InvalidState);
        }

        if self.players.is_empty() {
            return Err(RoundError::NoPlayers);
        }

        if self.deck.remaining() < 2 {
            return Err(RoundError::EmptyDeck);
        }

        let up = self.deck.draw()?;
        self.dealer.add_card(up);
        self.dealer.add_card(self.deck.draw()?);

        self.state = GameState::NaturalCheck;
        info!(guild = self.guild, players = self.players.len(), "round started");

        Ok(up)
    }
}
