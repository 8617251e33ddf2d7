use tracing::debug;

use crate::error::ActionError;
use crate::event::Event;
use crate::hand::{Hand, HandStatus};
use crate::interaction::{Action, Prompt};

use super::{GameState, Table};

impl Table {
    /// Returns the decision the current player is being asked for.
    ///
    /// Returns `None` outside player turns.
    pub fn prompt(&self) -> Option<Prompt> {
        if self.state != GameState::PlayerTurns {
            return None;
        }

        let session = self.players.get(self.turn.player_index)?;
        let hand = session.hands().get(self.turn.hand_index)?;

        Some(Prompt {
            user: session.user().to_owned(),
            hand_index: self.turn.hand_index,
            hand_count: session.hands().len(),
            cards: hand.cards().to_vec(),
            value: hand.value(),
            bet: hand.bet(),
            dealer_up: self.dealer.up_card()?,
            can_split: hand.can_split(),
            can_double: hand.can_double(),
        })
    }

    /// Applies an action to the current hand.
    ///
    /// Hit keeps the hand in play unless it busts; stand and double finish
    /// it; split keeps playing the first half. When a hand finishes the turn
    /// moves on, and after the last hand the table moves to dealer
    /// resolution.
    ///
    /// # Errors
    ///
    /// Returns an error if no hand is waiting for an action, the action is not
    /// allowed on this hand, the ledger cannot cover a double or split, or the
    /// deck runs out. Nothing changes on error and the same hand stays up.
    pub fn act(&mut self, action: Action) -> Result<Vec<Event>, ActionError> {
        if self.state != GameState::PlayerTurns {
            return Err(ActionError::InvalidState);
        }

        let hand_index = self.turn.hand_index;
        let session = self
            .players
            .get_mut(self.turn.player_index)
            .ok_or(ActionError::InvalidState)?;
        session.set_cursor(hand_index);
        let user = session.user().to_owned();

        let mut events = Vec::new();
        match action {
            Action::Hit => {
                session.hit(&mut self.deck)?;
            }
            Action::Stand => {
                session.stand()?;
            }
            Action::Double => {
                session.double(&mut self.deck, &self.ledger)?;
            }
            Action::Split => {
                session.split(&mut self.deck, &self.ledger)?;
                events.push(Event::Split {
                    user: user.clone(),
                    hand_index,
                    hands: session.hands().len(),
                });
            }
        }

        let hand = session
            .current_hand()
            .ok_or(ActionError::InvalidState)?;
        debug!(guild = self.guild, %user, hand_index, ?action, value = hand.value(), "action");

        let cards = hand.cards().to_vec();
        let value = hand.value();
        match action {
            Action::Hit => events.push(Event::Hit {
                user: user.clone(),
                hand_index,
                cards,
                value,
            }),
            Action::Stand => events.push(Event::Stood {
                user: user.clone(),
                hand_index,
                cards,
                value,
            }),
            Action::Double => events.push(Event::Doubled {
                user: user.clone(),
                hand_index,
                cards,
                value,
                bet: hand.bet(),
            }),
            Action::Split => {}
        }

        if hand.status() == HandStatus::Bust {
            events.push(Event::Bust {
                user,
                hand_index,
                value,
            });
        }

        if !hand.needs_action() {
            self.turn.hand_index += 1;
            self.seek_active_hand();
        }

        Ok(events)
    }

    /// Moves the turn to the next hand that still needs decisions, starting
    /// at the current position.
    ///
    /// The hand count is re-read on every step so hands appended by a split
    /// are reached.
    pub(super) fn seek_active_hand(&mut self) {
        while let Some(session) = self.players.get_mut(self.turn.player_index) {
            while self.turn.hand_index < session.hands().len() {
                if session
                    .hands()
                    .get(self.turn.hand_index)
                    .is_some_and(Hand::needs_action)
                {
                    session.set_cursor(self.turn.hand_index);
                    return;
                }
                self.turn.hand_index += 1;
            }

            self.turn.player_index += 1;
            self.turn.hand_index = 0;
        }

        self.state = GameState::DealerResolution;
    }
}
