use tracing::{info, warn};

use crate::error::RoundError;
use crate::event::Event;
use crate::hand::{BLACKJACK, Hand};
use crate::result::{HandOutcome, HandResult, PlayerResult, RoundResult};

use super::{GameState, Table, TurnPosition};

fn hand_result(hand_index: usize, hand: &Hand) -> HandResult {
    let settlement = hand.settlement();
    HandResult {
        hand_index,
        outcome: settlement.map_or(HandOutcome::Lose, |s| s.outcome),
        bet: hand.bet(),
        payout: settlement.map_or(0, |s| s.payout),
        cards: hand.cards().to_vec(),
        player_value: hand.value(),
    }
}

impl Table {
    /// Pays out naturals right after the deal.
    ///
    /// A player natural is paid `natural_pays` times the bet (truncated), or
    /// pushed if the dealer also holds one. If the dealer holds a natural,
    /// every other hand loses its stake and the round finishes without any
    /// player turns.
    ///
    /// # Errors
    ///
    /// Returns an error if the dealer has not been dealt yet or naturals were
    /// already resolved.
    pub fn resolve_naturals(&mut self) -> Result<Vec<Event>, RoundError> {
        if self.state != GameState::NaturalCheck {
            return Err(RoundError::InvalidState);
        }

        let dealer_natural = self.dealer.is_natural();
        let mut events = Vec::new();

        if dealer_natural {
            self.dealer.reveal_hole();
            events.push(Event::DealerNatural {
                cards: self.dealer.cards().to_vec(),
            });
        }

        for session in &mut self.players {
            let user = session.user().to_owned();
            for (hand_index, hand) in session.hands_mut().iter_mut().enumerate() {
                let bet = hand.bet();
                match (hand.is_natural(), dealer_natural) {
                    (true, true) => {
                        self.ledger.credit(&user, bet);
                        hand.resolve_natural(HandOutcome::Push, bet);
                        events.push(Event::NaturalPush {
                            user: user.clone(),
                            hand_index,
                            bet,
                        });
                    }
                    (true, false) => {
                        let payout = self.options.natural_payout(bet);
                        self.ledger.credit(&user, payout);
                        hand.resolve_natural(HandOutcome::Natural, payout);
                        events.push(Event::NaturalPaid {
                            user: user.clone(),
                            hand_index,
                            payout,
                        });
                    }
                    (false, true) => {
                        hand.resolve_natural(HandOutcome::Lose, 0);
                        events.push(Event::LostToNatural {
                            user: user.clone(),
                            hand_index,
                            bet,
                        });
                    }
                    (false, false) => {}
                }
            }
        }

        if dealer_natural {
            self.state = GameState::Finished;
            info!(guild = self.guild, "dealer natural, round over");
        } else {
            self.state = GameState::PlayerTurns;
            self.turn = TurnPosition::default();
            self.seek_active_hand();
        }

        Ok(events)
    }

    /// Reveals the hole card and draws until the dealer reaches the stand
    /// value.
    ///
    /// Soft totals count as reduced, so a soft 17 stands.
    ///
    /// # Errors
    ///
    /// Returns an error if player turns are not over, the dealer already
    /// played, or the deck runs out.
    pub fn play_dealer(&mut self) -> Result<Vec<Event>, RoundError> {
        if self.state != GameState::DealerResolution || self.dealer.is_hole_revealed() {
            return Err(RoundError::InvalidState);
        }

        self.dealer.reveal_hole();
        let mut events = vec![Event::DealerReveals {
            cards: self.dealer.cards().to_vec(),
            value: self.dealer.value(),
        }];

        while self.dealer.value() < self.options.dealer_stands_on {
            let card = self.deck.draw()?;
            self.dealer.add_card(card);
            events.push(Event::DealerDraws {
                cards: self.dealer.cards().to_vec(),
                value: self.dealer.value(),
            });
        }

        Ok(events)
    }

    /// Settles every hand the natural check did not resolve.
    ///
    /// Busted hands lose; a dealer bust or a higher hand pays twice the bet;
    /// a lower hand loses; a tie returns the bet. The round is finished
    /// afterwards; [`Table::result`] reports it.
    ///
    /// # Errors
    ///
    /// Returns an error if the dealer has not played yet.
    pub fn settle(&mut self) -> Result<Vec<Event>, RoundError> {
        if self.state != GameState::DealerResolution || !self.dealer.is_hole_revealed() {
            return Err(RoundError::InvalidState);
        }

        let dealer_value = self.dealer.value();
        let dealer_bust = self.dealer.is_bust();
        let mut events = Vec::new();

        for session in &mut self.players {
            let user = session.user().to_owned();
            for (hand_index, hand) in session.hands_mut().iter_mut().enumerate() {
                if hand.is_natural_resolved() {
                    continue;
                }

                let value = hand.value();
                let bet = hand.bet();
                let (outcome, payout) = if value > BLACKJACK {
                    (HandOutcome::Bust, 0)
                } else if dealer_bust || value > dealer_value {
                    (HandOutcome::Win, bet * 2)
                } else if value < dealer_value {
                    (HandOutcome::Lose, 0)
                } else {
                    (HandOutcome::Push, bet)
                };

                if payout > 0 {
                    self.ledger.credit(&user, payout);
                }
                hand.settle(outcome, payout);

                events.push(Event::Settled {
                    user: user.clone(),
                    result: hand_result(hand_index, hand),
                });
            }
        }

        self.state = GameState::Finished;
        info!(guild = self.guild, dealer_value, dealer_bust, "round settled");

        Ok(events)
    }

    /// Ends the round early, returning the stake of every unsettled hand.
    ///
    /// Returns the total refunded.
    pub fn abort(&mut self) -> usize {
        let mut refunded = 0;

        for session in &mut self.players {
            let user = session.user().to_owned();
            for hand in session.hands_mut() {
                if hand.settlement().is_some() {
                    continue;
                }
                let bet = hand.bet();
                self.ledger.credit(&user, bet);
                hand.settle(HandOutcome::Push, bet);
                refunded += bet;
            }
        }

        self.state = GameState::Finished;
        warn!(guild = self.guild, refunded, "round aborted");
        refunded
    }

    /// Returns the outcome of every hand once the round is finished.
    pub fn result(&self) -> Option<RoundResult> {
        if self.state != GameState::Finished {
            return None;
        }

        let players = self
            .players
            .iter()
            .map(|session| {
                let hands: Vec<_> = session
                    .hands()
                    .iter()
                    .enumerate()
                    .map(|(i, hand)| hand_result(i, hand))
                    .collect();
                let total_payout = hands.iter().map(|h| h.payout).sum::<usize>();

                #[expect(clippy::cast_possible_wrap, reason = "payout values fit in isize")]
                let net = total_payout as isize - session.total_bet() as isize;

                PlayerResult {
                    user: session.user().to_owned(),
                    hands,
                    total_payout,
                    net,
                }
            })
            .collect();

        Some(RoundResult {
            players,
            dealer_cards: self.dealer.cards().to_vec(),
            dealer_value: self.dealer.value(),
            dealer_bust: self.dealer.is_bust(),
            dealer_natural: self.dealer.is_natural(),
        })
    }
}
