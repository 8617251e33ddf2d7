//! Structured events emitted while a round plays out.
//!
//! The table never formats messages for a chat service itself; hosts turn
//! these events into whatever they render. [`Event`]'s `Display` gives a
//! plain-text line for simple hosts.

use core::fmt;

use crate::card::Card;
use crate::error::{ActionError, RoundError};
use crate::hand::render;
use crate::ledger::UserId;
use crate::result::{HandOutcome, HandResult, RoundResult};

/// Something that happened at the table.
#[derive(Debug, Clone)]
pub enum Event {
    /// The dealer's up card after the deal.
    DealerShows {
        /// The up card.
        card: Card,
    },
    /// The dealer holds a natural; nobody plays this round.
    DealerNatural {
        /// The dealer's two cards.
        cards: Vec<Card>,
    },
    /// A player natural was paid 3:2.
    NaturalPaid {
        /// The player.
        user: UserId,
        /// The hand.
        hand_index: usize,
        /// Amount credited.
        payout: usize,
    },
    /// Player and dealer both hold naturals; the bet was returned.
    NaturalPush {
        /// The player.
        user: UserId,
        /// The hand.
        hand_index: usize,
        /// Amount returned.
        bet: usize,
    },
    /// A hand lost its stake to the dealer's natural.
    LostToNatural {
        /// The player.
        user: UserId,
        /// The hand.
        hand_index: usize,
        /// Stake lost.
        bet: usize,
    },
    /// A player drew a card.
    Hit {
        /// The player.
        user: UserId,
        /// The hand.
        hand_index: usize,
        /// Cards after the draw.
        cards: Vec<Card>,
        /// Value after the draw.
        value: u8,
    },
    /// A hand went over 21.
    Bust {
        /// The player.
        user: UserId,
        /// The hand.
        hand_index: usize,
        /// Final value.
        value: u8,
    },
    /// A player stood.
    Stood {
        /// The player.
        user: UserId,
        /// The hand.
        hand_index: usize,
        /// Final cards.
        cards: Vec<Card>,
        /// Final value.
        value: u8,
    },
    /// A player doubled and took one card.
    Doubled {
        /// The player.
        user: UserId,
        /// The hand.
        hand_index: usize,
        /// Final cards.
        cards: Vec<Card>,
        /// Final value.
        value: u8,
        /// The doubled bet.
        bet: usize,
    },
    /// A player split a pair.
    Split {
        /// The player.
        user: UserId,
        /// The hand that was split.
        hand_index: usize,
        /// Number of hands the player now holds.
        hands: usize,
    },
    /// An action was refused; the same hand is asked again.
    Rejected {
        /// The player.
        user: UserId,
        /// Why the action was refused.
        error: ActionError,
    },
    /// No action arrived in time; the hand stands.
    TimedOut {
        /// The player.
        user: UserId,
        /// The hand.
        hand_index: usize,
    },
    /// The dealer turned over the hole card.
    DealerReveals {
        /// Dealer cards.
        cards: Vec<Card>,
        /// Dealer value.
        value: u8,
    },
    /// The dealer drew a card.
    DealerDraws {
        /// Dealer cards after the draw.
        cards: Vec<Card>,
        /// Dealer value after the draw.
        value: u8,
    },
    /// A hand was paid out against the dealer.
    Settled {
        /// The player.
        user: UserId,
        /// The settled hand.
        result: HandResult,
    },
    /// The round is over.
    Finished(RoundResult),
    /// The round could not continue; open stakes were returned.
    Aborted {
        /// Why the round stopped.
        reason: RoundError,
        /// Total stake refunded.
        refunded: usize,
    },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DealerShows { card } => write!(f, "Dealer shows: {card}"),
            Self::DealerNatural { cards } => {
                write!(f, "Dealer has a natural blackjack! ({})", render(cards))
            }
            Self::NaturalPaid { user, payout, .. } => {
                write!(f, "{user} has a natural! Payout ${payout}.")
            }
            Self::NaturalPush { user, bet, .. } => write!(
                f,
                "{user} has a natural but dealer also has natural, push. Bet returned (${bet})."
            ),
            Self::LostToNatural { user, .. } => write!(f, "{user} loses to dealer natural."),
            Self::Hit {
                user, cards, value, ..
            } => write!(f, "{user} hits: {} (value: {value})", render(cards)),
            Self::Bust { user, .. } => write!(f, "{user} busted!"),
            Self::Stood { user, cards, .. } => write!(f, "{user} stands with {}", render(cards)),
            Self::Doubled {
                user, cards, value, ..
            } => write!(f, "{user} doubled: {} (value: {value})", render(cards)),
            Self::Split { user, hands, .. } => write!(f, "{user} split into {hands} hands."),
            Self::Rejected { user, error } => write!(f, "{user}: {error}."),
            Self::TimedOut { user, .. } => write!(f, "{user} timed out and stands."),
            Self::DealerReveals { cards, value } => {
                write!(f, "Dealer hand: {} ({value})", render(cards))
            }
            Self::DealerDraws { cards, value } => {
                write!(f, "Dealer draws: {} ({value})", render(cards))
            }
            Self::Settled { user, result } => match result.outcome {
                HandOutcome::Bust => write!(
                    f,
                    "{user} busted with {} and lost ${}.",
                    render(&result.cards),
                    result.bet
                ),
                HandOutcome::Win => write!(
                    f,
                    "{user} wins {} with {}.",
                    result.payout,
                    render(&result.cards)
                ),
                HandOutcome::Lose => write!(f, "{user} loses {} against dealer.", result.bet),
                HandOutcome::Push => write!(f, "{user} pushes, bet returned (${}).", result.bet),
                HandOutcome::Natural => {
                    write!(f, "{user} has a natural! Payout ${}.", result.payout)
                }
            },
            Self::Finished(result) => {
                if result.dealer_bust {
                    write!(f, "Round over. Dealer busted with {}.", result.dealer_value)
                } else {
                    write!(f, "Round over. Dealer has {}.", result.dealer_value)
                }
            }
            Self::Aborted { reason, refunded } => {
                write!(f, "Round aborted ({reason}). ${refunded} refunded.")
            }
        }
    }
}
