//! Round result types for settlement.

use crate::card::Card;
use crate::ledger::UserId;

/// Result of a single hand after settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandOutcome {
    /// Player wins (dealer busts or player has higher value).
    Win,
    /// Player loses to a higher dealer hand or a dealer natural.
    Lose,
    /// Player busted.
    Bust,
    /// Push (tie); the stake is returned.
    Push,
    /// Player natural paid at 3:2.
    Natural,
}

/// Result for a single hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandResult {
    /// The hand index (for split hands).
    pub hand_index: usize,
    /// The outcome of the hand.
    pub outcome: HandOutcome,
    /// The bet amount for this hand (doubled bets included).
    pub bet: usize,
    /// The amount credited back to the player.
    pub payout: usize,
    /// The player's cards.
    pub cards: Vec<Card>,
    /// The player's hand value.
    pub player_value: u8,
}

/// Result for a single player after settlement.
#[derive(Debug, Clone)]
pub struct PlayerResult {
    /// The player.
    pub user: UserId,
    /// Results for each hand (multiple if split or joined more than once).
    pub hands: Vec<HandResult>,
    /// Total payout for all hands.
    pub total_payout: usize,
    /// Net result (positive = profit, negative = loss).
    pub net: isize,
}

/// Result of the entire round.
#[derive(Debug, Clone)]
pub struct RoundResult {
    /// Results for each player, in turn order.
    pub players: Vec<PlayerResult>,
    /// The dealer's final cards.
    pub dealer_cards: Vec<Card>,
    /// The dealer's final hand value.
    pub dealer_value: u8,
    /// Whether the dealer busted.
    pub dealer_bust: bool,
    /// Whether the dealer had a natural.
    pub dealer_natural: bool,
}

impl RoundResult {
    /// Returns the result for one player.
    #[must_use]
    pub fn player(&self, user: &str) -> Option<&PlayerResult> {
        self.players.iter().find(|p| p.user == user)
    }
}
