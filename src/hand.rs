//! Player and dealer hand representations.

use crate::card::Card;
use crate::result::HandOutcome;

/// Highest value a hand can hold without busting.
pub const BLACKJACK: u8 = 21;

fn evaluate_cards(cards: &[Card]) -> (u8, bool) {
    let mut value: u8 = 0;
    let mut aces: u8 = 0;

    for card in cards {
        if card.is_ace() {
            aces += 1;
        }
        value = value.saturating_add(card.value());
    }

    while value > BLACKJACK && aces > 0 {
        value -= 10;
        aces -= 1;
    }

    let is_soft = aces > 0 && value <= BLACKJACK;
    (value, is_soft)
}

/// Calculates the value of a run of cards.
///
/// Aces count 11; while the total is over 21, one Ace at a time is counted
/// as 1 instead.
#[must_use]
pub fn value(cards: &[Card]) -> u8 {
    evaluate_cards(cards).0
}

/// Returns whether an Ace is still counted as 11.
#[must_use]
pub fn is_soft(cards: &[Card]) -> bool {
    evaluate_cards(cards).1
}

/// Returns whether the cards are a natural: an Ace and a ten-valued card.
#[must_use]
pub fn is_natural(cards: &[Card]) -> bool {
    match cards {
        [a, b] => {
            (a.is_ace() && b.value() == 10) || (b.is_ace() && a.value() == 10)
        }
        _ => false,
    }
}

/// Renders cards for display, e.g. `10 11*`.
#[must_use]
pub fn render(cards: &[Card]) -> String {
    cards
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Hand status during player turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandStatus {
    /// Hand is active and can take actions.
    Active,
    /// Player has stood (or doubled without busting).
    Stand,
    /// Hand has busted (over 21).
    Bust,
}

/// Final result recorded on a hand once it is paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    /// How the hand ended.
    pub outcome: HandOutcome,
    /// Amount credited back to the player (0 for a loss).
    pub payout: usize,
}

/// One player hand together with its stake and flags.
#[derive(Debug, Clone)]
pub struct Hand {
    /// Cards in the hand.
    cards: Vec<Card>,
    /// Current status of the hand.
    status: HandStatus,
    /// Bet amount for this hand.
    bet: usize,
    /// Whether the bet was doubled.
    doubled: bool,
    /// Whether the opening natural check already paid out this hand.
    natural_resolved: bool,
    /// Payout, once settled.
    settlement: Option<Settlement>,
}

impl Hand {
    /// Creates a hand holding `cards` with the given bet.
    #[must_use]
    pub fn new(cards: Vec<Card>, bet: usize) -> Self {
        let mut hand = Self {
            cards: Vec::new(),
            status: HandStatus::Active,
            bet,
            doubled: false,
            natural_resolved: false,
            settlement: None,
        };
        for card in cards {
            hand.add_card(card);
        }
        hand
    }

    /// Adds a card to the hand.
    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);

        if self.value() > BLACKJACK {
            self.status = HandStatus::Bust;
        }
    }

    /// Returns the cards in the hand.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Returns the current status of the hand.
    #[must_use]
    pub const fn status(&self) -> HandStatus {
        self.status
    }

    /// Sets the hand status.
    pub const fn set_status(&mut self, status: HandStatus) {
        self.status = status;
    }

    /// Returns the bet amount for this hand.
    #[must_use]
    pub const fn bet(&self) -> usize {
        self.bet
    }

    /// Doubles the bet amount and marks the hand as doubled.
    pub const fn double_bet(&mut self) {
        self.bet *= 2;
        self.doubled = true;
    }

    /// Returns whether the bet was doubled.
    #[must_use]
    pub const fn is_doubled(&self) -> bool {
        self.doubled
    }

    /// Returns whether the natural check resolved this hand.
    #[must_use]
    pub const fn is_natural_resolved(&self) -> bool {
        self.natural_resolved
    }

    /// Returns the settlement, if the hand has been paid out.
    #[must_use]
    pub const fn settlement(&self) -> Option<Settlement> {
        self.settlement
    }

    /// Records the payout for this hand.
    pub(crate) const fn settle(&mut self, outcome: HandOutcome, payout: usize) {
        self.settlement = Some(Settlement { outcome, payout });
    }

    /// Records a payout made by the opening natural check.
    pub(crate) const fn resolve_natural(&mut self, outcome: HandOutcome, payout: usize) {
        self.natural_resolved = true;
        self.settle(outcome, payout);
    }

    /// Returns whether the hand still waits for player decisions.
    #[must_use]
    pub const fn needs_action(&self) -> bool {
        !self.natural_resolved && matches!(self.status, HandStatus::Active)
    }

    /// Calculates the value of the hand.
    #[must_use]
    pub fn value(&self) -> u8 {
        value(&self.cards)
    }

    /// Returns whether the hand is soft (contains an ace counted as 11).
    #[must_use]
    pub fn is_soft(&self) -> bool {
        is_soft(&self.cards)
    }

    /// Returns whether the hand is a natural.
    #[must_use]
    pub fn is_natural(&self) -> bool {
        is_natural(&self.cards)
    }

    /// Returns whether the hand can be split.
    #[must_use]
    pub fn can_split(&self) -> bool {
        self.needs_action() && self.cards.len() == 2 && self.cards[0] == self.cards[1]
    }

    /// Returns whether the hand can be doubled.
    #[must_use]
    pub fn can_double(&self) -> bool {
        self.needs_action() && self.cards.len() == 2
    }

    /// Returns the number of cards in the hand.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns whether the hand is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Removes and returns the second card (for splitting).
    pub(crate) fn take_split_card(&mut self) -> Option<Card> {
        if self.cards.len() == 2 {
            self.cards.pop()
        } else {
            None
        }
    }
}

/// The dealer's hand.
#[derive(Debug, Clone)]
pub struct DealerHand {
    /// Cards in the hand.
    cards: Vec<Card>,
    /// Whether the hole card is revealed.
    hole_revealed: bool,
}

impl DealerHand {
    /// Creates a new empty dealer hand.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cards: Vec::new(),
            hole_revealed: false,
        }
    }

    /// Adds a card to the hand.
    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Returns all cards in the hand.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Returns the visible card (first card).
    #[must_use]
    pub fn up_card(&self) -> Option<Card> {
        self.cards.first().copied()
    }

    /// Returns whether the hole card is revealed.
    #[must_use]
    pub const fn is_hole_revealed(&self) -> bool {
        self.hole_revealed
    }

    /// Reveals the hole card.
    pub const fn reveal_hole(&mut self) {
        self.hole_revealed = true;
    }

    /// Calculates the full value of the hand.
    #[must_use]
    pub fn value(&self) -> u8 {
        value(&self.cards)
    }

    /// Returns whether the hand is a natural.
    #[must_use]
    pub fn is_natural(&self) -> bool {
        is_natural(&self.cards)
    }

    /// Returns whether the hand is bust.
    #[must_use]
    pub fn is_bust(&self) -> bool {
        self.value() > BLACKJACK
    }

    /// Returns the number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns whether the hand is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for DealerHand {
    fn default() -> Self {
        Self::new()
    }
}
