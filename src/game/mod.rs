//! The table and its round state machine.

use std::sync::Arc;

use crate::card::Deck;
use crate::hand::DealerHand;
use crate::ledger::Ledger;
use crate::options::TableOptions;
use crate::session::PlayerSession;

mod actions;
mod bet;
mod dealer;
pub mod state;

pub use bet::Joined;
pub use state::{GameState, TurnPosition};

/// Opaque guild identity supplied by the chat transport.
pub type GuildId = u64;

/// One guild's blackjack table.
///
/// The table owns the deck, the dealer hand, and every player session. Only
/// the round that plays it mutates it once dealing starts, and every step is
/// synchronous; the [`crate::round::Round`] driver awaits player decisions
/// between steps.
#[derive(Debug)]
pub struct Table {
    /// Guild that owns the table.
    guild: GuildId,
    /// Cards left to deal.
    deck: Deck,
    /// Table options.
    options: TableOptions,
    /// Balances that bets are taken from and paid to.
    ledger: Arc<Ledger>,
    /// Current round state.
    state: GameState,
    /// Player sessions in join (and turn) order.
    players: Vec<PlayerSession>,
    /// Dealer's hand.
    dealer: DealerHand,
    /// Whether players join first and the round starts on request.
    multiplayer: bool,
    /// Current turn position.
    turn: TurnPosition,
}

impl Table {
    /// Creates a table with a freshly shuffled deck.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use bjtable::{GameState, Ledger, LedgerOptions, Table, TableOptions};
    ///
    /// let ledger = Arc::new(Ledger::in_memory(LedgerOptions::default()));
    /// let table = Table::new(7, TableOptions::default(), ledger, 42);
    /// assert_eq!(table.state(), GameState::Forming);
    /// assert_eq!(table.cards_remaining(), 52);
    /// ```
    #[must_use]
    pub fn new(guild: GuildId, options: TableOptions, ledger: Arc<Ledger>, seed: u64) -> Self {
        Self::with_deck(guild, options, ledger, Deck::shuffled(seed))
    }

    /// Creates a table that deals from the given deck.
    #[must_use]
    pub const fn with_deck(
        guild: GuildId,
        options: TableOptions,
        ledger: Arc<Ledger>,
        deck: Deck,
    ) -> Self {
        Self {
            guild,
            deck,
            options,
            ledger,
            state: GameState::Forming,
            players: Vec::new(),
            dealer: DealerHand::new(),
            multiplayer: false,
            turn: TurnPosition {
                player_index: 0,
                hand_index: 0,
            },
        }
    }

    /// Replaces the deck. Only takes effect while the table is forming.
    pub fn set_deck(&mut self, deck: Deck) {
        if self.state == GameState::Forming {
            self.deck = deck;
        }
    }

    /// Returns the owning guild.
    #[must_use]
    pub const fn guild(&self) -> GuildId {
        self.guild
    }

    /// Returns the table options.
    #[must_use]
    pub const fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Returns the ledger the table settles against.
    #[must_use]
    pub const fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// Returns the current round state.
    #[must_use]
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// Returns whether the round is over.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == GameState::Finished
    }

    /// Returns whether the table waits for an explicit start.
    #[must_use]
    pub const fn is_multiplayer(&self) -> bool {
        self.multiplayer
    }

    /// Switches the table to join-then-start mode.
    pub const fn set_multiplayer(&mut self, multiplayer: bool) {
        self.multiplayer = multiplayer;
    }

    /// Returns the player sessions in turn order.
    #[must_use]
    pub fn players(&self) -> &[PlayerSession] {
        &self.players
    }

    /// Returns the session for `user`, if they joined.
    #[must_use]
    pub fn player(&self, user: &str) -> Option<&PlayerSession> {
        self.players.iter().find(|p| p.user() == user)
    }

    /// Returns the dealer's hand.
    #[must_use]
    pub const fn dealer_hand(&self) -> &DealerHand {
        &self.dealer
    }

    /// Returns the number of cards left in the deck.
    #[must_use]
    pub fn cards_remaining(&self) -> usize {
        self.deck.remaining()
    }

    /// Returns the current turn position.
    #[must_use]
    pub const fn current_turn(&self) -> TurnPosition {
        self.turn
    }

    /// Returns the player whose turn it is, during player turns.
    #[must_use]
    pub fn current_player(&self) -> Option<&str> {
        if self.state != GameState::PlayerTurns {
            return None;
        }
        self.players
            .get(self.turn.player_index)
            .map(PlayerSession::user)
    }
}
