//! Error types for table, ledger, and input operations.

use thiserror::Error;

/// The deck has no cards left to deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no cards left in the deck")]
pub struct EmptyDeck;

/// Errors that can occur when joining a table with a bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BetError {
    /// The round has already started.
    #[error("the round has already started")]
    InvalidState,
    /// Bet is below the table minimum.
    #[error("minimum bet is ${minimum}")]
    BelowMinimum {
        /// The table minimum.
        minimum: usize,
    },
    /// Insufficient funds.
    #[error("insufficient balance")]
    InsufficientFunds,
    /// Not enough cards to deal the hand.
    #[error("not enough cards in the deck")]
    EmptyDeck,
}

impl From<EmptyDeck> for BetError {
    fn from(_: EmptyDeck) -> Self {
        Self::EmptyDeck
    }
}

/// Errors that can occur during player actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    /// No player hand is waiting for a decision.
    #[error("no hand is waiting for an action")]
    InvalidState,
    /// Cannot split this hand.
    #[error("you can only split a pair of identical values")]
    CannotSplit,
    /// Cannot double down on this hand.
    #[error("you can only double on your first two cards")]
    CannotDouble,
    /// Insufficient funds for this action.
    #[error("insufficient funds for this action")]
    InsufficientFunds,
    /// No cards left in the deck.
    #[error("no cards left in the deck")]
    EmptyDeck,
}

impl From<EmptyDeck> for ActionError {
    fn from(_: EmptyDeck) -> Self {
        Self::EmptyDeck
    }
}

/// Errors that can occur while running a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RoundError {
    /// Invalid table state for this step.
    #[error("invalid table state for this step")]
    InvalidState,
    /// No table exists for the guild.
    #[error("no table for this guild")]
    NotFound,
    /// Nobody has joined the table.
    #[error("no players have joined yet")]
    NoPlayers,
    /// The deck ran out mid-round.
    #[error("no cards left in the deck")]
    EmptyDeck,
}

impl From<EmptyDeck> for RoundError {
    fn from(_: EmptyDeck) -> Self {
        Self::EmptyDeck
    }
}

/// Errors that can occur loading or saving the balance snapshot.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Reading or writing the snapshot file failed.
    #[error("snapshot i/o: {0}")]
    Io(#[from] std::io::Error),
    /// The snapshot could not be encoded or decoded.
    #[error("snapshot json: {0}")]
    Json(#[from] serde_json::Error),
    /// The background write task failed.
    #[error("snapshot task: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Raw player input that is not one of the table actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseActionError {
    /// Unknown action name.
    #[error("unknown action `{0}`")]
    UnknownAction(String),
}
