//! A blackjack table engine for chat guilds.
//!
//! Each guild gets at most one [`Table`] from the [`Registry`]. Players join
//! with a bet taken from the shared [`Ledger`], a [`Round`] deals and plays
//! every hand against the house dealer, and winnings are paid back to the
//! ledger. The chat transport stays outside: it feeds decisions through an
//! [`Interaction`] and renders the [`Event`]s the round emits.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use bjtable::{ChannelInteraction, Ledger, LedgerOptions, Registry, Round, TableOptions};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let ledger = Arc::new(Ledger::open("balances.json", LedgerOptions::default())?);
//! let registry = Arc::new(Registry::new(Arc::clone(&ledger), TableOptions::default()));
//!
//! let table = registry.get_or_create(1);
//! table.lock().add_player("alice", 100)?;
//!
//! let (_input, inputs) = tokio::sync::mpsc::unbounded_channel();
//! let (events, _output) = tokio::sync::mpsc::unbounded_channel();
//! let round = Round::begin(registry, 1, ChannelInteraction::new(inputs, events))?;
//! let result = round.run().await?;
//! ledger.save()?;
//! # let _ = result;
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod card;
pub mod error;
pub mod event;
pub mod game;
pub mod hand;
pub mod interaction;
pub mod ledger;
pub mod options;
pub mod registry;
pub mod result;
pub mod round;
pub mod session;
pub mod sync;

// Re-export main types
pub use card::{Card, DECK_SIZE, Deck};
pub use error::{ActionError, BetError, EmptyDeck, LedgerError, ParseActionError, RoundError};
pub use event::Event;
pub use game::{GameState, GuildId, Joined, Table, TurnPosition};
pub use hand::{DealerHand, Hand, HandStatus, Settlement};
pub use interaction::{Action, ChannelInteraction, Interaction, Prompt};
pub use ledger::{BalanceRecord, Ledger, UserId};
pub use options::{LedgerOptions, TableOptions};
pub use registry::{Registry, SharedTable};
pub use result::{HandOutcome, HandResult, PlayerResult, RoundResult};
pub use round::Round;
pub use session::PlayerSession;
