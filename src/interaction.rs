//! The boundary to the chat transport.
//!
//! A round asks an [`Interaction`] for each decision and reports every
//! [`Event`] to it. The round does not care whether decisions come from
//! buttons, typed commands, or a test script.

use core::str::FromStr;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::card::Card;
use crate::error::ParseActionError;
use crate::event::Event;
use crate::ledger::UserId;

/// A decision for the current hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Draw one card.
    Hit,
    /// Keep the hand as it is.
    Stand,
    /// Double the bet, take exactly one card, and stop.
    Double,
    /// Split a pair into two hands.
    Split,
}

impl FromStr for Action {
    type Err = ParseActionError;

    /// Parses button ids and typed commands.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h" | "hit" => Ok(Self::Hit),
            "s" | "stand" => Ok(Self::Stand),
            "d" | "double" => Ok(Self::Double),
            "p" | "split" => Ok(Self::Split),
            other => Err(ParseActionError::UnknownAction(other.to_owned())),
        }
    }
}

/// Everything a player needs to see to choose an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Player whose turn it is.
    pub user: UserId,
    /// Index of the hand being played.
    pub hand_index: usize,
    /// Number of hands the player holds.
    pub hand_count: usize,
    /// Cards in the hand.
    pub cards: Vec<Card>,
    /// Hand value.
    pub value: u8,
    /// Bet on the hand.
    pub bet: usize,
    /// The dealer's up card.
    pub dealer_up: Card,
    /// Whether splitting is offered.
    pub can_split: bool,
    /// Whether doubling is offered.
    pub can_double: bool,
}

/// Source of player decisions and sink for table events.
#[async_trait::async_trait]
pub trait Interaction: Send {
    /// Waits for the prompted player's decision.
    ///
    /// Returns `None` when no more input can arrive; the round treats that
    /// as a stand. The round bounds this call with the table's action
    /// timeout.
    async fn decide(&mut self, prompt: &Prompt) -> Option<Action>;

    /// Receives an event from the table.
    async fn notify(&mut self, event: &Event);
}

/// An [`Interaction`] fed by raw `(user, input)` messages over a channel.
///
/// Input from anyone but the prompted player is dropped, as is input that is
/// not an action. Events are forwarded to the outgoing channel.
#[derive(Debug)]
pub struct ChannelInteraction {
    inputs: UnboundedReceiver<(UserId, String)>,
    events: UnboundedSender<Event>,
}

impl ChannelInteraction {
    /// Creates an interaction over the given channels.
    #[must_use]
    pub const fn new(
        inputs: UnboundedReceiver<(UserId, String)>,
        events: UnboundedSender<Event>,
    ) -> Self {
        Self { inputs, events }
    }
}

#[async_trait::async_trait]
impl Interaction for ChannelInteraction {
    async fn decide(&mut self, prompt: &Prompt) -> Option<Action> {
        loop {
            let (user, input) = self.inputs.recv().await?;
            if user != prompt.user {
                debug!(%user, expected = %prompt.user, "input from another player ignored");
                continue;
            }
            match input.parse() {
                Ok(action) => return Some(action),
                Err(err) => debug!(%user, %err, "unparseable input ignored"),
            }
        }
    }

    async fn notify(&mut self, event: &Event) {
        if self.events.send(event.clone()).is_err() {
            debug!("event receiver dropped");
        }
    }
}
