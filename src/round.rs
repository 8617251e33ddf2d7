//! The async task that plays one round at a guild's table.
//!
//! The round is a single loop over an explicit turn cursor. Each table step
//! runs under the table lock; the lock is always released before awaiting a
//! player or notifying the host.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::{ActionError, RoundError};
use crate::event::Event;
use crate::game::{GameState, GuildId};
use crate::interaction::{Action, Interaction};
use crate::registry::{Registry, SharedTable};
use crate::result::RoundResult;

/// A round in progress at one guild's table.
pub struct Round<I> {
    guild: GuildId,
    table: SharedTable,
    registry: Arc<Registry>,
    interaction: I,
    /// Events produced by the opening deal, sent when the round runs.
    pending: Vec<Event>,
}

impl<I: Interaction> Round<I> {
    /// Starts the round at the guild's table by dealing the dealer's cards.
    ///
    /// A second start of a running table or a start with nobody seated leaves
    /// the table as it was. If the deck cannot deal the dealer, the table is
    /// aborted with every stake refunded and retired, so the guild can open a
    /// fresh one.
    ///
    /// # Errors
    ///
    /// Returns an error if the guild has no table, the round already started,
    /// nobody has joined, or the deck cannot deal the dealer.
    pub fn begin(
        registry: Arc<Registry>,
        guild: GuildId,
        interaction: I,
    ) -> Result<Self, RoundError> {
        let table = registry.get(guild).ok_or(RoundError::NotFound)?;
        let dealt = table.lock().deal_dealer();
        let card = match dealt {
            Ok(card) => card,
            Err(RoundError::EmptyDeck) => {
                table.lock().abort();
                registry.remove_if(guild, &table);
                return Err(RoundError::EmptyDeck);
            }
            Err(err) => return Err(err),
        };

        Ok(Self {
            guild,
            table,
            registry,
            interaction,
            pending: vec![Event::DealerShows { card }],
        })
    }

    /// Plays the round to completion and retires the table.
    ///
    /// If the deck runs out, the round is aborted: every unsettled stake is
    /// refunded and [`RoundError::EmptyDeck`] is returned. The table is
    /// removed from the registry either way, unless the guild has already
    /// opened a newer one.
    ///
    /// # Errors
    ///
    /// Returns an error if the round had to be aborted.
    pub async fn run(mut self) -> Result<RoundResult, RoundError> {
        let outcome = self.play().await;

        let outcome = match outcome {
            Ok(result) => {
                self.interaction
                    .notify(&Event::Finished(result.clone()))
                    .await;
                Ok(result)
            }
            Err(reason) => {
                let refunded = self.table.lock().abort();
                self.interaction
                    .notify(&Event::Aborted { reason, refunded })
                    .await;
                Err(reason)
            }
        };

        self.registry.remove_if(self.guild, &self.table);
        outcome
    }

    /// Runs the round on its own task.
    pub fn spawn(self) -> JoinHandle<Result<RoundResult, RoundError>>
    where
        I: 'static,
    {
        tokio::spawn(self.run())
    }

    async fn play(&mut self) -> Result<RoundResult, RoundError> {
        let pending = core::mem::take(&mut self.pending);
        self.broadcast(&pending).await;

        let events = self.table.lock().resolve_naturals()?;
        self.broadcast(&events).await;

        loop {
            let prompt = self.table.lock().prompt();
            let Some(prompt) = prompt else {
                break;
            };

            let timeout = self.table.lock().options().action_timeout;
            let decision = tokio::time::timeout(timeout, self.interaction.decide(&prompt)).await;
            let action = match decision {
                Ok(Some(action)) => action,
                Ok(None) => {
                    debug!(guild = self.guild, user = %prompt.user, "input closed, standing");
                    Action::Stand
                }
                Err(_) => {
                    debug!(guild = self.guild, user = %prompt.user, "action timed out, standing");
                    self.interaction
                        .notify(&Event::TimedOut {
                            user: prompt.user.clone(),
                            hand_index: prompt.hand_index,
                        })
                        .await;
                    Action::Stand
                }
            };

            let outcome = self.table.lock().act(action);
            match outcome {
                Ok(events) => self.broadcast(&events).await,
                Err(ActionError::EmptyDeck) => return Err(RoundError::EmptyDeck),
                Err(error) => {
                    self.interaction
                        .notify(&Event::Rejected {
                            user: prompt.user,
                            error,
                        })
                        .await;
                }
            }
        }

        let state = self.table.lock().state();
        if state == GameState::DealerResolution {
            let events = self.table.lock().play_dealer()?;
            self.broadcast(&events).await;

            let events = self.table.lock().settle()?;
            self.broadcast(&events).await;
        }

        let result = self.table.lock().result().ok_or(RoundError::InvalidState)?;
        info!(guild = self.guild, players = result.players.len(), "round finished");
        Ok(result)
    }

    async fn broadcast(&mut self, events: &[Event]) {
        for event in events {
            self.interaction.notify(event).await;
        }
    }
}
