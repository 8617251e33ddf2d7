//! Table and ledger configuration.

use core::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Configuration options for a blackjack table.
///
/// Use the builder pattern to customize options:
///
/// ```
/// use bjtable::TableOptions;
///
/// let options = TableOptions::default()
///     .with_min_bet(50)
///     .with_dealer_stands_on(17);
/// ```
///
/// Hosts can also load options from JSON; missing fields keep their defaults:
///
/// ```
/// use bjtable::TableOptions;
///
/// let options: TableOptions = serde_json::from_str(r#"{"min_bet": 10}"#).unwrap();
/// assert_eq!(options.min_bet, 10);
/// assert_eq!(options.dealer_stands_on, 17);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Smallest bet accepted when joining.
    pub min_bet: usize,
    /// Dealer draws while below this value.
    pub dealer_stands_on: u8,
    /// Amount credited for a natural, as a multiple of the bet (stake included).
    pub natural_pays: f64,
    /// How long a player has to choose an action before standing.
    #[serde(with = "secs")]
    pub action_timeout: Duration,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            min_bet: 20,
            dealer_stands_on: 17,
            natural_pays: 2.5,
            action_timeout: Duration::from_secs(60),
        }
    }
}

impl TableOptions {
    /// Sets the minimum bet.
    ///
    /// # Example
    ///
    /// ```
    /// use bjtable::TableOptions;
    ///
    /// let options = TableOptions::default().with_min_bet(5);
    /// assert_eq!(options.min_bet, 5);
    /// ```
    #[must_use]
    pub const fn with_min_bet(mut self, min_bet: usize) -> Self {
        self.min_bet = min_bet;
        self
    }

    /// Sets the value the dealer stands on.
    #[must_use]
    pub const fn with_dealer_stands_on(mut self, value: u8) -> Self {
        self.dealer_stands_on = value;
        self
    }

    /// Sets the natural payout multiple.
    #[must_use]
    pub const fn with_natural_pays(mut self, multiple: f64) -> Self {
        self.natural_pays = multiple;
        self
    }

    /// Sets the per-action timeout.
    ///
    /// # Example
    ///
    /// ```
    /// use core::time::Duration;
    /// use bjtable::TableOptions;
    ///
    /// let options = TableOptions::default().with_action_timeout(Duration::from_secs(30));
    /// assert_eq!(options.action_timeout, Duration::from_secs(30));
    /// ```
    #[must_use]
    pub const fn with_action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = timeout;
        self
    }

    /// Computes the credit for a natural on `bet`, truncating fractions.
    #[must_use]
    pub fn natural_payout(&self, bet: usize) -> usize {
        #[expect(
            clippy::cast_precision_loss,
            reason = "f64 has sufficient precision for monetary values"
        )]
        let payout = (bet as f64) * self.natural_pays;
        payout.floor() as usize
    }
}

/// Configuration options for the balance ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerOptions {
    /// Balance given to a user on first reference.
    pub starting_balance: usize,
    /// How often the snapshot is flushed to disk.
    #[serde(with = "secs")]
    pub autosave_interval: Duration,
}

impl Default for LedgerOptions {
    fn default() -> Self {
        Self {
            starting_balance: 1000,
            autosave_interval: Duration::from_secs(300),
        }
    }
}

impl LedgerOptions {
    /// Sets the starting balance.
    #[must_use]
    pub const fn with_starting_balance(mut self, balance: usize) -> Self {
        self.starting_balance = balance;
        self
    }

    /// Sets the autosave interval.
    #[must_use]
    pub const fn with_autosave_interval(mut self, interval: Duration) -> Self {
        self.autosave_interval = interval;
        self
    }
}

mod secs {
    use super::{Deserialize, Deserializer, Duration, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
