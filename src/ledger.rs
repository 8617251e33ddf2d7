//! Persistent per-user balances.
//!
//! The ledger lives in memory behind one lock and is flushed to a JSON
//! snapshot on an interval and at shutdown. Every balance change goes through
//! [`Ledger::credit`], [`Ledger::debit`], or [`Ledger::set`].

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::LedgerError;
use crate::options::LedgerOptions;
use crate::sync::Mutex;

/// Opaque user identity supplied by the chat transport.
pub type UserId = String;

/// Balance held by one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    /// Current balance.
    pub current: usize,
    /// Highest balance ever held; used for the leaderboard.
    pub historical_high: usize,
}

impl BalanceRecord {
    const fn starting(balance: usize) -> Self {
        Self {
            current: balance,
            historical_high: balance,
        }
    }

    fn raise_high(&mut self) {
        self.historical_high = self.historical_high.max(self.current);
    }
}

/// Snapshot entry as found on disk. Old snapshots stored a bare balance.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredRecord {
    Record(BalanceRecord),
    Legacy(usize),
}

/// Durable mapping from user to balance.
#[derive(Debug)]
pub struct Ledger {
    /// Snapshot location; `None` keeps the ledger in memory only.
    path: Option<PathBuf>,
    /// Ledger options.
    options: LedgerOptions,
    /// Balances by user.
    records: Mutex<BTreeMap<UserId, BalanceRecord>>,
    /// Held across encode, write and rename so snapshot writes never interleave.
    writer: Mutex<()>,
}

impl Ledger {
    /// Creates an empty ledger that is never written to disk.
    #[must_use]
    pub const fn in_memory(options: LedgerOptions) -> Self {
        Self {
            path: None,
            options,
            records: Mutex::new(BTreeMap::new()),
            writer: Mutex::new(()),
        }
    }

    /// Loads the ledger from the snapshot at `path`.
    ///
    /// A missing snapshot starts an empty ledger, as does one that cannot be
    /// parsed (with a warning). Entries holding a bare integer are upgraded to
    /// full records.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>, options: LedgerOptions) -> Result<Self, LedgerError> {
        let path = path.into();
        let records = match std::fs::read(&path) {
            Ok(bytes) => Self::decode(&bytes, &path),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no balance snapshot, starting empty");
                BTreeMap::new()
            }
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path: Some(path),
            options,
            records: Mutex::new(records),
            writer: Mutex::new(()),
        })
    }

    fn decode(bytes: &[u8], path: &Path) -> BTreeMap<UserId, BalanceRecord> {
        let stored: BTreeMap<UserId, StoredRecord> = match serde_json::from_slice(bytes) {
            Ok(stored) => stored,
            Err(err) => {
                warn!(path = %path.display(), %err, "unreadable balance snapshot, starting empty");
                return BTreeMap::new();
            }
        };

        let mut migrated = 0usize;
        let records: BTreeMap<_, _> = stored
            .into_iter()
            .map(|(user, stored)| {
                let record = match stored {
                    StoredRecord::Record(record) => record,
                    StoredRecord::Legacy(balance) => {
                        migrated += 1;
                        BalanceRecord::starting(balance)
                    }
                };
                (user, record)
            })
            .collect();

        if migrated > 0 {
            info!(migrated, "upgraded legacy balance entries");
        }
        info!(path = %path.display(), users = records.len(), "loaded balance snapshot");
        records
    }

    /// Returns the ledger options.
    #[must_use]
    pub const fn options(&self) -> &LedgerOptions {
        &self.options
    }

    /// Creates a record with the starting balance if the user has none.
    pub fn ensure(&self, user: &str) {
        let start = self.options.starting_balance;
        self.records
            .lock()
            .entry(user.to_owned())
            .or_insert_with(|| BalanceRecord::starting(start));
    }

    /// Returns the user's balance, or the starting balance for unknown users.
    pub fn balance(&self, user: &str) -> usize {
        self.records
            .lock()
            .get(user)
            .map_or(self.options.starting_balance, |r| r.current)
    }

    /// Returns the user's full record, if one exists.
    pub fn record(&self, user: &str) -> Option<BalanceRecord> {
        self.records.lock().get(user).copied()
    }

    /// Adds `amount` to the user's balance, raising the historical high.
    pub fn credit(&self, user: &str, amount: usize) {
        let start = self.options.starting_balance;
        let mut records = self.records.lock();
        let record = records
            .entry(user.to_owned())
            .or_insert_with(|| BalanceRecord::starting(start));
        record.current = record.current.saturating_add(amount);
        record.raise_high();
        debug!(user, amount, balance = record.current, "credit");
    }

    /// Subtracts `amount` if the user can cover it.
    ///
    /// Returns `false` and leaves the balance untouched otherwise.
    pub fn debit(&self, user: &str, amount: usize) -> bool {
        let start = self.options.starting_balance;
        let mut records = self.records.lock();
        let record = records
            .entry(user.to_owned())
            .or_insert_with(|| BalanceRecord::starting(start));

        if record.current < amount {
            debug!(user, amount, balance = record.current, "debit denied");
            return false;
        }

        record.current -= amount;
        debug!(user, amount, balance = record.current, "debit");
        true
    }

    /// Overrides the user's balance. The historical high never drops.
    pub fn set(&self, user: &str, amount: usize) {
        let mut records = self.records.lock();
        let high = records.get(user).map_or(0, |r| r.historical_high);
        records.insert(
            user.to_owned(),
            BalanceRecord {
                current: amount,
                historical_high: high.max(amount),
            },
        );
        info!(user, amount, "balance set");
    }

    /// Resets the user's balance to the starting balance.
    pub fn reset(&self, user: &str) {
        self.set(user, self.options.starting_balance);
    }

    /// Returns up to `n` users ordered by historical high, highest first.
    ///
    /// Ties keep user id order.
    pub fn top(&self, n: usize) -> Vec<(UserId, BalanceRecord)> {
        let mut entries: Vec<_> = self
            .records
            .lock()
            .iter()
            .map(|(user, record)| (user.clone(), *record))
            .collect();
        entries.sort_by(|a, b| b.1.historical_high.cmp(&a.1.historical_high));
        entries.truncate(n);
        entries
    }

    /// Returns the number of users with a record.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns whether no user has a record yet.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Encodes a consistent snapshot under the ledger lock.
    fn encode(&self) -> Result<Vec<u8>, LedgerError> {
        let records = self.records.lock();
        Ok(serde_json::to_vec_pretty(&*records)?)
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut name = OsString::from(path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Writes the snapshot, replacing the previous file as a whole.
    ///
    /// Writes are serialized and each encodes the balances at the time it
    /// holds the write lock, so the last write to finish is the newest.
    /// Does nothing for an in-memory ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be encoded or written.
    pub fn save(&self) -> Result<(), LedgerError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let _writing = self.writer.lock();
        let bytes = self.encode()?;
        let temp = Self::temp_path(path);
        std::fs::write(&temp, bytes)?;
        std::fs::rename(&temp, path)?;
        debug!(path = %path.display(), "saved balance snapshot");
        Ok(())
    }

    /// Runs [`Ledger::save`] on the blocking pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be encoded or written.
    pub async fn flush(self: &Arc<Self>) -> Result<(), LedgerError> {
        let ledger = Arc::clone(self);
        tokio::task::spawn_blocking(move || ledger.save()).await?
    }

    /// Spawns a task that flushes the snapshot every autosave interval.
    ///
    /// Failed flushes are logged and retried on the next tick. Abort the
    /// returned handle and call [`Ledger::save`] at shutdown.
    #[must_use]
    pub fn spawn_autosave(self: &Arc<Self>) -> JoinHandle<()> {
        let ledger = Arc::clone(self);
        let period = self.options.autosave_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(err) = ledger.flush().await {
                    warn!(%err, "autosave failed");
                }
            }
        })
    }
}
