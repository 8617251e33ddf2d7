//! One table per guild.

use std::collections::HashMap;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::game::{GuildId, Table};
use crate::ledger::Ledger;
use crate::options::TableOptions;
use crate::sync::Mutex;

/// A table shared between the round task and the commands that join it.
pub type SharedTable = Arc<Mutex<Table>>;

/// Maps each guild to its single active table.
#[derive(Debug)]
pub struct Registry {
    /// Active tables by guild.
    tables: Mutex<HashMap<GuildId, SharedTable>>,
    /// Balances shared by every table.
    ledger: Arc<Ledger>,
    /// Options for new tables.
    options: TableOptions,
    /// Source of deck seeds.
    rng: Mutex<ChaCha8Rng>,
}

impl Registry {
    /// Creates a registry whose decks are seeded from system randomness.
    #[must_use]
    pub fn new(ledger: Arc<Ledger>, options: TableOptions) -> Self {
        Self::with_seed(ledger, options, rand::random())
    }

    /// Creates a registry with deterministic deck seeds.
    #[must_use]
    pub fn with_seed(ledger: Arc<Ledger>, options: TableOptions, seed: u64) -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            ledger,
            options,
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Returns the shared ledger.
    #[must_use]
    pub const fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// Returns the options new tables are created with.
    #[must_use]
    pub const fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Returns the guild's table, creating one if there is none.
    ///
    /// A finished table left behind is replaced. Concurrent callers for the
    /// same guild get the same table.
    pub fn get_or_create(&self, guild: GuildId) -> SharedTable {
        let mut tables = self.tables.lock();

        if let Some(table) = tables.get(&guild) {
            if !table.lock().is_finished() {
                return Arc::clone(table);
            }
        }

        let seed = self.rng.lock().random();
        let table = Arc::new(Mutex::new(Table::new(
            guild,
            self.options.clone(),
            Arc::clone(&self.ledger),
            seed,
        )));
        tables.insert(guild, Arc::clone(&table));
        info!(guild, "table created");
        table
    }

    /// Returns the guild's table, if one exists.
    pub fn get(&self, guild: GuildId) -> Option<SharedTable> {
        self.tables.lock().get(&guild).cloned()
    }

    /// Retires the guild's table. Does nothing if there is none.
    pub fn remove(&self, guild: GuildId) {
        if self.tables.lock().remove(&guild).is_some() {
            info!(guild, "table retired");
        }
    }

    /// Retires the guild's table only if it is still `table`.
    ///
    /// A round that finished may already have been replaced by a newer table
    /// for the same guild; that successor is left alone.
    pub fn remove_if(&self, guild: GuildId, table: &SharedTable) {
        let mut tables = self.tables.lock();
        if tables.get(&guild).is_some_and(|t| Arc::ptr_eq(t, table)) {
            tables.remove(&guild);
            info!(guild, "table retired");
        }
    }

    /// Returns the number of active tables.
    pub fn len(&self) -> usize {
        self.tables.lock().len()
    }

    /// Returns whether no guild has a table.
    pub fn is_empty(&self) -> bool {
        self.tables.lock().is_empty()
    }
}
