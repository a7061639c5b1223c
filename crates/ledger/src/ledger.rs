//! In-memory reference ledger
//!
//! [`MemoryLedger`] plays the host's part for a single channel: it orders
//! transactions, assigns each a deterministic id and timestamp, runs the
//! contract handler against a snapshot, validates the read set and commits
//! the write set atomically.
//!
//! ## Transaction Lifecycle
//!
//! ```text
//! begin ──> handler runs on TxContext ──> commit ──> validate reads ──> apply
//!                      │                                   │
//!                      └── error: discard ─────────────────┴── conflict: discard
//! ```
//!
//! A handler error or a read conflict leaves the world state untouched.
//!
//! ## Clock
//!
//! Transaction `n` (0-based) is stamped `genesis_time + n * block_interval`.
//! Ids are the hex SHA-256 of `"{channel}:{n}"`. Both depend only on the
//! configuration and the submission order, so replays are reproducible.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use agri_core::{Contract, Output, Result as ContractResult, TxTimestamp};
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::config::{LedgerConfig, CONFIG_FILE_NAME};
use crate::error::{LedgerError, LedgerResult};
use crate::transaction::{hex, TxContext, TxHeader, WriteSet};
use crate::validation::validate_read_set;
use crate::world::WorldState;

/// Outcome of a successful commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    /// Committed transaction
    pub tx_id: String,
    /// World-state version after the commit
    pub version: u64,
    /// Number of keys written or deleted
    pub writes: usize,
}

/// Transaction counters
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerMetrics {
    /// Transactions begun
    pub total_started: u64,
    /// Transactions committed
    pub total_committed: u64,
    /// Transactions discarded (handler error or conflict)
    pub total_aborted: u64,
    /// committed / started
    pub commit_rate: f64,
}

struct LedgerInner {
    config: LedgerConfig,
    genesis: TxTimestamp,
    world: RwLock<WorldState>,
    sequence: AtomicU64,
    total_started: AtomicU64,
    total_committed: AtomicU64,
    total_aborted: AtomicU64,
}

/// Single-channel in-memory ledger. Cloning shares the same state.
#[derive(Clone)]
pub struct MemoryLedger {
    inner: Arc<LedgerInner>,
}

impl std::fmt::Debug for MemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryLedger")
            .field("channel", &self.inner.config.channel)
            .field("height", &self.height())
            .finish()
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedger {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Ledger with the default configuration
    pub fn new() -> Self {
        let config = LedgerConfig::default();
        // The default genesis literal always parses.
        let genesis = config.genesis().unwrap_or(TxTimestamp::EPOCH);
        Self::build(config, genesis)
    }

    /// Ledger with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Config` if the configuration does not validate.
    pub fn with_config(config: LedgerConfig) -> LedgerResult<Self> {
        config.validate()?;
        let genesis = config.genesis()?;
        Ok(Self::build(config, genesis))
    }

    /// Ledger configured from `agriledger.toml` in `dir`.
    ///
    /// A default config file is written first if none exists.
    pub fn open(dir: &Path) -> LedgerResult<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        LedgerConfig::write_default_if_missing(&path)?;
        let config = LedgerConfig::from_file(&path)?;
        info!(target: "agri::txn", path = %path.display(), channel = %config.channel, "Ledger opened");
        Self::with_config(config)
    }

    fn build(config: LedgerConfig, genesis: TxTimestamp) -> Self {
        MemoryLedger {
            inner: Arc::new(LedgerInner {
                config,
                genesis,
                world: RwLock::new(WorldState::new()),
                sequence: AtomicU64::new(0),
                total_started: AtomicU64::new(0),
                total_committed: AtomicU64::new(0),
                total_aborted: AtomicU64::new(0),
            }),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &LedgerConfig {
        &self.inner.config
    }

    // =========================================================================
    // Transaction lifecycle
    // =========================================================================

    /// Header for submission slot `sequence`
    pub fn header_at(&self, sequence: u64) -> TxHeader {
        let mut hasher = Sha256::new();
        hasher.update(self.inner.config.channel.as_bytes());
        hasher.update(b":");
        hasher.update(sequence.to_string().as_bytes());
        let offset_ms = self.inner.config.block_interval_ms.saturating_mul(sequence);
        TxHeader {
            tx_id: hex(&hasher.finalize()),
            timestamp: self
                .inner
                .genesis
                .saturating_add(Duration::from_millis(offset_ms)),
            sequence,
        }
    }

    /// Allocate the next submission slot
    pub fn next_header(&self) -> TxHeader {
        let sequence = self.inner.sequence.fetch_add(1, Ordering::SeqCst);
        self.header_at(sequence)
    }

    /// Begin a transaction in the next submission slot
    pub fn begin(&self) -> TxContext {
        let header = self.next_header();
        self.begin_with(header)
    }

    /// Begin a transaction with an explicit header
    pub fn begin_with(&self, header: TxHeader) -> TxContext {
        let snapshot = self
            .inner
            .world
            .read()
            .snapshot(self.inner.config.history_enabled);
        self.inner.total_started.fetch_add(1, Ordering::Relaxed);
        debug!(
            target: "agri::txn",
            tx_id = %header.tx_id,
            sequence = header.sequence,
            snapshot = snapshot.version(),
            "Transaction started"
        );
        TxContext::new(header, snapshot)
    }

    /// Validate and apply a transaction.
    ///
    /// Read-only transactions validate but do not advance the version.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::MvccConflict` if a key the transaction read was
    /// committed by someone else since its snapshot.
    pub fn commit(&self, tx: TxContext) -> LedgerResult<CommitReceipt> {
        let (header, reads, writes) = tx.into_parts();
        let mut world = self.inner.world.write();

        if let Some(conflict) = validate_read_set(&reads, &world).into_iter().next() {
            drop(world);
            let err = LedgerError::from(conflict);
            self.record_abort(&header, &err);
            return Err(err);
        }

        let version = if writes.is_empty() {
            world.version()
        } else {
            world.apply(&header, &writes, self.inner.config.history_enabled)
        };
        drop(world);

        self.inner.total_committed.fetch_add(1, Ordering::Relaxed);
        info!(
            target: "agri::txn",
            tx_id = %header.tx_id,
            version,
            writes = writes.len(),
            "Transaction committed"
        );
        Ok(CommitReceipt {
            tx_id: header.tx_id,
            version,
            writes: writes.len(),
        })
    }

    /// Discard a transaction without applying it
    pub fn abort(&self, tx: TxContext, reason: &LedgerError) {
        let (header, _, _) = tx.into_parts();
        self.record_abort(&header, reason);
    }

    fn record_abort(&self, header: &TxHeader, reason: &LedgerError) {
        self.inner.total_aborted.fetch_add(1, Ordering::Relaxed);
        warn!(target: "agri::txn", tx_id = %header.tx_id, error = %reason, "Transaction aborted");
    }

    /// Run `f` in a fresh transaction and commit if it succeeds.
    ///
    /// # Example
    ///
    /// ```
    /// use agri_core::LedgerStub;
    /// use agri_ledger::MemoryLedger;
    ///
    /// let ledger = MemoryLedger::new();
    /// ledger.transaction(|tx| {
    ///     tx.put("Crop1", b"{}".to_vec())?;
    ///     Ok(())
    /// }).unwrap();
    /// assert!(ledger.get_committed("Crop1").is_some());
    /// ```
    pub fn transaction<F, T>(&self, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut TxContext) -> ContractResult<T>,
    {
        let mut tx = self.begin();
        match f(&mut tx) {
            Ok(value) => {
                self.commit(tx)?;
                Ok(value)
            }
            Err(e) => {
                let err = LedgerError::Contract(e);
                self.abort(tx, &err);
                Err(err)
            }
        }
    }

    // =========================================================================
    // Contract invocation
    // =========================================================================

    /// Submit `function(args)` to `contract` and commit the result.
    pub fn invoke<C: Contract + ?Sized>(
        &self,
        contract: &C,
        function: &str,
        args: &[&str],
    ) -> LedgerResult<Output> {
        let tx = self.begin();
        self.execute(tx, contract, function, args)
    }

    /// Run `function(args)` inside a prepared transaction and commit it.
    ///
    /// Use with [`TxContext::inject`] to drive handler failure paths.
    pub fn execute<C: Contract + ?Sized>(
        &self,
        mut tx: TxContext,
        contract: &C,
        function: &str,
        args: &[&str],
    ) -> LedgerResult<Output> {
        let args = owned(args);
        match run(&mut tx, contract, function, &args) {
            Ok(output) => {
                self.commit(tx)?;
                Ok(output)
            }
            Err(err) => {
                self.abort(tx, &err);
                Err(err)
            }
        }
    }

    /// Evaluate `function(args)` against the latest state without committing.
    ///
    /// Does not consume a submission slot.
    pub fn query<C: Contract + ?Sized>(
        &self,
        contract: &C,
        function: &str,
        args: &[&str],
    ) -> LedgerResult<Output> {
        let header = self.header_at(self.inner.sequence.load(Ordering::SeqCst));
        let (output, _) = self.simulate(header, contract, function, args)?;
        Ok(output)
    }

    /// Execute under `header` against the latest state and return the
    /// output together with the staged write set. Nothing is committed.
    pub fn simulate<C: Contract + ?Sized>(
        &self,
        header: TxHeader,
        contract: &C,
        function: &str,
        args: &[&str],
    ) -> LedgerResult<(Output, WriteSet)> {
        let snapshot = self
            .inner
            .world
            .read()
            .snapshot(self.inner.config.history_enabled);
        let mut tx = TxContext::new(header, snapshot);
        let output = run(&mut tx, contract, function, &owned(args))?;
        let (_, _, writes) = tx.into_parts();
        Ok((output, writes))
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Committed world-state version
    pub fn height(&self) -> u64 {
        self.inner.world.read().version()
    }

    /// Committed payload of `key`
    pub fn get_committed(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.world.read().get(key).map(|c| c.value.clone())
    }

    /// All committed keys, in key order (composite keys first)
    pub fn committed_keys(&self) -> Vec<String> {
        self.inner.world.read().keys().cloned().collect()
    }

    /// Number of commits recorded for `key`
    pub fn history_len(&self, key: &str) -> usize {
        self.inner.world.read().history_len(key)
    }

    /// Transaction counters
    pub fn metrics(&self) -> LedgerMetrics {
        let started = self.inner.total_started.load(Ordering::Relaxed);
        let committed = self.inner.total_committed.load(Ordering::Relaxed);
        LedgerMetrics {
            total_started: started,
            total_committed: committed,
            total_aborted: self.inner.total_aborted.load(Ordering::Relaxed),
            commit_rate: if started > 0 {
                committed as f64 / started as f64
            } else {
                0.0
            },
        }
    }
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}

fn run<C: Contract + ?Sized>(
    tx: &mut TxContext,
    contract: &C,
    function: &str,
    args: &[String],
) -> LedgerResult<Output> {
    debug!(
        target: "agri::txn",
        tx_id = %tx.header().tx_id,
        contract = contract.name(),
        function,
        "Invoking handler"
    );
    let output = contract.invoke(tx, function, args)?;
    let leaked = tx.open_iterators();
    if leaked > 0 {
        warn!(target: "agri::txn", tx_id = %tx.header().tx_id, leaked, "Handler returned with open iterators");
    }
    Ok(output)
}
