//! Transaction context
//!
//! A [`TxContext`] is the [`LedgerStub`] a handler runs against. It holds:
//! - the header assigned by the ledger (transaction id + timestamp)
//! - the snapshot fixed at `begin`
//! - the read set: every key observed, with the version it had
//! - the write set: staged puts and tombstones, last operation per key wins
//!
//! Reads never observe the write set. Two contexts built from the same
//! snapshot and header, driven by the same handler, stage identical write
//! sets.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use agri_core::composite::is_composite_key;
use agri_core::{
    create_composite_key, HistoryIter, KeyModification, KeyValue, LedgerStub, StateIter, StubError,
    StubResult, TxTimestamp,
};
use sha2::{Digest, Sha256};

use crate::world::{Committed, Snapshot};

/// Identity and ordering time of one transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxHeader {
    /// Transaction id (hex SHA-256)
    pub tx_id: String,
    /// Timestamp assigned by the ordering service
    pub timestamp: TxTimestamp,
    /// Position in the ledger's submission order
    pub sequence: u64,
}

/// A staged operation on one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// Put this payload
    Put(Vec<u8>),
    /// Tombstone
    Delete,
}

/// Staged writes of one transaction, ordered by key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSet {
    entries: BTreeMap<String, WriteOp>,
}

impl WriteSet {
    /// Stage a put; replaces any earlier operation on `key`
    pub fn put(&mut self, key: &str, value: Vec<u8>) {
        self.entries.insert(key.to_string(), WriteOp::Put(value));
    }

    /// Stage a tombstone; replaces any earlier operation on `key`
    pub fn delete(&mut self, key: &str) {
        self.entries.insert(key.to_string(), WriteOp::Delete);
    }

    /// Staged operation on `key`
    pub fn get(&self, key: &str) -> Option<&WriteOp> {
        self.entries.get(key)
    }

    /// Operations in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &WriteOp)> {
        self.entries.iter()
    }

    /// Number of keys written
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was staged
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// SHA-256 over the canonical encoding of the write set.
    ///
    /// Each entry contributes `len(key) key tag [len(value) value]` with
    /// big-endian u64 lengths; tag is 1 for put, 0 for delete.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for (key, op) in &self.entries {
            hasher.update((key.len() as u64).to_be_bytes());
            hasher.update(key.as_bytes());
            match op {
                WriteOp::Put(value) => {
                    hasher.update([1u8]);
                    hasher.update((value.len() as u64).to_be_bytes());
                    hasher.update(value);
                }
                WriteOp::Delete => hasher.update([0u8]),
            }
        }
        hex(&hasher.finalize())
    }
}

/// Injected stub failure, for exercising handler error paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// `get` of this key fails
    Read {
        /// Failing key
        key: String,
    },
    /// `put`/`delete` of this key fails
    Write {
        /// Failing key
        key: String,
    },
    /// `history_for` of this key fails
    History {
        /// Failing key
        key: String,
    },
    /// Scans yield an error after this many entries
    Scan {
        /// Entries delivered before the failure
        after: usize,
    },
    /// `tx_timestamp` fails
    Timestamp,
}

fn io_fault(what: &str) -> StubError {
    StubError::Io {
        reason: format!("injected fault: {}", what),
    }
}

/// Counts iterators a context has handed out and not yet released
#[derive(Debug)]
struct IterGuard {
    open: Arc<AtomicUsize>,
}

impl IterGuard {
    fn acquire(open: &Arc<AtomicUsize>) -> Self {
        open.fetch_add(1, Ordering::SeqCst);
        IterGuard {
            open: Arc::clone(open),
        }
    }
}

impl Drop for IterGuard {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Scan iterator: records each delivered key in the read set.
struct ScanIter<'a> {
    inner: Box<dyn Iterator<Item = (&'a String, &'a Committed)> + 'a>,
    read_set: &'a RefCell<BTreeMap<String, u64>>,
    fail_after: Option<usize>,
    delivered: usize,
    done: bool,
    _guard: IterGuard,
}

impl Iterator for ScanIter<'_> {
    type Item = StubResult<KeyValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.fail_after == Some(self.delivered) {
            self.done = true;
            return Some(Err(io_fault("scan")));
        }
        match self.inner.next() {
            Some((key, committed)) => {
                self.delivered += 1;
                self.read_set
                    .borrow_mut()
                    .insert(key.clone(), committed.version);
                Some(Ok(KeyValue {
                    key: key.clone(),
                    value: committed.value.clone(),
                }))
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

struct HistoryScan {
    inner: std::vec::IntoIter<KeyModification>,
    _guard: IterGuard,
}

impl Iterator for HistoryScan {
    type Item = StubResult<KeyModification>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Ok)
    }
}

/// Execution context of one transaction
#[derive(Debug)]
pub struct TxContext {
    header: TxHeader,
    snapshot: Snapshot,
    read_set: RefCell<BTreeMap<String, u64>>,
    write_set: WriteSet,
    faults: Vec<Fault>,
    open_iterators: Arc<AtomicUsize>,
}

impl TxContext {
    /// Context over `snapshot` for the transaction `header`
    pub fn new(header: TxHeader, snapshot: Snapshot) -> Self {
        TxContext {
            header,
            snapshot,
            read_set: RefCell::new(BTreeMap::new()),
            write_set: WriteSet::default(),
            faults: Vec::new(),
            open_iterators: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make a stub operation fail for the rest of this transaction
    pub fn inject(&mut self, fault: Fault) {
        self.faults.push(fault);
    }

    /// Transaction header
    pub fn header(&self) -> &TxHeader {
        &self.header
    }

    /// Snapshot version this transaction reads at
    pub fn snapshot_version(&self) -> u64 {
        self.snapshot.version()
    }

    /// Keys read so far, with the version observed
    pub fn read_set(&self) -> BTreeMap<String, u64> {
        self.read_set.borrow().clone()
    }

    /// Writes staged so far
    pub fn write_set(&self) -> &WriteSet {
        &self.write_set
    }

    /// Iterators handed out and not yet dropped
    pub fn open_iterators(&self) -> usize {
        self.open_iterators.load(Ordering::SeqCst)
    }

    /// Consume the context into its header, read set and write set
    pub fn into_parts(self) -> (TxHeader, BTreeMap<String, u64>, WriteSet) {
        (self.header, self.read_set.into_inner(), self.write_set)
    }

    fn has_fault(&self, probe: impl Fn(&Fault) -> bool) -> bool {
        self.faults.iter().any(probe)
    }

    fn scan_fault(&self) -> Option<usize> {
        self.faults.iter().find_map(|f| match f {
            Fault::Scan { after } => Some(*after),
            _ => None,
        })
    }

    fn scan<'a>(
        &'a self,
        inner: Box<dyn Iterator<Item = (&'a String, &'a Committed)> + 'a>,
    ) -> StateIter<'a> {
        Box::new(ScanIter {
            inner,
            read_set: &self.read_set,
            fail_after: self.scan_fault(),
            delivered: 0,
            done: false,
            _guard: IterGuard::acquire(&self.open_iterators),
        })
    }
}

fn require_key(key: &str) -> StubResult<()> {
    if key.is_empty() {
        return Err(StubError::EmptyKey);
    }
    Ok(())
}

fn require_simple_bound(bound: &str) -> StubResult<()> {
    if is_composite_key(bound) {
        return Err(StubError::InvalidCompositeKey {
            reason: format!(
                "range bound {:?} starts with U+0000, which is reserved for composite keys",
                bound
            ),
        });
    }
    Ok(())
}

impl LedgerStub for TxContext {
    fn get(&self, key: &str) -> StubResult<Option<Vec<u8>>> {
        require_key(key)?;
        if self.has_fault(|f| matches!(f, Fault::Read { key: k } if k == key)) {
            return Err(io_fault("read"));
        }
        let committed = self.snapshot.get(key);
        self.read_set
            .borrow_mut()
            .insert(key.to_string(), committed.map_or(0, |c| c.version));
        Ok(committed.map(|c| c.value.clone()))
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> StubResult<()> {
        require_key(key)?;
        if self.has_fault(|f| matches!(f, Fault::Write { key: k } if k == key)) {
            return Err(io_fault("write"));
        }
        self.write_set.put(key, value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> StubResult<()> {
        require_key(key)?;
        if self.has_fault(|f| matches!(f, Fault::Write { key: k } if k == key)) {
            return Err(io_fault("delete"));
        }
        self.write_set.delete(key);
        Ok(())
    }

    fn range_scan(&self, start: &str, end: &str) -> StubResult<StateIter<'_>> {
        require_simple_bound(start)?;
        require_simple_bound(end)?;
        Ok(self.scan(self.snapshot.range(start, end)))
    }

    fn prefix_scan(&self, object_type: &str, attributes: &[&str]) -> StubResult<StateIter<'_>> {
        let prefix = create_composite_key(object_type, attributes)?;
        Ok(self.scan(self.snapshot.prefixed(&prefix)))
    }

    fn history_for(&self, key: &str) -> StubResult<HistoryIter<'_>> {
        require_key(key)?;
        if !self.snapshot.history_enabled() {
            return Err(StubError::Unavailable {
                reason: "history is disabled for this ledger".to_string(),
            });
        }
        if self.has_fault(|f| matches!(f, Fault::History { key: k } if k == key)) {
            return Err(io_fault("history"));
        }
        Ok(Box::new(HistoryScan {
            inner: self.snapshot.history(key).to_vec().into_iter(),
            _guard: IterGuard::acquire(&self.open_iterators),
        }))
    }

    fn tx_timestamp(&self) -> StubResult<TxTimestamp> {
        if self.has_fault(|f| matches!(f, Fault::Timestamp)) {
            return Err(StubError::Timestamp {
                reason: "injected fault: timestamp unavailable".to_string(),
            });
        }
        Ok(self.header.timestamp)
    }

    fn tx_id(&self) -> &str {
        &self.header.tx_id
    }
}

pub(crate) fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
