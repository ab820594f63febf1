//! Append-only hash chain of accepted transactions.
//!
//! Linear, not block-structured: each accepted transfer is its own link.
//! Entry `i > 0` carries `previous_link == chain_hash(entry[i - 1])`, and
//! entry 0 is always the fixed genesis record.
//!
//! Entries live behind an `Arc` and are copied on write, so
//! [`Chain::snapshot`] is O(1) and an outstanding snapshot never blocks an
//! append.

use std::slice;
use std::sync::Arc;
use thiserror::Error;

use crate::error::ErrorKind;
use crate::transaction::codec::chain_hash;
use crate::transaction::types::Transaction;

/// Chain integrity failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// No genesis entry. Only reachable through [`Chain::from_entries`].
    #[error("ledger is uninitialized: chain has no genesis entry")]
    Uninitialized,

    /// Entry 0 is not the fixed genesis record.
    #[error("chain does not start with the genesis entry")]
    BadGenesis,

    /// `entries[position].previous_link` doesn't match the hash of its predecessor.
    #[error("broken link at position {position}")]
    BrokenLink { position: usize },
}

impl ChainError {
    /// A missing genesis is a programmer error; a bad link means someone
    /// tampered with history.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Uninitialized => ErrorKind::UninitializedLedger,
            Self::BadGenesis | Self::BrokenLink { .. } => ErrorKind::AuthenticationFailure,
        }
    }
}

/// Ordered, append-only sequence of chain entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    entries: Arc<Vec<Transaction>>,
}

impl Chain {
    /// A chain holding only the genesis entry.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(vec![Transaction::genesis()]),
        }
    }

    /// Rebuild a chain from existing entries, auditing every link.
    pub fn from_entries(entries: Vec<Transaction>) -> Result<Self, ChainError> {
        let chain = Self {
            entries: Arc::new(entries),
        };
        chain.verify()?;
        Ok(chain)
    }

    /// The most recently accepted entry.
    pub fn head(&self) -> Result<&Transaction, ChainError> {
        self.entries.last().ok_or(ChainError::Uninitialized)
    }

    /// Chain hash of the head: the `previous_link` the next entry will carry.
    pub fn head_hash(&self) -> Result<String, ChainError> {
        self.head().map(chain_hash)
    }

    /// Links `tx` to the current head and appends it. Returns the new entry.
    pub fn link(&mut self, mut tx: Transaction) -> Result<&Transaction, ChainError> {
        tx.previous_link = self.head_hash()?;
        // Clones the entries only while a snapshot is still alive.
        Arc::make_mut(&mut self.entries).push(tx);
        self.head()
    }

    /// Number of entries, genesis included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Only true for a chain that failed to initialize.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `position`, if any.
    pub fn get(&self, position: usize) -> Option<&Transaction> {
        self.entries.get(position)
    }

    /// All entries in chain order.
    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    /// Shared, immutable copy of the entries as of now.
    pub fn snapshot(&self) -> Arc<Vec<Transaction>> {
        Arc::clone(&self.entries)
    }

    /// Entries where `address` is sender or recipient, in chain order.
    pub fn involving<'a>(&'a self, address: &'a str) -> Involving<'a> {
        Involving::new(&self.entries, address)
    }

    /// Recompute every link from genesis forward.
    pub fn verify(&self) -> Result<(), ChainError> {
        let genesis = self.entries.first().ok_or(ChainError::Uninitialized)?;
        if *genesis != Transaction::genesis() {
            return Err(ChainError::BadGenesis);
        }
        for (position, pair) in self.entries.windows(2).enumerate() {
            if pair[1].previous_link != chain_hash(&pair[0]) {
                return Err(ChainError::BrokenLink {
                    position: position + 1,
                });
            }
        }
        Ok(())
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the entries touching one address. See [`Chain::involving`].
#[derive(Debug, Clone)]
pub struct Involving<'a> {
    inner: slice::Iter<'a, Transaction>,
    address: &'a str,
}

impl<'a> Involving<'a> {
    pub(crate) fn new(entries: &'a [Transaction], address: &'a str) -> Self {
        Self {
            inner: entries.iter(),
            address,
        }
    }
}

impl<'a> Iterator for Involving<'a> {
    type Item = &'a Transaction;

    fn next(&mut self) -> Option<Self::Item> {
        let address = self.address;
        self.inner.by_ref().find(|tx| tx.involves(address))
    }
}
