//! The ledger state machine.
//!
//! A [`Ledger`] owns the balance sheet and the hash chain together, behind
//! one `parking_lot::RwLock`. Writers (`submit`, `credit_without_proof`)
//! hold the write lock for their entire critical section, so two transfers
//! that each fit the sender's balance but jointly don't can never both be
//! accepted: the second one sees the first one's debit. Readers take the
//! read lock and never observe a half-applied transfer.
//!
//! Signature verification is pure and runs *before* the lock is taken, so
//! the expensive part of a submit never blocks other requests.
//!
//! parking_lot's lock is eventually fair: a long queue of readers cannot
//! starve a waiting writer indefinitely, and vice versa.
//!
//! No guard ever leaves this module. History views own a snapshot of the
//! chain, so holding one never blocks a writer.

use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use super::chain::{Chain, ChainError, Involving};
use super::state::{BalanceError, BalanceSheet};
use crate::error::ErrorKind;
use crate::transaction::codec::{self, chain_hash, CodecError};
use crate::transaction::{Amount, Transaction, TransferRequest};

/// Why a submission or credit was refused. No state changed in any case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error(transparent)]
    Malformed(#[from] CodecError),

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Insufficient balance")]
    InsufficientFunds,

    #[error("balance would overflow")]
    Overflow,

    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl Rejection {
    /// Maps this rejection onto the crate-wide taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Malformed(e) => e.kind(),
            Self::InvalidSignature => ErrorKind::AuthenticationFailure,
            Self::InsufficientFunds => ErrorKind::InsufficientFunds,
            Self::Overflow => ErrorKind::MalformedInput,
            Self::Chain(e) => e.kind(),
        }
    }
}

impl From<BalanceError> for Rejection {
    fn from(e: BalanceError) -> Self {
        match e {
            BalanceError::Insufficient => Self::InsufficientFunds,
            BalanceError::Overflow => Self::Overflow,
        }
    }
}

/// What the caller gets back for an accepted transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Chain hash of the accepted entry.
    pub hash: String,
    /// Chain hash of the entry before it.
    pub previous_link: String,
    /// Position in the chain (genesis is 0).
    pub position: usize,
    /// Sender balance after the debit.
    pub sender_balance: Amount,
    /// Recipient balance after the credit.
    pub recipient_balance: Amount,
}

/// Point-in-time summary for status endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSummary {
    /// Entries in the chain, genesis included.
    pub chain_length: usize,
    /// Chain hash of the newest entry.
    pub head_hash: String,
    /// Accounts that have ever been touched.
    pub accounts: usize,
    /// Everything ever credited without proof. Transfers conserve value,
    /// so this is also the sum of all balances.
    pub total_supply: Amount,
}

#[derive(Debug)]
struct LedgerState {
    balances: BalanceSheet,
    chain: Chain,
    minted: Amount,
}

/// The sole authority over balances and chain integrity.
///
/// Share it with `Arc<Ledger>`; every method takes `&self`.
#[derive(Debug)]
pub struct Ledger {
    state: RwLock<LedgerState>,
}

impl Ledger {
    /// An initialized ledger: genesis entry in place, no balances.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LedgerState {
                balances: BalanceSheet::new(),
                chain: Chain::new(),
                minted: Amount::ZERO,
            }),
        }
    }

    /// Verify, check solvency, debit, credit, link. All or nothing.
    pub fn submit(&self, request: TransferRequest) -> Result<Receipt, Rejection> {
        match codec::verify_request(&request) {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(sender = %request.sender, "rejected transfer: invalid signature");
                return Err(Rejection::InvalidSignature);
            }
            Err(e) => {
                tracing::warn!(sender = %request.sender, error = %e, "rejected transfer: malformed input");
                return Err(e.into());
            }
        }

        let mut state = self.state.write();
        let LedgerState {
            balances, chain, ..
        } = &mut *state;

        // Fail before mutating anything if the chain is somehow headless.
        chain.head()?;

        if let Err(e) = balances.transfer(&request.sender, &request.recipient, request.amount) {
            tracing::info!(
                sender = %request.sender,
                amount = %request.amount,
                reason = ?e,
                "rejected transfer"
            );
            return Err(e.into());
        }

        let sender_balance = balances.get(&request.sender);
        let recipient_balance = balances.get(&request.recipient);
        let entry = chain.link(Transaction::from_request(request, String::new()))?;
        let hash = chain_hash(entry);
        let previous_link = entry.previous_link.clone();

        let receipt = Receipt {
            hash,
            previous_link,
            position: chain.len() - 1,
            sender_balance,
            recipient_balance,
        };

        tracing::info!(
            position = receipt.position,
            hash = %receipt.hash,
            "transfer accepted"
        );
        Ok(receipt)
    }

    /// Faucet/airdrop escape hatch: credit `address` with no signature and
    /// no solvency check. Not part of the transfer protocol, and not recorded
    /// in the chain. Returns the new balance.
    pub fn credit_without_proof(&self, address: &str, amount: Amount) -> Result<Amount, Rejection> {
        if address.is_empty() {
            return Err(CodecError::EmptyRecipient.into());
        }

        let mut state = self.state.write();
        let minted = state.minted.checked_add(amount).ok_or(Rejection::Overflow)?;
        let balance = state.balances.credit(address, amount)?;
        state.minted = minted;

        tracing::info!(address, amount = %amount, balance = %balance, "credited without proof");
        Ok(balance)
    }

    /// Balance of `address`, zero if the ledger has never seen it.
    pub fn balance_of(&self, address: &str) -> Amount {
        self.state.read().balances.get(address)
    }

    /// Lazy, restartable view of the entries touching `address`, in chain order.
    ///
    /// The view is a snapshot: entries accepted after this call are not in it.
    pub fn transactions_for(&self, address: impl Into<String>) -> AddressHistory {
        AddressHistory {
            entries: self.state.read().chain.snapshot(),
            address: address.into(),
        }
    }

    /// Snapshot of the whole chain, genesis first.
    pub fn history(&self) -> Vec<Transaction> {
        self.state.read().chain.entries().to_vec()
    }

    /// Number of chain entries, genesis included.
    pub fn len(&self) -> usize {
        self.state.read().chain.len()
    }

    /// Never true for a ledger built with [`Ledger::new`].
    pub fn is_empty(&self) -> bool {
        self.state.read().chain.is_empty()
    }

    /// Chain hash of the newest entry.
    pub fn head_hash(&self) -> Result<String, ChainError> {
        self.state.read().chain.head_hash()
    }

    /// Audit every link from genesis to head.
    pub fn verify_chain(&self) -> Result<(), ChainError> {
        self.state.read().chain.verify()
    }

    /// Consistent snapshot of chain length, head, account count, and supply.
    pub fn summary(&self) -> Result<LedgerSummary, ChainError> {
        let state = self.state.read();
        Ok(LedgerSummary {
            chain_length: state.chain.len(),
            head_hash: state.chain.head_hash()?,
            accounts: state.balances.len(),
            total_supply: state.minted,
        })
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

/// Owned view over one address's history. See [`Ledger::transactions_for`].
#[derive(Debug, Clone)]
pub struct AddressHistory {
    entries: Arc<Vec<Transaction>>,
    address: String,
}

impl AddressHistory {
    /// A fresh pass over the matching entries. Call as often as you like.
    pub fn iter(&self) -> Involving<'_> {
        Involving::new(&self.entries, &self.address)
    }

    /// The address this view filters on.
    pub fn address(&self) -> &str {
        &self.address
    }
}

impl<'h> IntoIterator for &'h AddressHistory {
    type Item = &'h Transaction;
    type IntoIter = Involving<'h>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::Keypair;
    use crate::transaction::codec::sign_with;

    fn coins(n: u64) -> Amount {
        Amount::from_coins(n).unwrap()
    }

    fn signed(kp: &Keypair, recipient: &str, amount: Amount) -> TransferRequest {
        let sender = kp.public_key().to_hex();
        let signature = sign_with(kp, &sender, recipient, amount).to_base64();
        TransferRequest {
            sender,
            recipient: recipient.to_string(),
            amount,
            signature,
        }
    }

    #[test]
    fn fresh_ledger_is_initialized() {
        let ledger = Ledger::new();
        assert_eq!(ledger.len(), 1);
        assert!(!ledger.is_empty());
        assert!(ledger.verify_chain().is_ok());
        assert!(ledger.history()[0].is_genesis());
    }

    #[test]
    fn broke_sender_is_rejected_without_mutation() {
        let ledger = Ledger::new();
        let alice = Keypair::generate().unwrap();
        let err = ledger.submit(signed(&alice, "bob", coins(10))).unwrap_err();
        assert_eq!(err, Rejection::InsufficientFunds);
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.balance_of("bob"), Amount::ZERO);
    }

    #[test]
    fn faucet_then_transfer() {
        let ledger = Ledger::new();
        let alice = Keypair::generate().unwrap();
        let alice_addr = alice.public_key().to_hex();
        let bob = Keypair::generate().unwrap().public_key().to_hex();

        ledger.credit_without_proof(&alice_addr, coins(100)).unwrap();
        let receipt = ledger.submit(signed(&alice, &bob, coins(40))).unwrap();

        assert_eq!(ledger.balance_of(&alice_addr), coins(60));
        assert_eq!(ledger.balance_of(&bob), coins(40));
        assert_eq!(receipt.sender_balance, coins(60));
        assert_eq!(receipt.recipient_balance, coins(40));
        assert_eq!(receipt.position, 1);
        assert_eq!(ledger.len(), 2);
        assert_eq!(receipt.hash, ledger.head_hash().unwrap());
    }

    #[test]
    fn forged_signature_is_rejected() {
        let ledger = Ledger::new();
        let alice = Keypair::generate().unwrap();
        let mallory = Keypair::generate().unwrap();
        let alice_addr = alice.public_key().to_hex();
        ledger.credit_without_proof(&alice_addr, coins(100)).unwrap();

        let mut req = signed(&mallory, "mallory", coins(50));
        req.sender = alice_addr.clone();
        let err = ledger.submit(req).unwrap_err();
        assert_eq!(err, Rejection::InvalidSignature);
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailure);
        assert_eq!(ledger.balance_of(&alice_addr), coins(100));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn malformed_request_is_rejected_before_anything_else() {
        let ledger = Ledger::new();
        let req = TransferRequest {
            sender: "not-hex".into(),
            recipient: "bob".into(),
            amount: coins(1),
            signature: "AAAA".into(),
        };
        let err = ledger.submit(req).unwrap_err();
        assert_eq!(err, Rejection::Malformed(CodecError::SenderNotHex));
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn zero_amount_is_malformed() {
        let ledger = Ledger::new();
        let alice = Keypair::generate().unwrap();
        let err = ledger.submit(signed(&alice, "bob", Amount::ZERO)).unwrap_err();
        assert_eq!(err, Rejection::Malformed(CodecError::ZeroAmount));
    }

    #[test]
    fn replayed_transfer_needs_funds_each_time() {
        // No nonces: an identical request is a second, independent transfer.
        let ledger = Ledger::new();
        let alice = Keypair::generate().unwrap();
        ledger
            .credit_without_proof(&alice.public_key().to_hex(), coins(50))
            .unwrap();
        let req = signed(&alice, "bob", coins(30));
        ledger.submit(req.clone()).unwrap();
        assert_eq!(ledger.submit(req), Err(Rejection::InsufficientFunds));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn credit_rejects_empty_address_and_tracks_supply() {
        let ledger = Ledger::new();
        assert!(ledger.credit_without_proof("", coins(1)).is_err());
        ledger.credit_without_proof("a", coins(100)).unwrap();
        assert_eq!(ledger.credit_without_proof("a", coins(100)).unwrap(), coins(200));
        let summary = ledger.summary().unwrap();
        assert_eq!(summary.total_supply, coins(200));
        assert_eq!(summary.accounts, 1);
        assert_eq!(summary.chain_length, 1);
    }

    #[test]
    fn history_view_is_ordered_and_restartable() {
        let ledger = Ledger::new();
        let alice = Keypair::generate().unwrap();
        let alice_addr = alice.public_key().to_hex();
        ledger.credit_without_proof(&alice_addr, coins(100)).unwrap();
        ledger.submit(signed(&alice, "bob", coins(1))).unwrap();
        ledger.submit(signed(&alice, "carol", coins(2))).unwrap();
        ledger.submit(signed(&alice, "bob", coins(3))).unwrap();

        let bob = ledger.transactions_for("bob");
        let amounts: Vec<_> = bob.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![coins(1), coins(3)]);
        assert_eq!((&bob).into_iter().count(), 2);
        assert_eq!(bob.address(), "bob");
        drop(bob);

        assert_eq!(ledger.transactions_for(alice_addr).iter().count(), 3);
    }

    #[test]
    fn history_view_does_not_block_writers() {
        use std::sync::mpsc;
        use std::thread;
        use std::time::Duration;

        let ledger = Ledger::new();
        let alice = Keypair::generate().unwrap();
        let alice_addr = alice.public_key().to_hex();
        ledger.credit_without_proof(&alice_addr, coins(100)).unwrap();
        ledger.submit(signed(&alice, "bob", coins(1))).unwrap();

        let view = ledger.transactions_for("bob");
        let (done_tx, done_rx) = mpsc::channel();

        let shared = &ledger;
        thread::scope(|s| {
            s.spawn(move || {
                shared.credit_without_proof("bob", coins(5)).unwrap();
                done_tx.send(()).unwrap();
            });

            // The writer finishes while the view is still alive.
            done_rx
                .recv_timeout(Duration::from_secs(5))
                .expect("writer blocked by a live history view");

            // Reading through the view and the ledger on one thread is fine.
            assert_eq!(view.iter().count(), 1);
            assert_eq!(ledger.balance_of("bob"), coins(6));
        });

        // The view keeps its snapshot; a new one sees later entries.
        ledger.submit(signed(&alice, "bob", coins(2))).unwrap();
        assert_eq!(view.iter().count(), 1);
        assert_eq!(ledger.transactions_for("bob").iter().count(), 2);
    }
}
