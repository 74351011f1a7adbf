//! Offchain withdrawals for UTXO currencies.
//!
//! A withdrawal is stored in the ledger, which reserves funds and answers
//! with the inputs to spend. The transaction is then built and signed
//! locally, either from a BIP-39 mnemonic (keys derived along
//! `m/44'/coin'/0'/0`) or from a caller-supplied address→WIF table, and
//! handed back to the ledger for broadcast. Any failure after the store
//! step cancels the stored withdrawal.

pub mod error;
pub mod hd_derivation;
pub mod key_table;
pub mod ledger;
pub mod mnemonic;
pub mod signing;
pub mod types;
pub mod withdrawal;

pub use chain_utxo::{Currency, InputDescriptor, Network, SignedTransaction};
pub use error::{LedgerError, WithdrawalError};
pub use hd_derivation::HdWallet;
pub use key_table::{KeyPairEntry, KeyTable};
pub use ledger::{
    BroadcastRequest, BroadcastResult, Ledger, LedgerInput, StoredWithdrawal, WithdrawalResponse,
};
pub use mnemonic::MnemonicPhrase;
pub use signing::{prepare_signed_offchain_transaction, sign_offchain_transaction};
pub use types::{Credentials, Withdrawal, WithdrawalRequest, DEFAULT_FEE};
pub use withdrawal::send_offchain_transaction;
