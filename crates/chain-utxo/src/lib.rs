//! UTXO chain support for offchain withdrawals.
//!
//! Provides per-network parameters for Bitcoin and Litecoin, decimal amount
//! conversion to base units, address and WIF encoding, and a type-state
//! builder that assembles, signs (legacy P2PKH) and serializes a withdrawal
//! transaction from pre-selected input descriptors.

pub mod address;
pub mod amount;
pub mod error;
pub mod input;
pub mod network;
pub mod transaction;
pub mod wif;

pub use error::ChainError;
pub use input::{ChangeCarrier, InputDescriptor, SourceAddress, SpendableInput};
pub use network::{Currency, Network, NetworkParameters};
pub use transaction::{InputSigner, SignedTransaction, SignedTx, TransactionBuilder};
