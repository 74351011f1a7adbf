use chain_utxo::ChainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WithdrawalError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Impossible to prepare transaction: either mnemonic or keyPair and attr must be present")]
    InvalidCredentials,

    #[error("No key pair for input {txid}:{vout} (address {address:?})")]
    MissingKeyForInput {
        txid: String,
        vout: u32,
        address: Option<String>,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error(transparent)]
    Transaction(ChainError),

    #[error("Ledger service error: {0}")]
    ExternalService(#[from] LedgerError),
}

/// Failures reported by the remote ledger collaborator.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("store withdrawal failed: {0}")]
    Store(String),

    #[error("cancel withdrawal failed: {0}")]
    Cancel(String),

    #[error("broadcast failed: {0}")]
    Broadcast(String),

    #[error("malformed ledger response: {0}")]
    Decode(String),
}

impl From<ChainError> for WithdrawalError {
    fn from(e: ChainError) -> Self {
        match e {
            ChainError::InvalidAmount(msg) => WithdrawalError::InvalidAmount(msg),
            other => WithdrawalError::Transaction(other),
        }
    }
}
