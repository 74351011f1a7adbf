use thiserror::Error;

/// UTXO chain operation errors.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid txid: {0}")]
    InvalidTxid(String),

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("input set has no change carrier entry")]
    MissingChangeCarrier,

    #[error("input set has {0} change carrier entries, expected exactly one")]
    MultipleChangeCarriers(usize),

    #[error("invalid input descriptor: {0}")]
    InvalidInput(String),

    #[error("signing error: {0}")]
    SigningError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_amount() {
        let err = ChainError::InvalidAmount("abc".into());
        assert_eq!(err.to_string(), "invalid amount: abc");
    }

    #[test]
    fn display_invalid_address() {
        let err = ChainError::InvalidAddress("bad checksum".into());
        assert_eq!(err.to_string(), "invalid address: bad checksum");
    }

    #[test]
    fn display_missing_change_carrier() {
        assert_eq!(
            ChainError::MissingChangeCarrier.to_string(),
            "input set has no change carrier entry"
        );
    }

    #[test]
    fn display_multiple_change_carriers() {
        let err = ChainError::MultipleChangeCarriers(2);
        assert!(err.to_string().contains("2 change carrier entries"));
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> = Box::new(ChainError::SigningError("test".into()));
        assert!(err.to_string().contains("test"));
    }
}
