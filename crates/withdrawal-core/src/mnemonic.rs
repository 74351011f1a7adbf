use bip39::{Language, Mnemonic};
use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::WithdrawalError;

/// Validate a mnemonic phrase
pub fn validate_mnemonic(phrase: &str) -> bool {
    Mnemonic::parse_in_normalized(Language::English, phrase).is_ok()
}

/// Derive the 64-byte BIP-39 seed from mnemonic + passphrase.
/// The seed is zeroed when the returned buffer is dropped.
pub fn mnemonic_to_seed(
    phrase: &str,
    passphrase: &str,
) -> Result<Zeroizing<[u8; 64]>, WithdrawalError> {
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase)
        .map_err(|e| WithdrawalError::InvalidMnemonic(e.to_string()))?;

    Ok(Zeroizing::new(mnemonic.to_seed(passphrase)))
}

/// Mnemonic phrase supplied with a withdrawal request.
///
/// Zeroed on drop and never printed by `Debug`.
#[derive(Clone, Zeroize, ZeroizeOnDrop, Deserialize)]
#[serde(transparent)]
pub struct MnemonicPhrase(String);

impl MnemonicPhrase {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self(phrase.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }
}

impl From<String> for MnemonicPhrase {
    fn from(phrase: String) -> Self {
        Self(phrase)
    }
}

impl From<&str> for MnemonicPhrase {
    fn from(phrase: &str) -> Self {
        Self(phrase.to_owned())
    }
}

impl std::fmt::Debug for MnemonicPhrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MnemonicPhrase(<{} words>)", self.word_count())
    }
}
