use bitcoin::PrivateKey;
use chain_utxo::{wif, InputSigner, NetworkParameters, SpendableInput};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::WithdrawalError;

/// Address and its WIF private key, as supplied by the caller.
#[derive(Clone, Zeroize, ZeroizeOnDrop, Serialize, Deserialize)]
pub struct KeyPairEntry {
    pub address: String,
    /// WIF-encoded private key.
    #[serde(rename = "private")]
    pub private_key: String,
}

impl KeyPairEntry {
    pub fn new(address: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            private_key: private_key.into(),
        }
    }
}

impl std::fmt::Debug for KeyPairEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPairEntry")
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Signs inputs with keys looked up by exact source-address match.
pub struct KeyTable<'a> {
    entries: &'a [KeyPairEntry],
    params: &'static NetworkParameters,
}

impl<'a> KeyTable<'a> {
    pub fn new(entries: &'a [KeyPairEntry], params: &'static NetworkParameters) -> Self {
        Self { entries, params }
    }

    pub fn find(&self, address: &str) -> Option<&'a KeyPairEntry> {
        self.entries.iter().find(|entry| entry.address == address)
    }
}

impl InputSigner for KeyTable<'_> {
    type Error = WithdrawalError;

    fn signing_key(&self, input: &SpendableInput) -> Result<PrivateKey, WithdrawalError> {
        let missing = || WithdrawalError::MissingKeyForInput {
            txid: input.txid.clone(),
            vout: input.vout,
            address: input.source_address().map(str::to_owned),
        };

        let address = input.source_address().ok_or_else(missing)?;
        let entry = self.find(address).ok_or_else(missing)?;

        Ok(wif::decode_wif(&entry.private_key, self.params)?)
    }
}
