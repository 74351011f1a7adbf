use bip32::{ChildNumber, DerivationPath, Prefix, XPrv};
use bitcoin::secp256k1::SecretKey;
use bitcoin::{CompressedPublicKey, PrivateKey};
use chain_utxo::{address, wif, InputSigner, NetworkParameters, SpendableInput};
use zeroize::{Zeroize, Zeroizing};

use crate::error::WithdrawalError;
use crate::mnemonic;

/// BIP-44 wallet for one currency/network, rooted at the account's external
/// chain node `m/44'/coin'/0'/0`.
///
/// Child `i` of that node is both the address at index `i` (via the xpub)
/// and the signing key for inputs whose derivation key is `i`.
pub struct HdWallet {
    account: XPrv,
    params: &'static NetworkParameters,
}

impl HdWallet {
    /// Rebuild the wallet from a BIP-39 mnemonic (empty passphrase).
    pub fn from_mnemonic(
        phrase: &str,
        params: &'static NetworkParameters,
    ) -> Result<Self, WithdrawalError> {
        let seed = mnemonic::mnemonic_to_seed(phrase, "")?;
        Self::from_seed(seed.as_slice(), params)
    }

    pub fn from_seed(
        seed: &[u8],
        params: &'static NetworkParameters,
    ) -> Result<Self, WithdrawalError> {
        let path: DerivationPath = params
            .derivation_path()
            .parse()
            .map_err(|e: bip32::Error| WithdrawalError::DerivationFailed(e.to_string()))?;

        let account = XPrv::derive_from_path(seed, &path)
            .map_err(|e| WithdrawalError::DerivationFailed(e.to_string()))?;

        Ok(Self { account, params })
    }

    pub fn params(&self) -> &'static NetworkParameters {
        self.params
    }

    /// Serialized extended public key of the account node, using the
    /// network's version prefix (`xpub`, `tpub`, `Ltub`, `ttub`).
    pub fn xpub(&self) -> String {
        let prefix = Prefix::from_parts_unchecked(self.params.xpub_prefix, self.params.xpub_version);
        self.account.public_key().to_string(prefix)
    }

    /// P2PKH address at `index`, derived from the public key only.
    pub fn address(&self, index: u32) -> Result<String, WithdrawalError> {
        let child = self
            .account
            .public_key()
            .derive_child(child_number(index)?)
            .map_err(|e| WithdrawalError::DerivationFailed(e.to_string()))?;

        let pubkey = CompressedPublicKey::from_slice(&child.to_bytes())
            .map_err(|e| WithdrawalError::DerivationFailed(e.to_string()))?;

        Ok(address::p2pkh_address(&pubkey, self.params))
    }

    /// Private key at `index`, compressed, tagged with the wallet's network.
    pub fn private_key(&self, index: u32) -> Result<PrivateKey, WithdrawalError> {
        let child = self
            .account
            .derive_child(child_number(index)?)
            .map_err(|e| WithdrawalError::DerivationFailed(e.to_string()))?;

        let mut private_key_bytes: [u8; 32] = child.to_bytes().into();
        let secret = SecretKey::from_slice(&private_key_bytes)
            .map_err(|e| WithdrawalError::DerivationFailed(e.to_string()));
        private_key_bytes.zeroize();

        Ok(PrivateKey::new(secret?, self.params.network.kind()))
    }

    /// Private key at `index` in WIF, the format key tables use.
    pub fn private_key_wif(&self, index: u32) -> Result<Zeroizing<String>, WithdrawalError> {
        let key = self.private_key(index)?;
        Ok(wif::encode_wif(&key, self.params))
    }
}

impl InputSigner for HdWallet {
    type Error = WithdrawalError;

    fn signing_key(&self, input: &SpendableInput) -> Result<PrivateKey, WithdrawalError> {
        self.private_key(input.derivation_index())
    }
}

fn child_number(index: u32) -> Result<ChildNumber, WithdrawalError> {
    ChildNumber::new(index, false)
        .map_err(|e| WithdrawalError::DerivationFailed(format!("index {index}: {e}")))
}
