use bitcoin::secp256k1::SecretKey;
use bitcoin::PrivateKey;
use zeroize::{Zeroize, Zeroizing};

use crate::error::ChainError;
use crate::network::NetworkParameters;

/// Encode a private key in Wallet Import Format with the network's prefix.
pub fn encode_wif(key: &PrivateKey, params: &NetworkParameters) -> Zeroizing<String> {
    let mut secret = key.inner.secret_bytes();

    let mut payload = Zeroizing::new(Vec::with_capacity(34));
    payload.push(params.wif_prefix);
    payload.extend_from_slice(&secret);
    if key.compressed {
        payload.push(0x01);
    }
    secret.zeroize();

    Zeroizing::new(bs58::encode(payload.as_slice()).with_check().into_string())
}

/// Decode a WIF private key, checking its prefix against the network.
///
/// Error messages never include the key material.
pub fn decode_wif(wif: &str, params: &NetworkParameters) -> Result<PrivateKey, ChainError> {
    let payload = Zeroizing::new(
        bs58::decode(wif)
            .with_check(None)
            .into_vec()
            .map_err(|e| ChainError::InvalidPrivateKey(format!("invalid base58check: {e}")))?,
    );

    let compressed = match payload.len() {
        34 if payload[33] == 0x01 => true,
        33 => false,
        n => {
            return Err(ChainError::InvalidPrivateKey(format!(
                "unexpected WIF payload length {n}"
            )))
        }
    };

    if payload[0] != params.wif_prefix {
        return Err(ChainError::InvalidPrivateKey(format!(
            "WIF prefix {:#04x} is not valid for {} {}",
            payload[0], params.currency, params.network
        )));
    }

    let inner = SecretKey::from_slice(&payload[1..33])
        .map_err(|e| ChainError::InvalidPrivateKey(format!("invalid secret key: {e}")))?;

    Ok(PrivateKey {
        compressed,
        network: params.network.kind(),
        inner,
    })
}
