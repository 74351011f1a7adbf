use bitcoin::bech32;
use bitcoin::hashes::Hash;
use bitcoin::{CompressedPublicKey, PubkeyHash, ScriptBuf, ScriptHash, WitnessProgram, WitnessVersion};

use crate::error::ChainError;
use crate::network::NetworkParameters;

/// Encode a compressed public key as a Base58Check P2PKH address using the
/// network's version byte (`1...` BTC, `L...` LTC, `m.../n...` testnets).
pub fn p2pkh_address(pubkey: &CompressedPublicKey, params: &NetworkParameters) -> String {
    let mut payload = Vec::with_capacity(21);
    payload.push(params.p2pkh_prefix);
    payload.extend_from_slice(pubkey.pubkey_hash().as_byte_array());
    bs58::encode(payload).with_check().into_string()
}

/// Locking script for an address on the given network.
///
/// Base58Check P2PKH/P2SH addresses must carry the network's version byte;
/// bech32 segwit addresses must carry the network's HRP.
pub fn script_pubkey(address: &str, params: &NetworkParameters) -> Result<ScriptBuf, ChainError> {
    match bs58::decode(address).with_check(None).into_vec() {
        Ok(payload) => base58_script(address, &payload, params),
        Err(_) => segwit_script(address, params),
    }
}

fn base58_script(
    address: &str,
    payload: &[u8],
    params: &NetworkParameters,
) -> Result<ScriptBuf, ChainError> {
    let (version, hash) = match payload {
        [version, hash @ ..] if hash.len() == 20 => (*version, hash),
        _ => {
            return Err(ChainError::InvalidAddress(format!(
                "{address}: expected 21-byte payload, got {}",
                payload.len()
            )))
        }
    };

    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(hash);

    if version == params.p2pkh_prefix {
        Ok(ScriptBuf::new_p2pkh(&PubkeyHash::from_byte_array(bytes)))
    } else if version == params.p2sh_prefix {
        Ok(ScriptBuf::new_p2sh(&ScriptHash::from_byte_array(bytes)))
    } else {
        Err(ChainError::InvalidAddress(format!(
            "{address}: version byte {version:#04x} is not valid for {} {}",
            params.currency, params.network
        )))
    }
}

fn segwit_script(address: &str, params: &NetworkParameters) -> Result<ScriptBuf, ChainError> {
    let (hrp, version, program) = bech32::segwit::decode(address)
        .map_err(|e| ChainError::InvalidAddress(format!("{address}: {e}")))?;

    if hrp.to_lowercase() != params.bech32_hrp {
        return Err(ChainError::InvalidAddress(format!(
            "{address}: prefix {hrp} is not valid for {} {}",
            params.currency, params.network
        )));
    }

    let version = WitnessVersion::try_from(version)
        .map_err(|e| ChainError::InvalidAddress(format!("{address}: {e}")))?;
    let program = WitnessProgram::new(version, program.as_slice())
        .map_err(|e| ChainError::InvalidAddress(format!("{address}: {e}")))?;

    Ok(ScriptBuf::new_witness_program(&program))
}
