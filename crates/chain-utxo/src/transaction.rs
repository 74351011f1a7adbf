use bitcoin::absolute::LockTime;
use bitcoin::hashes::Hash;
use bitcoin::script::{Builder, PushBytesBuf, ScriptBuf};
use bitcoin::secp256k1::{Message, Secp256k1};
use bitcoin::sighash::{EcdsaSighashType, SighashCache};
use bitcoin::transaction::Version;
use bitcoin::{ecdsa, Amount, OutPoint, PrivateKey, Sequence, Transaction, TxIn, TxOut, Txid, Witness};

use crate::address;
use crate::error::ChainError;
use crate::input::SpendableInput;
use crate::network::NetworkParameters;

/// Supplies the private key for each input during signing.
///
/// Implementations decide how a key is found (HD derivation, key table);
/// their error type must be able to carry the builder's own errors.
pub trait InputSigner {
    type Error: From<ChainError>;

    fn signing_key(&self, input: &SpendableInput) -> Result<PrivateKey, Self::Error>;
}

/// A withdrawal transaction in its collecting phase.
///
/// Inputs and outputs can only be added here; [`TransactionBuilder::sign`]
/// consumes the builder, so nothing can change once signing has started.
#[derive(Debug)]
pub struct TransactionBuilder {
    params: &'static NetworkParameters,
    /// Descriptors in the same order as `tx.input`.
    inputs: Vec<SpendableInput>,
    tx: Transaction,
}

/// A fully signed transaction. Read-only apart from serialization.
#[derive(Debug, Clone)]
pub struct SignedTx {
    params: &'static NetworkParameters,
    tx: Transaction,
}

/// Serialized signed transaction as lowercase hex, ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction(String);

impl TransactionBuilder {
    pub fn new(params: &'static NetworkParameters) -> Self {
        Self {
            params,
            inputs: Vec::new(),
            tx: Transaction {
                version: Version::TWO,
                lock_time: LockTime::ZERO,
                input: Vec::new(),
                output: Vec::new(),
            },
        }
    }

    pub fn params(&self) -> &'static NetworkParameters {
        self.params
    }

    /// Append a spendable input. Its position is the position it is signed at.
    pub fn add_input(&mut self, input: &SpendableInput) -> Result<&mut Self, ChainError> {
        let txid: Txid = input
            .txid
            .parse()
            .map_err(|e| ChainError::InvalidTxid(format!("{}: {e}", input.txid)))?;
        let previous_output = OutPoint::new(txid, input.vout);

        if self.tx.input.iter().any(|i| i.previous_output == previous_output) {
            return Err(ChainError::InvalidInput(format!(
                "{previous_output} is spent twice"
            )));
        }

        self.tx.input.push(TxIn {
            previous_output,
            script_sig: ScriptBuf::new(),
            sequence: Sequence::MAX,
            witness: Witness::default(),
        });
        self.inputs.push(input.clone());

        Ok(self)
    }

    /// Append an output paying `value_sat` base units to `address`.
    pub fn add_output(&mut self, address: &str, value_sat: u64) -> Result<&mut Self, ChainError> {
        let script_pubkey = address::script_pubkey(address, self.params)?;

        self.tx.output.push(TxOut {
            value: Amount::from_sat(value_sat),
            script_pubkey,
        });
        tracing::debug!(%address, value_sat, "added output");

        Ok(self)
    }

    pub fn input_count(&self) -> usize {
        self.tx.input.len()
    }

    pub fn output_count(&self) -> usize {
        self.tx.output.len()
    }

    /// Sign every input as legacy P2PKH with `SIGHASH_ALL`.
    ///
    /// Each digest commits to the complete output set, so all outputs must be
    /// added before this is called. Signatures are RFC 6979 deterministic.
    pub fn sign<S>(self, signer: &S) -> Result<SignedTx, S::Error>
    where
        S: InputSigner + ?Sized,
    {
        let secp = Secp256k1::signing_only();
        let cache = SighashCache::new(&self.tx);
        let mut signed = self.tx.clone();

        for (index, input) in self.inputs.iter().enumerate() {
            let key = signer.signing_key(input)?;
            let public_key = key.public_key(&secp);
            let script_code = ScriptBuf::new_p2pkh(&public_key.pubkey_hash());

            let sighash = cache
                .legacy_signature_hash(index, &script_code, EcdsaSighashType::All.to_u32())
                .map_err(|e| ChainError::SigningError(format!("input {index}: {e}")))?;

            let msg = Message::from_digest(sighash.to_byte_array());
            let signature = ecdsa::Signature::sighash_all(secp.sign_ecdsa(&msg, &key.inner));

            let sig_push = PushBytesBuf::try_from(signature.to_vec())
                .map_err(|e| ChainError::SigningError(format!("input {index}: {e}")))?;

            signed.input[index].script_sig = Builder::new()
                .push_slice(sig_push)
                .push_key(&public_key)
                .into_script();

            tracing::debug!(index, txid = %input.txid, vout = input.vout, "signed input");
        }

        Ok(SignedTx {
            params: self.params,
            tx: signed,
        })
    }
}

impl SignedTx {
    pub fn params(&self) -> &'static NetworkParameters {
        self.params
    }

    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    pub fn txid(&self) -> Txid {
        self.tx.compute_txid()
    }

    /// Consensus-encode the transaction.
    pub fn serialize(self) -> SignedTransaction {
        SignedTransaction(hex::encode(bitcoin::consensus::serialize(&self.tx)))
    }
}

impl SignedTransaction {
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    pub fn into_hex(self) -> String {
        self.0
    }
}

impl std::fmt::Display for SignedTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
