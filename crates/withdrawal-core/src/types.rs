use chain_utxo::amount;
use serde::{Deserialize, Serialize};

use crate::error::WithdrawalError;
use crate::key_table::KeyPairEntry;
use crate::mnemonic::MnemonicPhrase;

/// Fee forwarded to the ledger when the request does not name one.
pub const DEFAULT_FEE: &str = "0.0005";

/// Offchain withdrawal request for a BTC-based currency.
///
/// Exactly one credential source must be present: `mnemonic`, or
/// `key_pair` together with `change_address`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    /// Ledger account the funds are withdrawn from.
    pub sender_account_id: String,
    /// Destination address on the blockchain.
    pub address: String,
    /// Amount to send, decimal string.
    pub amount: String,
    pub compliant: Option<bool>,
    /// Fee, decimal string. Defaults to [`DEFAULT_FEE`].
    pub fee: Option<String>,
    /// Change address for key-pair signing.
    #[serde(rename = "attr", alias = "changeAddress")]
    pub change_address: Option<String>,
    pub mnemonic: Option<MnemonicPhrase>,
    pub key_pair: Option<Vec<KeyPairEntry>>,
    pub payment_id: Option<String>,
    pub sender_note: Option<String>,
}

/// Withdrawal record stored in the ledger. Carries no credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    pub sender_account_id: String,
    pub address: String,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliant: Option<bool>,
    pub fee: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_note: Option<String>,
}

/// Signing credentials resolved from a request.
#[derive(Debug, Clone)]
pub enum Credentials {
    Mnemonic(MnemonicPhrase),
    KeyTable {
        keys: Vec<KeyPairEntry>,
        change_address: String,
    },
}

impl Credentials {
    /// Pick the credential source. A mnemonic wins when present; otherwise a
    /// key table needs a non-empty change address.
    pub fn resolve(
        mnemonic: Option<MnemonicPhrase>,
        key_pair: Option<Vec<KeyPairEntry>>,
        change_address: Option<String>,
    ) -> Result<Self, WithdrawalError> {
        match (mnemonic, key_pair, change_address) {
            (Some(phrase), _, _) if !phrase.is_empty() => Ok(Credentials::Mnemonic(phrase)),
            (_, Some(keys), Some(change_address)) if !change_address.is_empty() => {
                Ok(Credentials::KeyTable {
                    keys,
                    change_address,
                })
            }
            _ => Err(WithdrawalError::InvalidCredentials),
        }
    }
}

impl WithdrawalRequest {
    /// Check the request shape. Runs before anything is stored.
    pub fn validate(&self) -> Result<(), WithdrawalError> {
        check_len("senderAccountId", &self.sender_account_id, 24, 24)?;
        check_len("address", &self.address, 1, 100)?;
        check_amount("amount", &self.amount)?;

        if let Some(fee) = &self.fee {
            check_amount("fee", fee)?;
        }
        if let Some(change_address) = &self.change_address {
            check_len("attr", change_address, 1, 100)?;
        }
        if let Some(mnemonic) = &self.mnemonic {
            check_len("mnemonic", mnemonic.as_str(), 1, 500)?;
        }
        if let Some(keys) = &self.key_pair {
            for (i, entry) in keys.iter().enumerate() {
                check_len(&format!("keyPair[{i}].address"), &entry.address, 30, 50)?;
                check_len(&format!("keyPair[{i}].private"), &entry.private_key, 52, 52)?;
            }
        }
        if let Some(payment_id) = &self.payment_id {
            check_len("paymentId", payment_id, 1, 100)?;
        }
        if let Some(sender_note) = &self.sender_note {
            check_len("senderNote", sender_note, 1, 500)?;
        }

        if self.mnemonic.is_some() && self.key_pair.is_some() {
            return Err(WithdrawalError::Validation(
                "mnemonic and keyPair are mutually exclusive".into(),
            ));
        }

        Ok(())
    }

    /// Split into the record to store and the credentials to sign with.
    ///
    /// Credential resolution is deferred: its error surfaces only when the
    /// caller consumes it, after the withdrawal has been stored.
    pub fn into_parts(self) -> (Withdrawal, Result<Credentials, WithdrawalError>) {
        let WithdrawalRequest {
            sender_account_id,
            address,
            amount,
            compliant,
            fee,
            change_address,
            mnemonic,
            key_pair,
            payment_id,
            sender_note,
        } = self;

        let withdrawal = Withdrawal {
            sender_account_id,
            address,
            amount,
            compliant,
            fee: fee.unwrap_or_else(|| DEFAULT_FEE.to_string()),
            payment_id,
            sender_note,
        };

        (withdrawal, Credentials::resolve(mnemonic, key_pair, change_address))
    }
}

fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<(), WithdrawalError> {
    let len = value.chars().count();
    if len < min || len > max {
        let expected = if min == max {
            format!("exactly {min}")
        } else {
            format!("{min} to {max}")
        };
        return Err(WithdrawalError::Validation(format!(
            "{field} must be {expected} characters long, got {len}"
        )));
    }
    Ok(())
}

fn check_amount(field: &str, value: &str) -> Result<(), WithdrawalError> {
    if amount::is_decimal_amount(value) {
        Ok(())
    } else {
        Err(WithdrawalError::Validation(format!(
            "{field} must be a non-negative decimal string, got {value:?}"
        )))
    }
}
