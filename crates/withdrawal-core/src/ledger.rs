use async_trait::async_trait;
use chain_utxo::{ChangeCarrier, Currency, InputDescriptor, SourceAddress, SpendableInput};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::types::Withdrawal;

/// `vIn` value the ledger uses for the change-carrier entry.
pub const CHANGE_CARRIER_VIN: &str = "-1";

/// Remote ledger that reserves funds, resolves inputs and broadcasts.
///
/// Transport, authentication and timeouts belong to the implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Record the withdrawal and return its id with the resolved input set.
    async fn store_withdrawal(&self, withdrawal: &Withdrawal)
        -> Result<StoredWithdrawal, LedgerError>;

    /// Release a stored withdrawal. Safe to call more than once.
    async fn cancel_withdrawal(&self, id: &str) -> Result<(), LedgerError>;

    async fn broadcast(&self, request: &BroadcastRequest) -> Result<BroadcastResult, LedgerError>;
}

/// A stored withdrawal: its ledger id and the inputs to spend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredWithdrawal {
    pub id: String,
    pub inputs: Vec<InputDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastRequest {
    /// Signed transaction, lowercase hex.
    pub tx_data: String,
    pub withdrawal_id: String,
    pub currency: Currency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastResult {
    pub tx_id: String,
    #[serde(default)]
    pub completed: bool,
}

// ─── Wire format ────────────────────────────────────────────────────

/// Ledger response to a store call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalResponse {
    pub id: String,
    #[serde(default)]
    pub data: Vec<LedgerInput>,
}

/// One input entry as the ledger sends it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerInput {
    /// Previous txid, or `"-1"` for the change carrier.
    pub v_in: String,
    pub v_in_index: Option<u32>,
    pub amount: LedgerAmount,
    pub address: Option<LedgerAddress>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerAddress {
    pub address: Option<String>,
    pub derivation_key: Option<u32>,
}

/// Amounts arrive either as strings or as bare JSON numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LedgerAmount {
    Text(String),
    Number(serde_json::Number),
}

impl LedgerAmount {
    /// Plain decimal string. Exponent notation is expanded.
    pub fn to_decimal_string(&self) -> Result<String, LedgerError> {
        let raw = match self {
            LedgerAmount::Text(s) => s.trim().to_string(),
            LedgerAmount::Number(n) => n.to_string(),
        };

        if raw.contains(['e', 'E']) {
            let value = Decimal::from_scientific(&raw)
                .map_err(|e| LedgerError::Decode(format!("amount {raw}: {e}")))?;
            Ok(value.normalize().to_string())
        } else {
            Ok(raw)
        }
    }
}

impl LedgerInput {
    pub fn into_descriptor(self) -> Result<InputDescriptor, LedgerError> {
        let amount = self.amount.to_decimal_string()?;

        if self.v_in == CHANGE_CARRIER_VIN {
            return Ok(InputDescriptor::ChangeCarrier(ChangeCarrier { amount }));
        }

        let vout = self
            .v_in_index
            .ok_or_else(|| LedgerError::Decode(format!("input {} has no vInIndex", self.v_in)))?;

        Ok(InputDescriptor::Spendable(SpendableInput {
            txid: self.v_in,
            vout,
            amount,
            source: self.address.map(|a| SourceAddress {
                address: a.address,
                derivation_key: a.derivation_key,
            }),
        }))
    }
}

impl WithdrawalResponse {
    pub fn into_stored(self) -> Result<StoredWithdrawal, LedgerError> {
        let inputs = self
            .data
            .into_iter()
            .map(LedgerInput::into_descriptor)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(StoredWithdrawal { id: self.id, inputs })
    }
}

/// Decode a ledger input array from raw JSON.
pub fn parse_inputs(json: &str) -> Result<Vec<InputDescriptor>, LedgerError> {
    let inputs: Vec<LedgerInput> =
        serde_json::from_str(json).map_err(|e| LedgerError::Decode(e.to_string()))?;
    inputs.into_iter().map(LedgerInput::into_descriptor).collect()
}
