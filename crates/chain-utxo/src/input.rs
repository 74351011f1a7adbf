use crate::error::ChainError;

/// Address metadata the ledger attaches to a spendable input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceAddress {
    /// Address holding the output, used for key-table lookup.
    pub address: Option<String>,
    /// Child index under the account node, used for mnemonic derivation.
    pub derivation_key: Option<u32>,
}

/// A previous output to be spent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendableInput {
    /// Previous transaction id, hex in display order.
    pub txid: String,
    /// Output index within the previous transaction.
    pub vout: u32,
    /// Value of the output as a decimal string.
    pub amount: String,
    pub source: Option<SourceAddress>,
}

/// Non-spendable entry carrying the leftover value for the change output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeCarrier {
    pub amount: String,
}

/// One entry of the input set resolved by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputDescriptor {
    Spendable(SpendableInput),
    ChangeCarrier(ChangeCarrier),
}

impl SpendableInput {
    /// Source address string, if the ledger supplied one.
    pub fn source_address(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.address.as_deref())
    }

    /// Derivation index for mnemonic signing; inputs without address
    /// metadata are pool transfers owned by index 0.
    pub fn derivation_index(&self) -> u32 {
        self.source
            .as_ref()
            .and_then(|s| s.derivation_key)
            .unwrap_or(0)
    }
}

/// Split an input set into its spendable inputs, in their original order,
/// and its single change carrier.
pub fn partition_inputs(
    inputs: &[InputDescriptor],
) -> Result<(Vec<&SpendableInput>, &ChangeCarrier), ChainError> {
    let mut spendable = Vec::with_capacity(inputs.len());
    let mut carriers = Vec::with_capacity(1);

    for input in inputs {
        match input {
            InputDescriptor::Spendable(s) => spendable.push(s),
            InputDescriptor::ChangeCarrier(c) => carriers.push(c),
        }
    }

    match carriers.as_slice() {
        [carrier] => Ok((spendable, *carrier)),
        [] => Err(ChainError::MissingChangeCarrier),
        many => Err(ChainError::MultipleChangeCarriers(many.len())),
    }
}
