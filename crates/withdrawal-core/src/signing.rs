use chain_utxo::input::partition_inputs;
use chain_utxo::{
    amount, Currency, InputDescriptor, Network, NetworkParameters, SignedTransaction, SignedTx,
    TransactionBuilder,
};

use crate::error::WithdrawalError;
use crate::hd_derivation::HdWallet;
use crate::key_table::KeyTable;
use crate::types::Credentials;

/// Index of the change address under the account node in mnemonic mode.
pub const CHANGE_ADDRESS_INDEX: u32 = 0;

/// Build and sign the withdrawal transaction without serializing it.
///
/// Outputs are the destination first, then the change address with the
/// change carrier's amount. No I/O.
pub fn sign_offchain_transaction(
    currency: Currency,
    network: Network,
    inputs: &[InputDescriptor],
    amount: &str,
    destination: &str,
    credentials: &Credentials,
) -> Result<SignedTx, WithdrawalError> {
    let params = currency.params(network);
    let (spendable, carrier) = partition_inputs(inputs)?;

    let value = amount::to_base_units_with_decimals(amount, params.decimals)?;
    let change_value = amount::to_base_units_with_decimals(&carrier.amount, params.decimals)?;

    let mut builder = TransactionBuilder::new(params);
    for input in &spendable {
        builder.add_input(input)?;
    }

    tracing::debug!(
        currency = %currency,
        network = %network,
        inputs = spendable.len(),
        value,
        change_value,
        "building withdrawal transaction"
    );

    match credentials {
        Credentials::Mnemonic(phrase) => {
            let wallet = HdWallet::from_mnemonic(phrase.as_str(), params)?;
            let change_address = wallet.address(CHANGE_ADDRESS_INDEX)?;
            add_outputs(&mut builder, destination, value, &change_address, change_value)?;
            builder.sign(&wallet)
        }
        Credentials::KeyTable {
            keys,
            change_address,
        } => {
            add_outputs(&mut builder, destination, value, change_address, change_value)?;
            builder.sign(&KeyTable::new(keys, params))
        }
    }
}

/// Build, sign and serialize the withdrawal transaction to hex.
pub fn prepare_signed_offchain_transaction(
    currency: Currency,
    network: Network,
    inputs: &[InputDescriptor],
    amount: &str,
    destination: &str,
    credentials: &Credentials,
) -> Result<SignedTransaction, WithdrawalError> {
    let signed =
        sign_offchain_transaction(currency, network, inputs, amount, destination, credentials)?;
    Ok(signed.serialize())
}

/// Change address the transaction would pay to for these credentials.
pub fn change_address(
    params: &'static NetworkParameters,
    credentials: &Credentials,
) -> Result<String, WithdrawalError> {
    match credentials {
        Credentials::Mnemonic(phrase) => {
            HdWallet::from_mnemonic(phrase.as_str(), params)?.address(CHANGE_ADDRESS_INDEX)
        }
        Credentials::KeyTable { change_address, .. } => Ok(change_address.clone()),
    }
}

fn add_outputs(
    builder: &mut TransactionBuilder,
    destination: &str,
    value: u64,
    change_address: &str,
    change_value: u64,
) -> Result<(), WithdrawalError> {
    builder
        .add_output(destination, value)?
        .add_output(change_address, change_value)?;
    Ok(())
}
