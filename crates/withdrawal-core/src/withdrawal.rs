use chain_utxo::{Currency, Network};

use crate::error::WithdrawalError;
use crate::ledger::{BroadcastRequest, BroadcastResult, Ledger};
use crate::signing::prepare_signed_offchain_transaction;
use crate::types::WithdrawalRequest;

/// Store the withdrawal in the ledger, sign the transaction for the inputs
/// the ledger resolved, and broadcast it.
///
/// Once the withdrawal is stored, any failure cancels it exactly once
/// before the error is returned. Validation and store failures have
/// nothing to cancel.
pub async fn send_offchain_transaction<L>(
    ledger: &L,
    currency: Currency,
    network: Network,
    request: WithdrawalRequest,
) -> Result<BroadcastResult, WithdrawalError>
where
    L: Ledger + ?Sized,
{
    request.validate()?;

    let (withdrawal, credentials) = request.into_parts();
    let stored = ledger.store_withdrawal(&withdrawal).await?;

    tracing::info!(
        withdrawal_id = %stored.id,
        currency = %currency,
        network = %network,
        inputs = stored.inputs.len(),
        "withdrawal stored"
    );

    let signed = match credentials.and_then(|credentials| {
        prepare_signed_offchain_transaction(
            currency,
            network,
            &stored.inputs,
            &withdrawal.amount,
            &withdrawal.address,
            &credentials,
        )
    }) {
        Ok(signed) => signed,
        Err(e) => return Err(compensate(ledger, &stored.id, e).await),
    };

    let request = BroadcastRequest {
        tx_data: signed.into_hex(),
        withdrawal_id: stored.id.clone(),
        currency,
    };

    match ledger.broadcast(&request).await {
        Ok(result) => {
            tracing::info!(
                withdrawal_id = %stored.id,
                tx_id = %result.tx_id,
                completed = result.completed,
                "withdrawal broadcast"
            );
            Ok(result)
        }
        Err(e) => Err(compensate(ledger, &stored.id, e.into()).await),
    }
}

/// Cancel a stored withdrawal after a failure and hand back the failure.
async fn compensate<L>(ledger: &L, id: &str, error: WithdrawalError) -> WithdrawalError
where
    L: Ledger + ?Sized,
{
    tracing::error!(withdrawal_id = %id, error = %error, "withdrawal failed, cancelling");

    if let Err(cancel_error) = ledger.cancel_withdrawal(id).await {
        tracing::warn!(
            withdrawal_id = %id,
            error = %cancel_error,
            "cancel failed, withdrawal left for manual cleanup"
        );
    }

    error
}
