//! Cross-crate integration tests exercising the full pipeline:
//! ledger inputs -> credentials -> signed transaction -> broadcast.
//!
//! These go through the public API of withdrawal_core only, so they catch
//! regressions at the boundary with chain_utxo.

use std::sync::Mutex;

use async_trait::async_trait;
use bitcoin::Transaction;
use withdrawal_core::ledger::parse_inputs;
use withdrawal_core::*;

const TEST_MNEMONIC: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
const ACCOUNT_ID: &str = "5e68c66581f2ee32bc354087";
const DESTINATION: &str = "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH";
const TXID: &str = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";

fn btc_wallet() -> HdWallet {
    HdWallet::from_mnemonic(TEST_MNEMONIC, Currency::Bitcoin.params(Network::Mainnet)).unwrap()
}

fn decode(signed: &SignedTransaction) -> Transaction {
    let bytes = hex::decode(signed.as_hex()).unwrap();
    bitcoin::consensus::deserialize(&bytes).unwrap()
}

fn ledger_inputs(source_address: &str) -> Vec<InputDescriptor> {
    parse_inputs(&format!(
        r#"[
            {{"vIn": "{TXID}", "vInIndex": 0, "amount": "2",
              "address": {{"address": "{source_address}", "derivationKey": 0}}}},
            {{"vIn": "-1", "amount": "0.4995"}}
        ]"#
    ))
    .unwrap()
}

// ─── Signing: inputs -> signed hex ─────────────────────────────────

#[test]
fn mnemonic_withdrawal_end_to_end() {
    let wallet = btc_wallet();
    let change = wallet.address(0).unwrap();
    let inputs = ledger_inputs(&change);

    let signed = prepare_signed_offchain_transaction(
        Currency::Bitcoin,
        Network::Mainnet,
        &inputs,
        "1.5",
        DESTINATION,
        &Credentials::Mnemonic(TEST_MNEMONIC.into()),
    )
    .unwrap();

    let tx = decode(&signed);
    assert_eq!(tx.input.len(), 1);
    assert_eq!(tx.output.len(), 2);
    assert_eq!(tx.output[0].value.to_sat(), 150_000_000);
    assert_eq!(tx.output[1].value.to_sat(), 49_950_000);
    assert_eq!(
        tx.output[1].script_pubkey,
        chain_utxo::address::script_pubkey(&change, Currency::Bitcoin.params(Network::Mainnet))
            .unwrap()
    );
    assert!(!tx.input[0].script_sig.is_empty());
}

#[test]
fn mnemonic_and_key_table_produce_identical_hex() {
    let wallet = btc_wallet();
    let address = wallet.address(0).unwrap();
    let wif = wallet.private_key_wif(0).unwrap();
    let inputs = ledger_inputs(&address);

    let from_mnemonic = prepare_signed_offchain_transaction(
        Currency::Bitcoin,
        Network::Mainnet,
        &inputs,
        "1.5",
        DESTINATION,
        &Credentials::Mnemonic(TEST_MNEMONIC.into()),
    )
    .unwrap();

    let from_table = prepare_signed_offchain_transaction(
        Currency::Bitcoin,
        Network::Mainnet,
        &inputs,
        "1.5",
        DESTINATION,
        &Credentials::KeyTable {
            keys: vec![KeyPairEntry::new(address.clone(), wif.as_str())],
            change_address: address,
        },
    )
    .unwrap();

    assert_eq!(from_mnemonic, from_table);
}

#[test]
fn signing_is_deterministic_across_calls() {
    let inputs = ledger_inputs("unused");
    let credentials = Credentials::Mnemonic(TEST_MNEMONIC.into());
    let sign = || {
        prepare_signed_offchain_transaction(
            Currency::Bitcoin,
            Network::Mainnet,
            &inputs,
            "0.25",
            DESTINATION,
            &credentials,
        )
        .unwrap()
    };
    assert_eq!(sign(), sign());
}

#[test]
fn signed_input_count_matches_spendable_count() {
    let inputs = parse_inputs(&format!(
        r#"[
            {{"vIn": "{TXID}", "vInIndex": 0, "amount": "1", "address": {{"derivationKey": 1}}}},
            {{"vIn": "-1", "amount": 0.1}},
            {{"vIn": "{TXID}", "vInIndex": 1, "amount": "1", "address": {{"derivationKey": 2}}}},
            {{"vIn": "{TXID}", "vInIndex": 2, "amount": "1"}}
        ]"#
    ))
    .unwrap();

    let signed = prepare_signed_offchain_transaction(
        Currency::Bitcoin,
        Network::Mainnet,
        &inputs,
        "2.5",
        DESTINATION,
        &Credentials::Mnemonic(TEST_MNEMONIC.into()),
    )
    .unwrap();

    let tx = decode(&signed);
    assert_eq!(tx.input.len(), 3);
    let vouts: Vec<u32> = tx.input.iter().map(|i| i.previous_output.vout).collect();
    assert_eq!(vouts, [0, 1, 2]);
    assert!(tx.input.iter().all(|i| !i.script_sig.is_empty()));
    assert_eq!(tx.output.len(), 2);
}

#[test]
fn input_set_without_carrier_yields_no_transaction() {
    let inputs = parse_inputs(&format!(
        r#"[{{"vIn": "{TXID}", "vInIndex": 0, "amount": "1"}}]"#
    ))
    .unwrap();

    let result = prepare_signed_offchain_transaction(
        Currency::Bitcoin,
        Network::Mainnet,
        &inputs,
        "0.5",
        DESTINATION,
        &Credentials::Mnemonic(TEST_MNEMONIC.into()),
    );
    assert!(matches!(
        result,
        Err(WithdrawalError::Transaction(chain_utxo::ChainError::MissingChangeCarrier))
    ));
}

#[test]
fn litecoin_testnet_withdrawal() {
    let params = Currency::Litecoin.params(Network::Testnet);
    let wallet = HdWallet::from_mnemonic(TEST_MNEMONIC, params).unwrap();
    let destination = wallet.address(5).unwrap();
    let inputs = ledger_inputs("unused");

    let signed = prepare_signed_offchain_transaction(
        Currency::Litecoin,
        Network::Testnet,
        &inputs,
        "1",
        &destination,
        &Credentials::Mnemonic(TEST_MNEMONIC.into()),
    )
    .unwrap();

    let tx = decode(&signed);
    assert_eq!(tx.output[0].value.to_sat(), 100_000_000);
    assert_eq!(
        tx.output[1].script_pubkey,
        chain_utxo::address::script_pubkey(&wallet.address(0).unwrap(), params).unwrap()
    );
}

// ─── Orchestration: request -> ledger -> broadcast ─────────────────

#[derive(Debug, PartialEq)]
enum Call {
    Store(Withdrawal),
    Cancel(String),
    Broadcast(BroadcastRequest),
}

/// In-memory ledger that records every call.
struct RecordingLedger {
    inputs: Vec<InputDescriptor>,
    fail_broadcast: bool,
    calls: Mutex<Vec<Call>>,
}

impl RecordingLedger {
    fn new(inputs: Vec<InputDescriptor>) -> Self {
        Self {
            inputs,
            fail_broadcast: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }
}

#[async_trait]
impl Ledger for RecordingLedger {
    async fn store_withdrawal(&self, withdrawal: &Withdrawal) -> Result<StoredWithdrawal, LedgerError> {
        self.calls.lock().unwrap().push(Call::Store(withdrawal.clone()));
        Ok(StoredWithdrawal {
            id: "wd-42".into(),
            inputs: self.inputs.clone(),
        })
    }

    async fn cancel_withdrawal(&self, id: &str) -> Result<(), LedgerError> {
        self.calls.lock().unwrap().push(Call::Cancel(id.to_string()));
        Ok(())
    }

    async fn broadcast(&self, request: &BroadcastRequest) -> Result<BroadcastResult, LedgerError> {
        self.calls.lock().unwrap().push(Call::Broadcast(request.clone()));
        if self.fail_broadcast {
            return Err(LedgerError::Broadcast("node unavailable".into()));
        }
        Ok(BroadcastResult {
            tx_id: "c0ffee".into(),
            completed: true,
        })
    }
}

fn request_json(extra: &str) -> WithdrawalRequest {
    serde_json::from_str(&format!(
        r#"{{
            "senderAccountId": "{ACCOUNT_ID}",
            "address": "{DESTINATION}",
            "amount": "1.5",
            "paymentId": "invoice-9"{extra}
        }}"#
    ))
    .unwrap()
}

#[tokio::test]
async fn send_stores_signs_and_broadcasts() {
    let ledger = RecordingLedger::new(ledger_inputs("unused"));
    let request = request_json(&format!(r#", "mnemonic": "{TEST_MNEMONIC}""#));

    let result = send_offchain_transaction(&ledger, Currency::Bitcoin, Network::Mainnet, request)
        .await
        .unwrap();
    assert_eq!(result.tx_id, "c0ffee");

    let expected_hex = prepare_signed_offchain_transaction(
        Currency::Bitcoin,
        Network::Mainnet,
        &ledger_inputs("unused"),
        "1.5",
        DESTINATION,
        &Credentials::Mnemonic(TEST_MNEMONIC.into()),
    )
    .unwrap()
    .into_hex();

    let calls = ledger.calls();
    assert_eq!(calls.len(), 2);
    match &calls[0] {
        Call::Store(w) => {
            assert_eq!(w.fee, DEFAULT_FEE);
            assert_eq!(w.payment_id.as_deref(), Some("invoice-9"));
        }
        other => panic!("expected store first, got {other:?}"),
    }
    assert_eq!(
        calls[1],
        Call::Broadcast(BroadcastRequest {
            tx_data: expected_hex,
            withdrawal_id: "wd-42".into(),
            currency: Currency::Bitcoin,
        })
    );
}

#[tokio::test]
async fn failed_broadcast_cancels_stored_withdrawal() {
    let mut ledger = RecordingLedger::new(ledger_inputs("unused"));
    ledger.fail_broadcast = true;
    let request = request_json(&format!(r#", "mnemonic": "{TEST_MNEMONIC}""#));

    let result =
        send_offchain_transaction(&ledger, Currency::Bitcoin, Network::Mainnet, request).await;
    assert!(matches!(
        result,
        Err(WithdrawalError::ExternalService(LedgerError::Broadcast(_)))
    ));

    let calls = ledger.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[2], Call::Cancel("wd-42".into()));
}

#[tokio::test]
async fn request_without_credentials_is_stored_then_cancelled() {
    let ledger = RecordingLedger::new(ledger_inputs("unused"));
    let request = request_json("");

    let result =
        send_offchain_transaction(&ledger, Currency::Bitcoin, Network::Mainnet, request).await;
    assert!(matches!(result, Err(WithdrawalError::InvalidCredentials)));

    let calls = ledger.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(calls[0], Call::Store(_)));
    assert_eq!(calls[1], Call::Cancel("wd-42".into()));
}

#[tokio::test]
async fn request_with_both_credentials_never_reaches_ledger() {
    let ledger = RecordingLedger::new(ledger_inputs("unused"));
    let wif = btc_wallet().private_key_wif(0).unwrap();
    let request = request_json(&format!(
        r#", "mnemonic": "{TEST_MNEMONIC}", "attr": "{DESTINATION}",
            "keyPair": [{{"address": "{DESTINATION}", "private": "{}"}}]"#,
        wif.as_str()
    ));

    let result =
        send_offchain_transaction(&ledger, Currency::Bitcoin, Network::Mainnet, request).await;
    assert!(matches!(result, Err(WithdrawalError::Validation(_))));
    assert!(ledger.calls().is_empty());
}
