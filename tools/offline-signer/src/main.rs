mod cli;
mod config;

use std::fs;
use std::path::Path;

use anyhow::Context;
use chain_utxo::{Currency, Network};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use withdrawal_core::{sign_offchain_transaction, HdWallet, MnemonicPhrase};
use zeroize::Zeroizing;

use cli::{Cli, Commands};
use config::{SignConfig, SignJob};

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    if let Err(e) = run(cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let currency = Currency::from(cli.currency);
    let network = Network::from(cli.network);

    match cli.command {
        Commands::Sign {
            input_file,
            output_file,
        } => sign(currency, network, &input_file, output_file.as_deref()),
        Commands::Address {
            mnemonic_file,
            index,
        } => address(currency, network, &mnemonic_file, index),
    }
}

fn sign(
    currency: Currency,
    network: Network,
    input_file: &Path,
    output_file: Option<&Path>,
) -> anyhow::Result<()> {
    let raw = Zeroizing::new(
        fs::read_to_string(input_file)
            .with_context(|| format!("failed to read {}", input_file.display()))?,
    );
    let config: SignConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", input_file.display()))?;
    let job = SignJob::try_from(config)?;

    info!(%currency, %network, inputs = job.inputs.len(), "signing withdrawal");

    let signed = sign_offchain_transaction(
        currency,
        network,
        &job.inputs,
        &job.amount,
        &job.destination,
        &job.credentials,
    )?;
    info!(txid = %signed.txid(), "transaction signed");

    let hex = signed.serialize().into_hex();
    println!("{hex}");

    if let Some(path) = output_file {
        fs::write(path, &hex).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "raw transaction saved");
    }

    Ok(())
}

fn address(currency: Currency, network: Network, mnemonic_file: &Path, index: u32) -> anyhow::Result<()> {
    let raw = Zeroizing::new(
        fs::read_to_string(mnemonic_file)
            .with_context(|| format!("failed to read {}", mnemonic_file.display()))?,
    );
    let phrase = MnemonicPhrase::new(raw.trim());

    let params = currency.params(network);
    let wallet = HdWallet::from_mnemonic(phrase.as_str(), params)?;
    let address = wallet.address(index)?;

    let out = serde_json::json!({
        "currency": currency,
        "network": network,
        "derivationPath": format!("{}/{index}", params.derivation_path()),
        "address": address,
        "xpub": wallet.xpub(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);

    Ok(())
}

fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // stdout carries the result, logs go to stderr.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
