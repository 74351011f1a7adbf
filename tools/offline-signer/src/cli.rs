use std::path::PathBuf;

use chain_utxo::{Currency, Network};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "offline-signer")]
#[command(version, about = "Build and sign UTXO withdrawal transactions offline", long_about = None)]
pub struct Cli {
    /// Currency to sign for
    #[arg(short, long, value_enum, default_value_t = CurrencyArg::Btc, global = true)]
    pub currency: CurrencyArg,

    /// Network the addresses and keys belong to
    #[arg(short, long, value_enum, default_value_t = NetworkArg::Testnet, global = true)]
    pub network: NetworkArg,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign a withdrawal described by a JSON file and print the raw hex
    Sign {
        #[arg(short, long, help = "JSON file with inputs, amount, destination and credentials")]
        input_file: PathBuf,

        #[arg(short, long, help = "Also write the raw transaction hex to this file")]
        output_file: Option<PathBuf>,
    },

    /// Print the address at an index of a mnemonic's account, with its xpub
    Address {
        #[arg(short, long, help = "File holding the BIP-39 mnemonic")]
        mnemonic_file: PathBuf,

        #[arg(long, default_value_t = 0, help = "Child index under m/44'/coin'/0'/0")]
        index: u32,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurrencyArg {
    Btc,
    Ltc,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkArg {
    Mainnet,
    Testnet,
}

impl From<CurrencyArg> for Currency {
    fn from(arg: CurrencyArg) -> Self {
        match arg {
            CurrencyArg::Btc => Currency::Bitcoin,
            CurrencyArg::Ltc => Currency::Litecoin,
        }
    }
}

impl From<NetworkArg> for Network {
    fn from(arg: NetworkArg) -> Self {
        match arg {
            NetworkArg::Mainnet => Network::Mainnet,
            NetworkArg::Testnet => Network::Testnet,
        }
    }
}
