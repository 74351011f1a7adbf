use bitcoin::NetworkKind;
use serde::{Deserialize, Serialize};

/// Supported UTXO currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "BTC")]
    Bitcoin,
    #[serde(rename = "LTC")]
    Litecoin,
}

/// Mainnet or testnet flavour of a currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
}

/// Version bytes and encoding parameters for one (currency, network) pair.
///
/// Instances are `'static` constants; select one with [`Currency::params`].
#[derive(Debug, PartialEq, Eq)]
pub struct NetworkParameters {
    pub currency: Currency,
    pub network: Network,
    /// Base58Check version byte of P2PKH addresses.
    pub p2pkh_prefix: u8,
    /// Base58Check version byte of P2SH addresses.
    pub p2sh_prefix: u8,
    /// Version byte of WIF-encoded private keys.
    pub wif_prefix: u8,
    /// Human-readable part of bech32 segwit addresses.
    pub bech32_hrp: &'static str,
    /// BIP-44 coin type used for the account derivation path.
    pub bip44_coin_type: u32,
    /// Four-character prefix of serialized extended public keys.
    pub xpub_prefix: &'static str,
    /// Version bytes of serialized extended public keys.
    pub xpub_version: u32,
    /// Number of decimal places between the display unit and base units.
    pub decimals: u32,
}

pub const BITCOIN_MAINNET: NetworkParameters = NetworkParameters {
    currency: Currency::Bitcoin,
    network: Network::Mainnet,
    p2pkh_prefix: 0x00,
    p2sh_prefix: 0x05,
    wif_prefix: 0x80,
    bech32_hrp: "bc",
    bip44_coin_type: 0,
    xpub_prefix: "xpub",
    xpub_version: 0x0488_B21E,
    decimals: 8,
};

pub const BITCOIN_TESTNET: NetworkParameters = NetworkParameters {
    currency: Currency::Bitcoin,
    network: Network::Testnet,
    p2pkh_prefix: 0x6f,
    p2sh_prefix: 0xc4,
    wif_prefix: 0xef,
    bech32_hrp: "tb",
    bip44_coin_type: 1,
    xpub_prefix: "tpub",
    xpub_version: 0x0435_87CF,
    decimals: 8,
};

pub const LITECOIN_MAINNET: NetworkParameters = NetworkParameters {
    currency: Currency::Litecoin,
    network: Network::Mainnet,
    p2pkh_prefix: 0x30,
    p2sh_prefix: 0x32,
    wif_prefix: 0xb0,
    bech32_hrp: "ltc",
    bip44_coin_type: 2,
    xpub_prefix: "Ltub",
    xpub_version: 0x019D_A462,
    decimals: 8,
};

pub const LITECOIN_TESTNET: NetworkParameters = NetworkParameters {
    currency: Currency::Litecoin,
    network: Network::Testnet,
    p2pkh_prefix: 0x6f,
    p2sh_prefix: 0x3a,
    wif_prefix: 0xef,
    bech32_hrp: "tltc",
    bip44_coin_type: 1,
    xpub_prefix: "ttub",
    xpub_version: 0x0436_F6E1,
    decimals: 8,
};

impl Currency {
    /// Network parameters for this currency on the given network.
    pub fn params(self, network: Network) -> &'static NetworkParameters {
        match (self, network) {
            (Currency::Bitcoin, Network::Mainnet) => &BITCOIN_MAINNET,
            (Currency::Bitcoin, Network::Testnet) => &BITCOIN_TESTNET,
            (Currency::Litecoin, Network::Mainnet) => &LITECOIN_MAINNET,
            (Currency::Litecoin, Network::Testnet) => &LITECOIN_TESTNET,
        }
    }

    /// Ticker symbol, as used by the ledger.
    pub fn ticker(self) -> &'static str {
        match self {
            Currency::Bitcoin => "BTC",
            Currency::Litecoin => "LTC",
        }
    }
}

impl Network {
    pub fn is_testnet(self) -> bool {
        matches!(self, Network::Testnet)
    }

    /// Convert to the `bitcoin` crate's mainnet/testnet marker, which is
    /// shared by every currency using these prefixes.
    pub fn kind(self) -> NetworkKind {
        match self {
            Network::Mainnet => NetworkKind::Main,
            Network::Testnet => NetworkKind::Test,
        }
    }
}

impl NetworkParameters {
    /// BIP-44 account-level derivation path whose children are the
    /// per-address keys: `m/44'/{coin}'/0'/0`.
    pub fn derivation_path(&self) -> String {
        format!("m/44'/{}'/0'/0", self.bip44_coin_type)
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.ticker())
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}
