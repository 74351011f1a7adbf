use anyhow::{bail, Context};
use serde::Deserialize;
use withdrawal_core::{Credentials, InputDescriptor, KeyPairEntry, LedgerInput, MnemonicPhrase};

/// Contents of the `sign` input file.
///
/// `inputs` uses the ledger's wire format, so a store response can be
/// pasted in as is.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignConfig {
    /// Destination address
    pub address: String,
    pub amount: String,
    pub inputs: Vec<LedgerInput>,
    #[serde(default)]
    pub mnemonic: Option<MnemonicPhrase>,
    #[serde(default)]
    pub key_pair: Option<Vec<KeyPairEntry>>,
    #[serde(default, rename = "attr", alias = "changeAddress")]
    pub change_address: Option<String>,
}

/// Everything needed to sign, decoded from a [`SignConfig`].
#[derive(Debug)]
pub struct SignJob {
    pub destination: String,
    pub amount: String,
    pub inputs: Vec<InputDescriptor>,
    pub credentials: Credentials,
}

impl TryFrom<SignConfig> for SignJob {
    type Error = anyhow::Error;

    fn try_from(config: SignConfig) -> anyhow::Result<Self> {
        if config.mnemonic.is_some() && config.key_pair.is_some() {
            bail!("input file must contain either mnemonic or keyPair, not both");
        }

        let inputs = config
            .inputs
            .into_iter()
            .enumerate()
            .map(|(i, input)| input.into_descriptor().with_context(|| format!("inputs[{i}]")))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let credentials =
            Credentials::resolve(config.mnemonic, config.key_pair, config.change_address)?;

        Ok(SignJob {
            destination: config.address,
            amount: config.amount,
            inputs,
            credentials,
        })
    }
}
