use std::env;

use alloy::primitives::{Address, U256};
use anyhow::Context;
use config::{Config, File};
use custom_account_core::entrypoint::{
    EntrypointDetails, EntrypointDetailsDeserHelper, EntrypointVersion,
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub log_format: LogFormat,
    pub rpc: RpcConfig,
    pub account: AccountConfig,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    pub owner_private_key: String,
    pub factory_address: Address,
    #[serde(default)]
    pub entrypoint_address: Option<Address>,
    #[serde(default)]
    pub entrypoint_version: Option<EntrypointVersion>,
    #[serde(default)]
    pub index: U256,
    /// Known account address; skips counterfactual derivation
    #[serde(default)]
    pub address: Option<Address>,
}

impl AccountConfig {
    pub fn entrypoint_details(&self) -> EntrypointDetails {
        EntrypointDetailsDeserHelper {
            entrypoint_address: self.entrypoint_address,
            version: self.entrypoint_version,
        }
        .into()
    }

    pub fn index(&self) -> U256 {
        self.index
    }
}

pub fn get_config() -> anyhow::Result<CliConfig> {
    let base_path = env::current_dir().context("Failed to determine the current directory")?;
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment
    let environment: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(anyhow::Error::msg)
        .context("Failed to parse APP_ENVIRONMENT")?;

    let environment_filename = format!("{}.yaml", environment.as_str());

    let config = Config::builder()
        .add_source(File::from(configuration_directory.join("base.yaml")))
        .add_source(File::from(configuration_directory.join(environment_filename)).required(false))
        .add_source(config::Environment::with_prefix("app").separator("__"))
        .build()
        .context("Failed to build configuration")?;

    config.try_deserialize::<CliConfig>().context(
        "Failed to deserialize configuration. Make sure all required fields are set in your configuration files or environment variables",
    )
}

/// The possible runtime environment for the CLI.
pub enum Environment {
    Local,
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `local`, `development`, or `production`."
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;
    use config::FileFormat;
    use custom_account_core::constants::{ENTRYPOINT_ADDRESS_V0_6, ENTRYPOINT_ADDRESS_V0_7};

    use super::*;

    fn parse(yaml: &str) -> CliConfig {
        Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn minimal_config_defaults_to_v07() {
        let config = parse(
            r#"
rpc:
  url: http://127.0.0.1:8545
account:
  owner_private_key: "0x01"
  factory_address: "0xBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB"
"#,
        );

        assert!(matches!(config.log_format, LogFormat::Pretty));
        assert_eq!(config.account.index(), U256::ZERO);
        assert_eq!(config.account.address, None);

        let entrypoint = config.account.entrypoint_details();
        assert_eq!(entrypoint.entrypoint_address, ENTRYPOINT_ADDRESS_V0_7);
        assert_eq!(entrypoint.version, EntrypointVersion::V0_7);
    }

    #[test]
    fn v06_entrypoint_address_selects_v06() {
        let config = parse(
            r#"
log_format: json
rpc:
  url: http://127.0.0.1:8545
account:
  owner_private_key: "0x01"
  factory_address: "0xBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB"
  entrypoint_address: "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789"
  index: 3
  address: "0x1234567890123456789012345678901234567890"
"#,
        );

        assert!(matches!(config.log_format, LogFormat::Json));
        assert_eq!(config.account.index(), U256::from(3));
        assert_eq!(
            config.account.address,
            Some(address!("0x1234567890123456789012345678901234567890"))
        );

        let entrypoint = config.account.entrypoint_details();
        assert_eq!(entrypoint.entrypoint_address, ENTRYPOINT_ADDRESS_V0_6);
        assert_eq!(entrypoint.version, EntrypointVersion::V0_6);
    }

    #[test]
    fn index_accepts_full_256_bit_salt() {
        let config = parse(
            r#"
rpc:
  url: http://127.0.0.1:8545
account:
  owner_private_key: "0x01"
  factory_address: "0xBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB"
  index: "18446744073709551616"
"#,
        );

        assert_eq!(config.account.index(), U256::from(u64::MAX) + U256::from(1));
    }

    #[test]
    fn shipped_base_config_requires_factory_address() {
        let base = include_str!("../configuration/base.yaml");

        let missing = Config::builder()
            .add_source(File::from_str(base, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize::<CliConfig>();
        assert!(missing.is_err());

        let supplied = Config::builder()
            .add_source(File::from_str(base, FileFormat::Yaml))
            .add_source(File::from_str(
                "account:\n  factory_address: \"0xBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB\"\n",
                FileFormat::Yaml,
            ))
            .build()
            .unwrap()
            .try_deserialize::<CliConfig>()
            .unwrap();
        assert_eq!(
            supplied.account.factory_address,
            address!("0xBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB")
        );
        assert_eq!(supplied.account.index(), U256::ZERO);
    }

    #[test]
    fn rejects_unknown_environment() {
        let result: Result<Environment, _> = "staging".to_string().try_into();
        assert!(result.is_err());
    }
}
