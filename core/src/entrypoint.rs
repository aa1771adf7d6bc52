use std::fmt;

use alloy::primitives::Address;
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{ENTRYPOINT_ADDRESS_V0_6, ENTRYPOINT_ADDRESS_V0_7};

/// ABI generation of the EntryPoint, which selects the account's batch call shape
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntrypointVersion {
    #[serde(rename = "v0.6")]
    V0_6,
    #[serde(rename = "v0.7")]
    V0_7,
}

impl EntrypointVersion {
    /// Only the canonical v0.6 EntryPoint maps to v0.6; every other address
    /// is treated as v0.7 or later.
    pub fn for_entrypoint(entrypoint: Address) -> Self {
        if entrypoint == ENTRYPOINT_ADDRESS_V0_6 {
            EntrypointVersion::V0_6
        } else {
            EntrypointVersion::V0_7
        }
    }

    pub fn default_entrypoint(&self) -> Address {
        match self {
            EntrypointVersion::V0_6 => ENTRYPOINT_ADDRESS_V0_6,
            EntrypointVersion::V0_7 => ENTRYPOINT_ADDRESS_V0_7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntrypointVersion::V0_6 => "v0.6",
            EntrypointVersion::V0_7 => "v0.7",
        }
    }
}

impl fmt::Display for EntrypointVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An EntryPoint address together with the version resolved for it
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntrypointDetails {
    #[serde(rename = "entrypointAddress")]
    pub entrypoint_address: Address,

    #[serde(rename = "entrypointVersion")]
    pub version: EntrypointVersion,
}

impl EntrypointDetails {
    pub fn new(entrypoint_address: Address) -> Self {
        Self {
            entrypoint_address,
            version: EntrypointVersion::for_entrypoint(entrypoint_address),
        }
    }
}

/// # EntryPoint configuration
///
/// Both fields are optional:
///
/// 1. **Version**: an explicit `entrypointVersion` wins. Otherwise it is
///    inferred from `entrypointAddress`, and defaults to v0.7 when no address
///    is given either.
/// 2. **Address**: an explicit `entrypointAddress` is used as-is. Otherwise the
///    canonical EntryPoint of the resolved version is used:
///    - v0.6: 0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789
///    - v0.7: 0x0000000071727De22E5E9d8BAf0edAc6f37da032
#[derive(Deserialize, Debug, Default)]
pub struct EntrypointDetailsDeserHelper {
    #[serde(rename = "entrypointAddress", alias = "entrypoint_address")]
    pub entrypoint_address: Option<Address>,

    #[serde(rename = "entrypointVersion", alias = "entrypoint_version")]
    pub version: Option<EntrypointVersion>,
}

impl From<EntrypointDetailsDeserHelper> for EntrypointDetails {
    fn from(helper: EntrypointDetailsDeserHelper) -> Self {
        let version = match (helper.version, helper.entrypoint_address) {
            (Some(version), _) => version,
            (None, Some(address)) => EntrypointVersion::for_entrypoint(address),
            (None, None) => EntrypointVersion::V0_7,
        };

        let entrypoint_address = helper
            .entrypoint_address
            .unwrap_or_else(|| version.default_entrypoint());

        EntrypointDetails {
            entrypoint_address,
            version,
        }
    }
}

impl<'de> Deserialize<'de> for EntrypointDetails {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        EntrypointDetailsDeserHelper::deserialize(deserializer).map(Into::into)
    }
}
