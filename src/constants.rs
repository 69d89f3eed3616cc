//! Kernel smart account deployments
//!
//! Contract addresses are identical on every supported chain.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SdkError;

/// Entry point version the builder targets by default
pub const DEFAULT_ENTRYPOINT_VERSION: &str = "0.7";

/// Supported Kernel account versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KernelVersion {
    #[serde(rename = "0.3.1")]
    V0_3_1,
    #[serde(rename = "0.3.2")]
    V0_3_2,
    #[serde(rename = "0.3.3")]
    V0_3_3,
}

impl KernelVersion {
    pub const ALL: [KernelVersion; 3] = [Self::V0_3_1, Self::V0_3_2, Self::V0_3_3];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V0_3_1 => "0.3.1",
            Self::V0_3_2 => "0.3.2",
            Self::V0_3_3 => "0.3.3",
        }
    }

    pub fn addresses(&self) -> &'static KernelAddresses {
        match self {
            Self::V0_3_1 => &KERNEL_V0_3_1,
            Self::V0_3_2 => &KERNEL_V0_3_2,
            Self::V0_3_3 => &KERNEL_V0_3_3,
        }
    }
}

impl Default for KernelVersion {
    fn default() -> Self {
        Self::V0_3_3
    }
}

impl fmt::Display for KernelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KernelVersion {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| SdkError::invalid_input(format!("Unsupported kernel version: {}", s)))
    }
}

/// Contract addresses for one Kernel version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KernelAddresses {
    pub account_implementation_address: &'static str,
    pub factory_address: &'static str,
    pub meta_factory_address: &'static str,
    pub init_code_hash: &'static str,
}

const META_FACTORY_ADDRESS: &str = "0xd703aaE79538628d27099B8c4f621bE4CCd142d5";

const KERNEL_V0_3_1: KernelAddresses = KernelAddresses {
    account_implementation_address: "0xBAC849bB641841b44E965fB01A4Bf5F074f84b4D",
    factory_address: "0xaac5D4240AF87249B3f71BC8E4A2cae074A3E419",
    meta_factory_address: META_FACTORY_ADDRESS,
    init_code_hash: "0x85d96aa1c9a65886d094915d76ccae85f14027a02c1647dde659f869460f03e6",
};

const KERNEL_V0_3_2: KernelAddresses = KernelAddresses {
    account_implementation_address: "0xD830D15D3dc0C269F3dBAa0F3e8626d33CFdaBe1",
    factory_address: "0x7a1dBAB750f12a90EB1B60D2Ae3aD17D4D81EfFe",
    meta_factory_address: META_FACTORY_ADDRESS,
    init_code_hash: "0xc7c48c9dd12de68b8a4689b6f8c8c07b61d4d6fa4ddecdd86a6980d045fa67eb",
};

const KERNEL_V0_3_3: KernelAddresses = KernelAddresses {
    account_implementation_address: "0xd6CEDDe84be40893d153Be9d467CD6aD37875b28",
    factory_address: "0x6723b44Abeec4E71eBE3232BD5B455805baDD22f",
    meta_factory_address: META_FACTORY_ADDRESS,
    init_code_hash: "0xc452397f1e7518f8cea0566ac057e243bb1643f6298aba8eec8cdee78ee3b3dd",
};

/// All addresses for a Kernel version
pub fn kernel_addresses(version: KernelVersion) -> &'static KernelAddresses {
    version.addresses()
}

/// Account implementation (EIP-7702 delegate) address for a Kernel version
pub fn account_implementation_address(version: KernelVersion) -> &'static str {
    version.addresses().account_implementation_address
}
