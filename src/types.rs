//! Data types exchanged with the UserOp Builder API
//!
//! Field names follow the service's camelCase JSON. Numeric quantities
//! (gas, nonces, block numbers) stay as strings since the service emits
//! them as hex.

use serde::{Deserialize, Serialize};

use crate::signer::SignedAuthorization;

/// A single call bundled into a user operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub to: String,
    pub value: String,
    pub data: String,
}

impl Call {
    pub fn new(to: impl Into<String>, value: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            value: value.into(),
            data: data.into(),
        }
    }
}

/// Request body for `build-userop`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildUserOpRequest {
    pub account: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<SignedAuthorization>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_eip7702_account: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    pub entrypoint: String,
    pub kernel_version: String,
    pub calls: Vec<Call>,
}

/// Unsigned user operation returned by `build-userop`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildUserOpResponse {
    pub sender: String,
    pub nonce: String,
    pub call_data: String,
    #[serde(default)]
    pub account_gas_limits: String,
    #[serde(default)]
    pub pre_verification_gas: String,
    #[serde(default)]
    pub gas_fees: String,
    #[serde(default)]
    pub paymaster_and_data: String,
    #[serde(default)]
    pub signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory_data: Option<String>,
    pub user_op_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<SignedAuthorization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_gas_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_gas_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster_verification_gas_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster_post_op_gas_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster_data: Option<String>,
}

/// Request body for `get-userop-receipt`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUserOpReceiptRequest {
    pub user_op_hash: String,
}

impl GetUserOpReceiptRequest {
    pub fn new(user_op_hash: impl Into<String>) -> Self {
        Self {
            user_op_hash: user_op_hash.into(),
        }
    }
}

/// Event log emitted during execution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub address: String,
    pub block_hash: String,
    pub block_number: String,
    pub data: String,
    pub log_index: u64,
    #[serde(default)]
    pub removed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
    pub transaction_hash: String,
    pub transaction_index: u64,
}

/// Receipt of the bundle transaction that included the user operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_gas_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_gas_used: Option<String>,
    pub block_hash: String,
    pub block_number: String,
    /// `None` unless the transaction created a contract
    #[serde(default)]
    pub contract_address: Option<String>,
    pub cumulative_gas_used: String,
    pub effective_gas_price: String,
    pub from: String,
    pub gas_used: String,
    #[serde(default)]
    pub logs: Vec<Log>,
    pub logs_bloom: String,
    /// Pre-Byzantium state root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// `0x1` on success, `0x0` on revert
    pub status: String,
    #[serde(default)]
    pub to: Option<String>,
    pub transaction_hash: String,
    pub transaction_index: u64,
    #[serde(rename = "type")]
    pub tx_type: String,
}

/// Final receipt of an included user operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOpReceipt {
    pub actual_gas_cost: String,
    pub actual_gas_used: String,
    pub entry_point: String,
    #[serde(default)]
    pub logs: Vec<Log>,
    pub nonce: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster: Option<String>,
    /// Revert reason, if unsuccessful
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub receipt: TransactionReceipt,
    pub sender: String,
    pub success: bool,
    pub user_op_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECEIPT_JSON: &str = r#"{
        "actualGasCost": "0x1d4c0",
        "actualGasUsed": "0x2710",
        "entryPoint": "0x0000000071727De22E5E9d8BAf0edAc6f37da032",
        "logs": [],
        "nonce": "0x0",
        "receipt": {
            "blockHash": "0xabc",
            "blockNumber": "0x10",
            "contractAddress": null,
            "cumulativeGasUsed": "0x5208",
            "effectiveGasPrice": "0x3b9aca00",
            "from": "0x4337",
            "gasUsed": "0x5208",
            "logs": [{
                "address": "0xdead",
                "blockHash": "0xabc",
                "blockNumber": "0x10",
                "data": "0x",
                "logIndex": 0,
                "removed": false,
                "topics": ["0x01"],
                "transactionHash": "0xfeed",
                "transactionIndex": 2
            }],
            "logsBloom": "0x00",
            "status": "0x1",
            "to": "0x0000000071727De22E5E9d8BAf0edAc6f37da032",
            "transactionHash": "0xfeed",
            "transactionIndex": 2,
            "type": "0x2"
        },
        "sender": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
        "success": true,
        "userOpHash": "0x1234"
    }"#;

    #[test]
    fn test_receipt_deserialize() {
        let receipt: UserOpReceipt = serde_json::from_str(RECEIPT_JSON).unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.user_op_hash, "0x1234");
        assert_eq!(receipt.receipt.tx_type, "0x2");
        assert_eq!(receipt.receipt.contract_address, None);
        assert_eq!(receipt.receipt.logs.len(), 1);
        assert_eq!(receipt.receipt.logs[0].transaction_index, 2);
        assert_eq!(receipt.paymaster, None);
    }

    #[test]
    fn test_build_request_omits_unset_fields() {
        let request = BuildUserOpRequest {
            account: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".into(),
            authorization: None,
            is_eip7702_account: false,
            nonce: None,
            entrypoint: "0.7".into(),
            kernel_version: "0.3.3".into(),
            calls: vec![Call::new("0x0000000000000000000000000000000000000000", "0", "0x")],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["kernelVersion"], "0.3.3");
        assert_eq!(json["calls"][0]["value"], "0");
        assert!(json.get("authorization").is_none());
        assert!(json.get("isEip7702Account").is_none());
        assert!(json.get("nonce").is_none());
    }

    #[test]
    fn test_build_response_minimal() {
        let json = r#"{"sender":"0x1","nonce":"0x0","callData":"0x","userOpHash":"0xaa"}"#;
        let response: BuildUserOpResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.user_op_hash, "0xaa");
        assert!(response.factory.is_none());
        assert!(response.authorization.is_none());
    }

    #[test]
    fn test_receipt_request_shape() {
        let json = serde_json::to_string(&GetUserOpReceiptRequest::new("0xab")).unwrap();
        assert_eq!(json, r#"{"userOpHash":"0xab"}"#);
    }
}
