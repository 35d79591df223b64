use alloy_primitives::{hex, Address};
use serde::{Deserialize, Serialize};

use crate::{transactions::TransactionDescriptor, typed_data::demo_access_typed_data};

/// Sepolia, the chain every demo request targets unless configured otherwise.
pub const SEPOLIA_CHAIN_ID: u64 = 11155111;

/// Message used when a caller asks for a signature without supplying one.
pub const DEFAULT_MESSAGE: &str = "Default Message";

/// What a wallet should sign, on which chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    pub chain_id: u64,
    #[serde(flatten)]
    pub method: SignMethod,
}

/// Wallet method together with its positional params.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum SignMethod {
    /// `[address, hexMessage]`
    #[serde(rename = "eth_sign")]
    EthSign(Address, String),

    /// `[hexMessage, address]`; wallets reject the reverse order.
    #[serde(rename = "personal_sign")]
    PersonalSign(String, Address),

    #[serde(rename = "eth_sendTransaction")]
    SendTransaction(Vec<TransactionDescriptor>),

    /// `[address, typedDataJson]`
    #[serde(rename = "eth_signTypedData")]
    SignTypedData(Address, String),

    /// `[address, typedDataJson]`
    #[serde(rename = "eth_signTypedData_v4")]
    SignTypedDataV4(Address, String),
}

impl SignMethod {
    pub fn name(&self) -> &'static str {
        match self {
            Self::EthSign(..) => "eth_sign",
            Self::PersonalSign(..) => "personal_sign",
            Self::SendTransaction(_) => "eth_sendTransaction",
            Self::SignTypedData(..) => "eth_signTypedData",
            Self::SignTypedDataV4(..) => "eth_signTypedData_v4",
        }
    }
}

/// Tool response: the request plus a human-readable summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignRequestResponse {
    pub transaction: SignRequest,
    pub meta: String,
}

pub fn eth_sign_request(chain_id: u64, address: Address, message: &str) -> SignRequestResponse {
    SignRequestResponse {
        transaction: SignRequest {
            chain_id,
            method: SignMethod::EthSign(address, hex::encode_prefixed(message)),
        },
        meta: format!("Sign message \"{message}\" with {address}"),
    }
}

pub fn personal_sign_request(
    chain_id: u64,
    address: Address,
    message: &str,
) -> SignRequestResponse {
    SignRequestResponse {
        transaction: SignRequest {
            chain_id,
            method: SignMethod::PersonalSign(hex::encode_prefixed(message), address),
        },
        meta: format!("Sign personal message: \"{message}\""),
    }
}

/// An `eth_signTypedData_v4` request over the expired demo `Access` grant.
pub fn typed_data_request(chain_id: u64, address: Address) -> SignRequestResponse {
    let typed_data = demo_access_typed_data(chain_id, address).to_string();
    SignRequestResponse {
        transaction: SignRequest {
            chain_id,
            method: SignMethod::SignTypedDataV4(address, typed_data),
        },
        meta: "Sign Dummy Typed Data.".to_string(),
    }
}
