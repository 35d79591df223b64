use alloy_dyn_abi::TypedData;
use alloy_primitives::{Address, B256};
use serde_json::{json, Value};

use crate::error::{Error, Result};

pub const DEMO_DOMAIN_NAME: &str = "Bitte Test EVM Agent";
pub const DEMO_DOMAIN_VERSION: &str = "1";
pub const DEMO_ACTION: &str = "DEMO SIGNATURE — NOT USABLE";
pub const DEMO_NOTE: &str = "This signature is expired and only for testing/demo purposes.";

/// Whether a JSON value has the outline of an EIP-712 document: an object
/// with object `domain`, object `types`, string `primaryType` and object
/// `message`.
pub fn has_typed_data_shape(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };
    object.get("domain").is_some_and(Value::is_object)
        && object.get("types").is_some_and(Value::is_object)
        && object.get("primaryType").is_some_and(Value::is_string)
        && object.get("message").is_some_and(Value::is_object)
}

/// Read a string transport field as a JSON-encoded EIP-712 document.
///
/// Returns `Ok(None)` when the text is not JSON or lacks the typed-data
/// outline, so the caller can fall back to treating it as a plain message.
/// A document that has the outline but does not parse is an error.
pub fn parse_typed_data(text: &str) -> Result<Option<TypedData>> {
    let Ok(value) = serde_json::from_str::<Value>(text) else {
        return Ok(None);
    };
    if !has_typed_data_shape(&value) {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| Error::RecoveryFailure(format!("Invalid EIP-712 typed data JSON: {e}")))
}

/// Compute the EIP-712 signing digest of a typed-data document:
/// keccak256("\x19\x01" || domainSeparator || hashStruct(message)).
pub fn typed_data_digest(typed: &TypedData) -> Result<B256> {
    typed
        .eip712_signing_hash()
        .map_err(|e| Error::RecoveryFailure(format!("Failed computing EIP-712 digest: {e}")))
}

/// The expired `Access` grant handed out by the typed-data tool.
pub fn demo_access_typed_data(chain_id: u64, user: Address) -> Value {
    json!({
        "domain": {
            "name": DEMO_DOMAIN_NAME,
            "version": DEMO_DOMAIN_VERSION,
            "chainId": chain_id,
            "verifyingContract": Address::ZERO,
        },
        "types": {
            "Access": [
                { "name": "user", "type": "address" },
                { "name": "action", "type": "string" },
                { "name": "expires", "type": "uint256" },
                { "name": "note", "type": "string" },
            ],
        },
        "primaryType": "Access",
        "message": {
            "user": user,
            "action": DEMO_ACTION,
            "expires": 0,
            "note": DEMO_NOTE,
        },
    })
}
