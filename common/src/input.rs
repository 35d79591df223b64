//! Parsing of raw, caller-supplied strings into the typed values the core
//! works with.

use std::fmt;

use alloy_primitives::{hex, Address};

use crate::error::{Error, Result};

const ADDRESS_HEX_LEN: usize = 40;

/// `0x` followed by 40 hex digits, in any letter casing.
pub fn parse_evm_address(raw: &str) -> Result<Address> {
    let valid = raw.strip_prefix("0x").is_some_and(|digits| {
        digits.len() == ADDRESS_HEX_LEN && digits.bytes().all(|b| b.is_ascii_hexdigit())
    });
    if !valid {
        return Err(Error::InvalidInput(format!("Invalid EVM address: {raw:?}")));
    }
    raw.parse()
        .map_err(|e| Error::InvalidInput(format!("Invalid EVM address {raw:?}: {e}")))
}

/// A validated address that remembers how the caller spelled it, so
/// human-readable summaries echo the input rather than its checksum form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmAddress {
    address: Address,
    raw: String,
}

impl EvmAddress {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(Self {
            address: parse_evm_address(raw)?,
            raw: raw.to_string(),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl From<Address> for EvmAddress {
    fn from(address: Address) -> Self {
        Self {
            address,
            raw: address.to_checksum(None),
        }
    }
}

impl fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Check that `raw` is `0x` followed by an even number of hex digits and hand
/// it back unchanged.
pub fn parse_call_data(raw: &str) -> Result<&str> {
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| Error::InvalidInput(format!("callData must start with 0x: {raw:?}")))?;
    if digits.len() % 2 != 0 {
        return Err(Error::InvalidInput(format!(
            "callData must have an even number of hex digits: {raw:?}"
        )));
    }
    hex::decode(digits)
        .map(|_| raw)
        .map_err(|e| Error::InvalidInput(format!("callData is not valid hex: {e}")))
}
