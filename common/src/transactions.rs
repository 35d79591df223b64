use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::input::EvmAddress;
use crate::sign_request::{SignMethod, SignRequest, SignRequestResponse, SEPOLIA_CHAIN_ID};

/// Value attached to transactions that are expected to go through.
pub const ZERO_VALUE: &str = "0x00";

/// One EVM call inside an `eth_sendTransaction` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDescriptor {
    pub to: Address,
    pub value: String,
    pub data: String,
}

/// `0xff..ff`: no account can fund it, so any broadcast fails.
pub fn unfundable_value() -> String {
    format!("0x{:x}", U256::MAX)
}

/// Builds batches of self-addressed transactions where a chosen number
/// succeed and the rest are doomed to fail for insufficient funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionBatchBuilder {
    chain_id: u64,
}

impl Default for TransactionBatchBuilder {
    fn default() -> Self {
        Self::new(SEPOLIA_CHAIN_ID)
    }
}

impl TransactionBatchBuilder {
    pub fn new(chain_id: u64) -> Self {
        Self { chain_id }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// `num_success` zero-valued transactions followed by `num_fail`
    /// transactions carrying [`U256::MAX`], all sent to `to`.
    ///
    /// `call_data` is copied verbatim into every transaction. Without it,
    /// each transaction's data is its 1-based index within its own sub-batch.
    pub fn build_send_transactions(
        &self,
        to: &EvmAddress,
        num_success: usize,
        num_fail: usize,
        call_data: Option<&str>,
    ) -> SignRequestResponse {
        let mut params = Vec::with_capacity(num_success + num_fail);
        let batches = [(num_success, ZERO_VALUE.to_string()), (num_fail, unfundable_value())];
        for (count, value) in batches {
            params.extend((1..=count).map(|index| TransactionDescriptor {
                to: to.address(),
                value: value.clone(),
                data: call_data.map_or_else(|| format!("{index:#x}"), str::to_string),
            }));
        }

        SignRequestResponse {
            transaction: SignRequest {
                chain_id: self.chain_id,
                method: SignMethod::SendTransaction(params),
            },
            meta: format!(
                "{} non-trivial transactions to {to} with {num_success} succeeding & {num_fail} failing.",
                num_success + num_fail
            ),
        }
    }
}

/// [`TransactionBatchBuilder::build_send_transactions`] on Sepolia.
pub fn build_send_transactions(
    to: &EvmAddress,
    num_success: usize,
    num_fail: usize,
    call_data: Option<&str>,
) -> SignRequestResponse {
    TransactionBatchBuilder::default().build_send_transactions(to, num_success, num_fail, call_data)
}
