pub mod error;
pub mod input;
pub mod sign_request;
pub mod signature;
pub mod signing;
pub mod transactions;
pub mod typed_data;

pub use error::{Error, Result};
pub use input::{parse_call_data, parse_evm_address, EvmAddress};
pub use sign_request::{
    eth_sign_request, personal_sign_request, typed_data_request, SignMethod, SignRequest,
    SignRequestResponse, DEFAULT_MESSAGE, SEPOLIA_CHAIN_ID,
};
pub use signature::{PackedSignature, RecoveryByte, SignatureEncoding};
pub use signing::{
    verify_signature, EcdsaRecovery, MessageData, RecoverSigner, SignatureVerifier, SigningScheme,
};
pub use transactions::{build_send_transactions, TransactionBatchBuilder, TransactionDescriptor};
