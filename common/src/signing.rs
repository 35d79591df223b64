use alloy_dyn_abi::TypedData;
use alloy_primitives::{hex, keccak256, Address, Signature, B256};
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{Error, Result},
    signature::{PackedSignature, SignatureEncoding},
    typed_data::{parse_typed_data, typed_data_digest},
};

/// The signed content handed to the verifier.
///
/// Typed data may also arrive as a JSON string; [`SigningScheme::classify`]
/// sniffs for that case.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageData {
    Text(String),
    TypedData(Box<TypedData>),
}

impl From<&str> for MessageData {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<TypedData> for MessageData {
    fn from(typed: TypedData) -> Self {
        Self::TypedData(Box::new(typed))
    }
}

/// How the signed digest is built.
/// - `Personal`: EIP-191; keccak256("\x19Ethereum Signed Message:\n{len}" || message)
/// - `TypedData`: EIP-712 structured-data hash
#[derive(Debug, Clone)]
pub enum SigningScheme {
    Personal(Vec<u8>),
    TypedData(Box<TypedData>),
}

impl SigningScheme {
    /// Pick the hashing scheme for a message.
    ///
    /// A string that parses as JSON with the typed-data outline is hashed as
    /// EIP-712. This is a protocol quirk: a plain-text message that happens to
    /// look like typed data is treated as typed data.
    pub fn classify(message: &MessageData) -> Result<Self> {
        match message {
            MessageData::TypedData(typed) => Ok(Self::TypedData(typed.clone())),
            MessageData::Text(text) => Ok(match parse_typed_data(text)? {
                Some(typed) => Self::TypedData(Box::new(typed)),
                None => Self::Personal(personal_message_bytes(text)),
            }),
        }
    }

    /// The 32-byte digest the signer committed to.
    pub fn prehash(&self) -> Result<B256> {
        match self {
            Self::Personal(message) => {
                let prefix = format!("\x19Ethereum Signed Message:\n{}", message.len());
                Ok(keccak256([prefix.as_bytes(), message.as_slice()].concat()))
            }
            Self::TypedData(typed) => typed_data_digest(typed),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Personal(_) => "personal",
            Self::TypedData(_) => "eip712",
        }
    }
}

/// Bytes a plain-text message signs over: a `0x` hex literal is decoded
/// (odd digit counts are left-padded), anything else is taken as UTF-8.
fn personal_message_bytes(text: &str) -> Vec<u8> {
    let Some(digits) = text.strip_prefix("0x") else {
        return text.as_bytes().to_vec();
    };
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return text.as_bytes().to_vec();
    }
    let decoded = if digits.len() % 2 == 1 {
        hex::decode(format!("0{digits}"))
    } else {
        hex::decode(digits)
    };
    // Every character is a hex digit and the length is even, so decoding holds.
    decoded.unwrap_or_else(|_| text.as_bytes().to_vec())
}

/// Address recovery from a signature over a 32-byte prehash.
pub trait RecoverSigner {
    fn recover(&self, signature: &PackedSignature, prehash: &B256) -> Result<Address>;
}

/// secp256k1 public-key recovery.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdsaRecovery;

impl RecoverSigner for EcdsaRecovery {
    fn recover(&self, signature: &PackedSignature, prehash: &B256) -> Result<Address> {
        let signature = Signature::from_raw(signature.as_bytes())
            .map_err(|e| Error::RecoveryFailure(format!("invalid signature: {e}")))?;
        signature
            .recover_address_from_prehash(prehash)
            .map_err(|e| Error::RecoveryFailure(format!("recovery failed: {e}")))
    }
}

/// Checks that a signature over a message was produced by a claimed address.
#[derive(Debug, Clone, Default)]
pub struct SignatureVerifier<R = EcdsaRecovery> {
    recovery: R,
}

impl SignatureVerifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: RecoverSigner> SignatureVerifier<R> {
    pub fn with_recovery(recovery: R) -> Self {
        Self { recovery }
    }

    /// Recover the signer of `message` and compare it with `claimed`.
    ///
    /// `Ok(false)` means recovery worked but produced another address.
    /// Malformed signatures, unhashable typed data and recovery errors are
    /// returned as errors.
    pub fn verify(
        &self,
        claimed: Address,
        message: &MessageData,
        signature: &SignatureEncoding,
    ) -> Result<bool> {
        let signature = signature.normalize()?;
        let recovered = self.recover(message, &signature)?;
        // Address equality is over the 20 raw bytes, so checksum casing of the
        // caller's input never matters.
        Ok(recovered == claimed)
    }

    /// Recover the address that signed `message`.
    pub fn recover(&self, message: &MessageData, signature: &PackedSignature) -> Result<Address> {
        let scheme = SigningScheme::classify(message)?;
        let prehash = scheme.prehash()?;
        let recovered = self.recovery.recover(signature, &prehash)?;
        debug!(scheme = scheme.name(), %prehash, %recovered, "recovered signer");
        Ok(recovered)
    }
}

/// Verify with the default secp256k1 recovery.
pub fn verify_signature(
    claimed: Address,
    message: &MessageData,
    signature: &SignatureEncoding,
) -> Result<bool> {
    SignatureVerifier::new().verify(claimed, message, signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typed_data::demo_access_typed_data;
    use alloy_primitives::address;
    use alloy_signer::SignerSync;
    use alloy_signer_local::PrivateKeySigner;
    use std::cell::Cell;

    // Anvil/Hardhat account #0
    const TEST_PRIVATE_KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const OTHER_ADDRESS: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

    fn signer() -> PrivateKeySigner {
        TEST_PRIVATE_KEY.parse().unwrap()
    }

    fn sign_text(message: &[u8]) -> PackedSignature {
        signer().sign_message_sync(message).unwrap().into()
    }

    fn sign_typed(typed: &TypedData) -> PackedSignature {
        let hash = typed.eip712_signing_hash().unwrap();
        signer().sign_hash_sync(&hash).unwrap().into()
    }

    fn demo_typed_data() -> TypedData {
        serde_json::from_value(demo_access_typed_data(11155111, TEST_ADDRESS)).unwrap()
    }

    fn decomposed(signature: &PackedSignature) -> SignatureEncoding {
        serde_json::from_value(serde_json::json!({
            "r": hex::encode_prefixed(signature.r()),
            "s": hex::encode_prefixed(signature.s()),
            "v": signature.v(),
        }))
        .unwrap()
    }

    fn flip_last_digit(signature: &PackedSignature) -> SignatureEncoding {
        let mut text = signature.to_string();
        let last = text.pop().unwrap();
        text.push(if last == '0' { '1' } else { '0' });
        SignatureEncoding::Packed(text)
    }

    #[test]
    fn plain_message_round_trip() {
        let signature = sign_text(b"Hello, Ethereum!");
        let message = MessageData::from("Hello, Ethereum!");
        assert!(verify_signature(TEST_ADDRESS, &message, &signature.into()).unwrap());
    }

    #[test]
    fn altered_message_or_address_is_invalid() {
        let signature: SignatureEncoding = sign_text(b"beer").into();
        assert!(!verify_signature(TEST_ADDRESS, &"bees".into(), &signature).unwrap());
        assert!(!verify_signature(OTHER_ADDRESS, &"beer".into(), &signature).unwrap());
    }

    #[test]
    fn altered_signature_is_invalid_or_fails() {
        let signature = sign_text(b"beer");
        let mut bytes = *signature.as_bytes();
        bytes[10] ^= 0x01;
        let tampered = SignatureEncoding::Packed(hex::encode_prefixed(bytes));
        match verify_signature(TEST_ADDRESS, &"beer".into(), &tampered) {
            Ok(valid) => assert!(!valid),
            Err(err) => assert!(matches!(err, Error::RecoveryFailure(_))),
        }
    }

    #[test]
    fn hex_message_is_decoded_before_hashing() {
        // "0x68656c6c6f" is "hello"
        let signature: SignatureEncoding = sign_text(b"hello").into();
        assert!(verify_signature(TEST_ADDRESS, &"0x68656c6c6f".into(), &signature).unwrap());
        assert!(verify_signature(TEST_ADDRESS, &"hello".into(), &signature).unwrap());
    }

    #[test]
    fn flipped_last_digit_is_rejected() {
        let signature = sign_text(b"hello");
        let flipped = flip_last_digit(&signature);
        match verify_signature(TEST_ADDRESS, &"0x68656c6c6f".into(), &flipped) {
            Ok(valid) => assert!(!valid),
            Err(err) => assert!(matches!(err, Error::RecoveryFailure(_))),
        }
    }

    #[test]
    fn personal_message_bytes_handles_hex_and_text() {
        assert_eq!(personal_message_bytes("0x68656c6c6f"), b"hello".to_vec());
        assert_eq!(personal_message_bytes("0x1"), vec![0x01]);
        assert_eq!(personal_message_bytes("0x"), Vec::<u8>::new());
        assert_eq!(personal_message_bytes("0xnope"), b"0xnope".to_vec());
        assert_eq!(personal_message_bytes("beer"), b"beer".to_vec());
    }

    #[test]
    fn typed_data_object_round_trip() {
        let typed = demo_typed_data();
        let signature = sign_typed(&typed);
        let message = MessageData::from(typed);
        assert!(verify_signature(TEST_ADDRESS, &message, &signature.into()).unwrap());
    }

    #[test]
    fn typed_data_string_round_trip() {
        let typed = demo_typed_data();
        let signature = sign_typed(&typed);
        let json = demo_access_typed_data(11155111, TEST_ADDRESS).to_string();
        assert!(verify_signature(TEST_ADDRESS, &json.as_str().into(), &signature.into()).unwrap());
    }

    #[test]
    fn typed_data_signature_does_not_verify_as_plain_text() {
        let typed = demo_typed_data();
        let signature = sign_typed(&typed);
        let scheme = SigningScheme::Personal(b"not the document".to_vec());
        let recovered = EcdsaRecovery.recover(&signature, &scheme.prehash().unwrap()).unwrap();
        assert_ne!(recovered, TEST_ADDRESS);
    }

    #[test]
    fn message_data_deserializes_from_string_or_object() {
        let text: MessageData = serde_json::from_str("\"beer\"").unwrap();
        assert!(matches!(text, MessageData::Text(ref t) if t == "beer"));

        let object: MessageData =
            serde_json::from_value(demo_access_typed_data(1, TEST_ADDRESS)).unwrap();
        assert!(matches!(object, MessageData::TypedData(_)));
    }

    #[test]
    fn shaped_but_broken_typed_data_is_an_error() {
        let signature: SignatureEncoding = sign_text(b"beer").into();
        let mut doc = demo_access_typed_data(11155111, TEST_ADDRESS);
        doc["primaryType"] = serde_json::json!("Missing");
        let err = verify_signature(TEST_ADDRESS, &doc.to_string().as_str().into(), &signature)
            .unwrap_err();
        assert!(matches!(err, Error::RecoveryFailure(_)));
        assert!(!err.is_client_error());
    }

    #[test]
    fn packed_and_decomposed_agree() {
        let signature = sign_text(b"beer");
        for message in ["beer", "wine"] {
            let packed =
                verify_signature(TEST_ADDRESS, &message.into(), &signature.into()).unwrap();
            let parts =
                verify_signature(TEST_ADDRESS, &message.into(), &decomposed(&signature)).unwrap();
            assert_eq!(packed, parts, "{message}");
        }
    }

    #[test]
    fn address_casing_is_irrelevant() {
        let signature: SignatureEncoding = sign_text(b"beer").into();
        for text in [
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
            "0xF39FD6E51AAD88F6F4CE6AB8827279CFFFB92266",
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
        ] {
            let claimed: Address = text.parse().unwrap();
            assert!(verify_signature(claimed, &"beer".into(), &signature).unwrap(), "{text}");
        }
    }

    #[test]
    fn malformed_signature_is_client_error() {
        let err = verify_signature(
            TEST_ADDRESS,
            &"beer".into(),
            &SignatureEncoding::Packed("0x1234".to_string()),
        )
        .unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn invalid_recovery_id_is_recovery_failure() {
        let signature = sign_text(b"beer");
        let mut bytes = *signature.as_bytes();
        bytes[64] = 5;
        let err = verify_signature(
            TEST_ADDRESS,
            &"beer".into(),
            &SignatureEncoding::Packed(hex::encode_prefixed(bytes)),
        )
        .unwrap_err();
        assert!(matches!(err, Error::RecoveryFailure(_)));
    }

    struct FixedRecovery {
        address: Address,
        calls: Cell<usize>,
    }

    impl RecoverSigner for FixedRecovery {
        fn recover(&self, _: &PackedSignature, _: &B256) -> Result<Address> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.address)
        }
    }

    #[test]
    fn recovery_is_injectable() {
        let verifier = SignatureVerifier::with_recovery(FixedRecovery {
            address: OTHER_ADDRESS,
            calls: Cell::new(0),
        });
        let signature: SignatureEncoding = sign_text(b"beer").into();
        assert!(verifier.verify(OTHER_ADDRESS, &"beer".into(), &signature).unwrap());
        assert!(!verifier.verify(TEST_ADDRESS, &"beer".into(), &signature).unwrap());
        assert_eq!(verifier.recovery.calls.get(), 2);
    }

    #[test]
    fn bad_signature_never_reaches_recovery() {
        let verifier = SignatureVerifier::with_recovery(FixedRecovery {
            address: TEST_ADDRESS,
            calls: Cell::new(0),
        });
        let bad = SignatureEncoding::Packed("0xdeadbeef".to_string());
        assert!(verifier.verify(TEST_ADDRESS, &"beer".into(), &bad).is_err());
        assert_eq!(verifier.recovery.calls.get(), 0);
    }
}
