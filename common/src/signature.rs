use std::fmt;

use alloy_primitives::{hex, Signature};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Length of a packed `r || s || v` signature.
pub const SIGNATURE_LEN: usize = 65;
const SCALAR_LEN: usize = 32;

/// A signature as callers hand it in: either the packed 65-byte hex string or
/// its `{ r, s, v }` decomposition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignatureEncoding {
    Packed(String),
    Decomposed { r: String, s: String, v: RecoveryByte },
}

/// The `v` component of a decomposed signature: `27`, `28`, or a string such
/// as `"0x1b"` / `"28"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecoveryByte {
    Number(u64),
    Text(String),
}

/// Canonical 65-byte recoverable ECDSA signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedSignature([u8; SIGNATURE_LEN]);

impl SignatureEncoding {
    /// Reduce either encoding to the canonical packed form.
    ///
    /// Packed strings pass through untouched apart from hex decoding; the
    /// recovery id of a decomposed signature must be 27 or 28.
    pub fn normalize(&self) -> Result<PackedSignature> {
        match self {
            Self::Packed(signature) => decode_fixed::<SIGNATURE_LEN>("signature", signature)
                .map(PackedSignature),
            Self::Decomposed { r, s, v } => {
                let r = decode_fixed::<SCALAR_LEN>("r", r)?;
                let s = decode_fixed::<SCALAR_LEN>("s", s)?;
                Ok(PackedSignature::from_parts(r, s, v.normalize()?))
            }
        }
    }
}

impl From<PackedSignature> for SignatureEncoding {
    fn from(signature: PackedSignature) -> Self {
        Self::Packed(signature.to_string())
    }
}

impl RecoveryByte {
    fn normalize(&self) -> Result<u8> {
        let value = match self {
            Self::Number(value) => *value,
            Self::Text(text) => match text.strip_prefix("0x") {
                Some(digits) => u64::from_str_radix(digits, 16),
                None => text.parse(),
            }
            .map_err(|_| Error::InvalidSignatureFormat(format!("v is not a number: {text:?}")))?,
        };
        match value {
            27 | 28 => Ok(value as u8),
            other => Err(Error::InvalidSignatureFormat(format!(
                "v must be 27 or 28, got {other}"
            ))),
        }
    }
}

impl PackedSignature {
    pub fn from_parts(r: [u8; SCALAR_LEN], s: [u8; SCALAR_LEN], v: u8) -> Self {
        let mut bytes = [0u8; SIGNATURE_LEN];
        bytes[..SCALAR_LEN].copy_from_slice(&r);
        bytes[SCALAR_LEN..2 * SCALAR_LEN].copy_from_slice(&s);
        bytes[2 * SCALAR_LEN] = v;
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    pub fn r(&self) -> &[u8] {
        &self.0[..SCALAR_LEN]
    }

    pub fn s(&self) -> &[u8] {
        &self.0[SCALAR_LEN..2 * SCALAR_LEN]
    }

    pub fn v(&self) -> u8 {
        self.0[2 * SCALAR_LEN]
    }
}

impl From<Signature> for PackedSignature {
    fn from(signature: Signature) -> Self {
        Self(signature.as_bytes())
    }
}

impl fmt::Display for PackedSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_prefixed(self.0))
    }
}

impl fmt::Debug for PackedSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackedSignature({self})")
    }
}

fn decode_fixed<const N: usize>(field: &str, value: &str) -> Result<[u8; N]> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| Error::InvalidSignatureFormat(format!("{field} must start with 0x")))?;
    if digits.len() != N * 2 {
        return Err(Error::InvalidSignatureFormat(format!(
            "{field} must be {N} bytes ({} hex characters), got {} characters",
            N * 2,
            digits.len()
        )));
    }
    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out)
        .map_err(|e| Error::InvalidSignatureFormat(format!("{field} is not valid hex: {e}")))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const R: &str = "0x9847aa89433081329c2187cc0194af48bd228aa612795a6a147fada2c5a12cdc";
    const S: &str = "0x0c885f70b321b1d44337b79ce885b78150324b5875e774e12a39932e986f318b";
    const PACKED: &str = "0x9847aa89433081329c2187cc0194af48bd228aa612795a6a147fada2c5a12cdc0c885f70b321b1d44337b79ce885b78150324b5875e774e12a39932e986f318b1b";

    fn decomposed(v: RecoveryByte) -> SignatureEncoding {
        SignatureEncoding::Decomposed {
            r: R.to_string(),
            s: S.to_string(),
            v,
        }
    }

    #[test]
    fn packed_passes_through() {
        let packed = SignatureEncoding::Packed(PACKED.to_string()).normalize().unwrap();
        assert_eq!(packed.to_string(), PACKED);
        assert_eq!(packed.v(), 27);
    }

    #[test]
    fn decomposed_matches_packed() {
        let packed = SignatureEncoding::Packed(PACKED.to_string()).normalize().unwrap();
        for v in [
            RecoveryByte::Number(27),
            RecoveryByte::Text("0x1b".to_string()),
            RecoveryByte::Text("27".to_string()),
        ] {
            assert_eq!(decomposed(v).normalize().unwrap(), packed);
        }
    }

    #[test]
    fn components_are_sliced_back_out() {
        let packed = decomposed(RecoveryByte::Number(28)).normalize().unwrap();
        assert_eq!(hex::encode_prefixed(packed.r()), R);
        assert_eq!(hex::encode_prefixed(packed.s()), S);
        assert_eq!(packed.v(), 28);
    }

    #[test]
    fn recovery_byte_out_of_range() {
        for v in [
            RecoveryByte::Number(0),
            RecoveryByte::Number(29),
            RecoveryByte::Text("0x1d".to_string()),
            RecoveryByte::Text("0xzz".to_string()),
        ] {
            let err = decomposed(v).normalize().unwrap_err();
            assert!(matches!(err, Error::InvalidSignatureFormat(_)), "{err}");
        }
    }

    #[test]
    fn malformed_packed_signatures() {
        let short = &PACKED[..PACKED.len() - 2];
        let non_hex = format!("{}zz", short);
        let unprefixed = PACKED.trim_start_matches("0x");
        for bad in [short, non_hex.as_str(), unprefixed, "", "0x"] {
            let err = SignatureEncoding::Packed(bad.to_string()).normalize().unwrap_err();
            assert!(err.is_client_error(), "{bad}: {err}");
        }
    }

    #[test]
    fn deserializes_both_shapes() {
        let packed: SignatureEncoding = serde_json::from_str(&format!("\"{PACKED}\"")).unwrap();
        assert_eq!(packed, SignatureEncoding::Packed(PACKED.to_string()));

        let json = format!(r#"{{"r":"{R}","s":"{S}","v":"0x1b"}}"#);
        let parts: SignatureEncoding = serde_json::from_str(&json).unwrap();
        assert_eq!(parts, decomposed(RecoveryByte::Text("0x1b".to_string())));

        let json = format!(r#"{{"r":"{R}","s":"{S}","v":28}}"#);
        let parts: SignatureEncoding = serde_json::from_str(&json).unwrap();
        assert_eq!(parts, decomposed(RecoveryByte::Number(28)));
    }
}
