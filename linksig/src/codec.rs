//! Text encodings for exchanging keys, signatures and decoy sets.
//!
//! Hex output is lowercase with a `0x` prefix; hex input may omit the
//! prefix. Every decoder validates what it reads and reports failures as
//! [`Error::MalformedEncoding`].

use curve::{Affine, ScalarField};
use num_bigint::BigUint;

use crate::constants::{SCALAR_SIZE, SIG_SIZE, SK_SIZE, TAG_SIZE};
use crate::errors::Error;
use crate::keys::{SigningKey, VerifyingKey};
use crate::ring::{DecoySet, LinkTag, RingSignature};
use crate::signatures::Signature;

const HEX_PREFIX: &str = "0x";

/// Lowercase hex with a `0x` prefix.
pub fn encode_hex(bytes: impl AsRef<[u8]>) -> String {
    format!("{HEX_PREFIX}{}", hex::encode(bytes))
}

/// Decodes hex with or without a `0x`/`0X` prefix.
pub fn decode_hex(text: &str) -> Result<Vec<u8>, Error> {
    let digits = text
        .strip_prefix(HEX_PREFIX)
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    hex::decode(digits).map_err(|_| Error::MalformedEncoding("invalid hex"))
}

fn decode_hex_array<const N: usize>(text: &str, what: &'static str) -> Result<[u8; N], Error> {
    let bytes = decode_hex(text)?;
    bytes
        .try_into()
        .map_err(|_| Error::MalformedEncoding(what))
}

/// Hex round-tripping for the crate's exchangeable values.
pub trait HexEncoding: Sized {
    fn to_hex(&self) -> String;
    fn from_hex(text: &str) -> Result<Self, Error>;
}

impl HexEncoding for ScalarField {
    /// 32 bytes big-endian. Zero is a valid scalar here.
    fn to_hex(&self) -> String {
        encode_hex(self.to_bytes_be())
    }

    fn from_hex(text: &str) -> Result<Self, Error> {
        let bytes = decode_hex_array::<SCALAR_SIZE>(text, "scalar must be 32 bytes")?;
        ScalarField::from_bytes_be(&bytes).ok_or(Error::MalformedEncoding("scalar out of range"))
    }
}

impl HexEncoding for Affine {
    /// SEC1 compressed; the identity is `0x00`.
    fn to_hex(&self) -> String {
        encode_hex(self.to_sec1_bytes(true))
    }

    fn from_hex(text: &str) -> Result<Self, Error> {
        Affine::from_sec1_bytes(&decode_hex(text)?)
            .map_err(|_| Error::MalformedEncoding("not a curve point"))
    }
}

impl HexEncoding for VerifyingKey {
    fn to_hex(&self) -> String {
        encode_hex(self.to_bytes())
    }

    /// Accepts compressed and uncompressed SEC1.
    fn from_hex(text: &str) -> Result<Self, Error> {
        VerifyingKey::from_sec1_bytes(&decode_hex(text)?)
            .map_err(|_| Error::MalformedEncoding("not a valid public key"))
    }
}

impl HexEncoding for SigningKey {
    fn to_hex(&self) -> String {
        encode_hex(self.to_bytes())
    }

    fn from_hex(text: &str) -> Result<Self, Error> {
        let bytes = decode_hex_array::<SK_SIZE>(text, "private key must be 32 bytes")?;
        SigningKey::from_bytes(&bytes)
            .map_err(|_| Error::MalformedEncoding("private key out of range"))
    }
}

impl HexEncoding for Signature {
    fn to_hex(&self) -> String {
        encode_hex(self.to_bytes())
    }

    fn from_hex(text: &str) -> Result<Self, Error> {
        let bytes = decode_hex_array::<SIG_SIZE>(text, "signature must be 64 bytes")?;
        Signature::from_bytes(&bytes)
    }
}

impl HexEncoding for RingSignature {
    fn to_hex(&self) -> String {
        encode_hex(self.to_bytes())
    }

    fn from_hex(text: &str) -> Result<Self, Error> {
        RingSignature::from_bytes(&decode_hex(text)?)
    }
}

impl HexEncoding for LinkTag {
    fn to_hex(&self) -> String {
        encode_hex(self.to_bytes())
    }

    fn from_hex(text: &str) -> Result<Self, Error> {
        let bytes = decode_hex_array::<TAG_SIZE>(text, "tag must be 33 bytes")?;
        LinkTag::from_bytes(&bytes).map_err(|_| Error::MalformedEncoding("tag is not a valid point"))
    }
}

impl HexEncoding for sm3::Digest {
    fn to_hex(&self) -> String {
        encode_hex(self.as_bytes())
    }

    fn from_hex(text: &str) -> Result<Self, Error> {
        let bytes = decode_hex_array::<{ sm3::DIGEST_LEN }>(text, "digest must be 32 bytes")?;
        Ok(sm3::Digest::from_bytes(bytes))
    }
}

/// Public keys of a ring or decoy set, one hex string each, in order.
pub fn encode_keys<'a>(keys: impl IntoIterator<Item = &'a VerifyingKey>) -> Vec<String> {
    keys.into_iter().map(HexEncoding::to_hex).collect()
}

pub fn decode_keys<S: AsRef<str>>(texts: &[S]) -> Result<Vec<VerifyingKey>, Error> {
    texts
        .iter()
        .map(|text| VerifyingKey::from_hex(text.as_ref()))
        .collect()
}

pub fn encode_decoys(decoys: &DecoySet) -> Vec<String> {
    encode_keys(decoys)
}

/// Decodes a decoy set, rejecting duplicate members.
pub fn decode_decoys<S: AsRef<str>>(texts: &[S]) -> Result<DecoySet, Error> {
    DecoySet::from_keys(decode_keys(texts)?)
        .map_err(|_| Error::MalformedEncoding("duplicate decoy"))
}

/// Multi-layer ring members, one list of hex strings per member.
pub fn encode_members(members: &[Vec<VerifyingKey>]) -> Vec<Vec<String>> {
    members.iter().map(|member| encode_keys(member)).collect()
}

pub fn decode_members<S: AsRef<str>>(texts: &[Vec<S>]) -> Result<Vec<Vec<VerifyingKey>>, Error> {
    texts.iter().map(|member| decode_keys(member)).collect()
}

/// Decodes a hex ring signature over members holding `layers` keys each.
pub fn decode_layered_ring_signature(text: &str, layers: usize) -> Result<RingSignature, Error> {
    RingSignature::from_bytes_layered(&decode_hex(text)?, layers)
}

/// Decimal digits of the scalar, without leading zeros.
pub fn scalar_to_decimal(scalar: &ScalarField) -> String {
    scalar.as_canonical_biguint().to_str_radix(10)
}

/// Parses ASCII decimal digits into a scalar below n.
pub fn scalar_from_decimal(text: &str) -> Result<ScalarField, Error> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::MalformedEncoding("invalid decimal digits"));
    }
    let value = BigUint::parse_bytes(text.as_bytes(), 10)
        .ok_or(Error::MalformedEncoding("invalid decimal digits"))?;
    ScalarField::from_biguint(&value).ok_or(Error::MalformedEncoding("scalar out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_prefix_optional() {
        assert_eq!(decode_hex("0xff00").unwrap(), vec![0xff, 0x00]);
        assert_eq!(decode_hex("ff00").unwrap(), vec![0xff, 0x00]);
        assert_eq!(decode_hex("0XFF00").unwrap(), vec![0xff, 0x00]);
        assert_eq!(encode_hex([0xabu8, 0x01]), "0xab01");
    }

    #[test]
    fn test_hex_rejects_bad_characters() {
        assert_eq!(decode_hex("0xzz"), Err(Error::MalformedEncoding("invalid hex")));
        assert_eq!(decode_hex("0xabc"), Err(Error::MalformedEncoding("invalid hex")));
    }

    #[test]
    fn test_scalar_hex() {
        let s = ScalarField::from_canonical_u64(0x1234);
        let text = s.to_hex();
        assert_eq!(text.len(), 2 + 64);
        assert!(text.ends_with("1234"));
        assert_eq!(ScalarField::from_hex(&text), Ok(s));
        assert_eq!(ScalarField::from_hex(&text[2..]), Ok(s));
    }

    #[test]
    fn test_scalar_hex_rejects_order_and_short_input() {
        let n = "0xfffffffeffffffffffffffffffffffff7203df6b21c6052b53bbf40939d54123";
        assert_eq!(
            ScalarField::from_hex(n),
            Err(Error::MalformedEncoding("scalar out of range"))
        );
        assert_eq!(
            ScalarField::from_hex("0x01"),
            Err(Error::MalformedEncoding("scalar must be 32 bytes"))
        );
    }

    #[test]
    fn test_decimal() {
        let s = ScalarField::from_canonical_u64(1_000_000_007);
        assert_eq!(scalar_to_decimal(&s), "1000000007");
        assert_eq!(scalar_from_decimal("1000000007"), Ok(s));
        assert_eq!(scalar_from_decimal("0"), Ok(ScalarField::ZERO));

        let minus_one = -ScalarField::ONE;
        assert_eq!(scalar_from_decimal(&scalar_to_decimal(&minus_one)), Ok(minus_one));
    }

    #[test]
    fn test_decimal_rejects_malformed() {
        for bad in ["", "-1", "12a", "0x10", " 1"] {
            assert_eq!(
                scalar_from_decimal(bad),
                Err(Error::MalformedEncoding("invalid decimal digits")),
                "{bad:?}"
            );
        }
        let n = ScalarField::order().to_str_radix(10);
        assert_eq!(
            scalar_from_decimal(&n),
            Err(Error::MalformedEncoding("scalar out of range"))
        );
    }

    #[test]
    fn test_point_hex_identity() {
        assert_eq!(Affine::INFINITY.to_hex(), "0x00");
        assert_eq!(Affine::from_hex("0x00"), Ok(Affine::INFINITY));
        assert!(VerifyingKey::from_hex("0x00").is_err());
    }
}
