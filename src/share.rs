//! The share wire format.
//!
//! A share is `x ‖ y_1 ‖ … ‖ y_L`: one x-coordinate byte in `1..=255`
//! followed by one evaluation per secret byte, in secret order.

use core::fmt;
use std::str::FromStr;

use serde::{
    de::{self, SeqAccess, Visitor},
    ser::SerializeSeq,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::error::{Result, SharingError};

/// Smallest valid encoding: an x-coordinate and one y-value.
pub const MIN_SHARE_LEN: usize = 2;

/// One point per secret byte, all at the same x-coordinate.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Share {
    bytes: Vec<u8>,
}

impl Share {
    /// Builds a share from its x-coordinate and y-values.
    pub fn new(x: u8, ys: &[u8]) -> Result<Self> {
        let mut bytes = Vec::with_capacity(ys.len() + 1);
        bytes.push(x);
        bytes.extend_from_slice(ys);
        Share::from_bytes(bytes)
    }

    /// Decodes a share, rejecting inputs shorter than [`MIN_SHARE_LEN`] and a
    /// zero x-coordinate.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        validate(&bytes)?;
        Ok(Share { bytes })
    }

    pub fn x(&self) -> u8 {
        self.bytes[0]
    }

    pub fn ys(&self) -> &[u8] {
        &self.bytes[1..]
    }

    pub(crate) fn ys_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[1..]
    }

    /// Length of the secret this share was split from.
    pub fn secret_len(&self) -> usize {
        self.bytes.len() - 1
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

fn validate(bytes: &[u8]) -> Result<()> {
    if bytes.len() < MIN_SHARE_LEN {
        return Err(SharingError::LengthMismatch(format!(
            "share must be at least {} bytes, got {}",
            MIN_SHARE_LEN,
            bytes.len()
        )));
    }
    if bytes[0] == 0 {
        return Err(SharingError::MalformedShare(
            "x-coordinate 0 is reserved for the secret".to_string(),
        ));
    }
    Ok(())
}

impl AsRef<[u8]> for Share {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl TryFrom<Vec<u8>> for Share {
    type Error = SharingError;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        Share::from_bytes(bytes)
    }
}

impl TryFrom<&[u8]> for Share {
    type Error = SharingError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Share::from_bytes(bytes.to_vec())
    }
}

impl From<Share> for Vec<u8> {
    fn from(share: Share) -> Self {
        share.bytes
    }
}

// y-values are secret material; keep them out of debug output and logs.
impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Share")
            .field("x", &self.x())
            .field("secret_len", &self.secret_len())
            .finish()
    }
}

/// Lower-case hex of the wire bytes.
impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.bytes))
    }
}

impl FromStr for Share {
    type Err = SharingError;

    fn from_str(s: &str) -> Result<Self> {
        Share::from_bytes(hex::decode(s.trim())?)
    }
}

impl Serialize for Share {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.bytes.len()))?;
        for b in &self.bytes {
            seq.serialize_element(b)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Share {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ShareVisitor;

        impl<'de> Visitor<'de> for ShareVisitor {
            type Value = Share;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence of bytes: x-coordinate followed by y-values")
            }

            fn visit_seq<V>(self, mut seq: V) -> std::result::Result<Share, V::Error>
            where
                V: SeqAccess<'de>,
            {
                let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(byte) = seq.next_element()? {
                    bytes.push(byte);
                }
                Share::from_bytes(bytes).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_seq(ShareVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_accessors() {
        let share = Share::new(3, &[0xaa, 0xbb]).unwrap();
        assert_eq!(share.x(), 3);
        assert_eq!(share.ys(), &[0xaa, 0xbb]);
        assert_eq!(share.secret_len(), 2);
        assert_eq!(share.as_bytes(), &[3, 0xaa, 0xbb]);
    }

    #[test]
    fn test_decode_encode() {
        let bytes = vec![0x11, 0x00, 0xff, 0x42];
        let share = Share::try_from(bytes.as_slice()).unwrap();
        assert_eq!(share.to_bytes(), bytes);
        assert_eq!(Vec::<u8>::from(share), bytes);
    }

    #[test]
    fn test_reject_empty_and_short() {
        assert!(matches!(
            Share::from_bytes(vec![]),
            Err(SharingError::LengthMismatch(_))
        ));
        assert!(matches!(
            Share::from_bytes(vec![1]),
            Err(SharingError::LengthMismatch(_))
        ));
    }

    #[test]
    fn test_reject_zero_x() {
        assert!(matches!(
            Share::from_bytes(vec![0, 1, 2]),
            Err(SharingError::MalformedShare(_))
        ));
        assert!(Share::new(0, &[1]).is_err());
    }

    #[test]
    fn test_hex_text_form() {
        let share: Share = "01a0ff".parse().unwrap();
        assert_eq!(share.x(), 1);
        assert_eq!(share.to_string(), "01a0ff");
        assert!(matches!(
            "01zz".parse::<Share>(),
            Err(SharingError::InvalidHex(_))
        ));
        assert!(matches!(
            "00ff".parse::<Share>(),
            Err(SharingError::MalformedShare(_))
        ));
    }

    #[test]
    fn test_debug_hides_y_values() {
        let share = Share::new(9, &[0xde, 0xad]).unwrap();
        let debug = format!("{:?}", share);
        assert!(debug.contains("x: 9"));
        assert!(!debug.contains("222"));
        assert!(!debug.contains("de"));
    }

    #[test]
    fn test_serde_validates() {
        let share = Share::new(7, &[1, 2, 3]).unwrap();
        let json = serde_json::to_string(&share).unwrap();
        assert_eq!(json, "[7,1,2,3]");
        let back: Share = serde_json::from_str(&json).unwrap();
        assert_eq!(back, share);

        assert!(serde_json::from_str::<Share>("[0,1,2]").is_err());
        assert!(serde_json::from_str::<Share>("[5]").is_err());
    }
}
