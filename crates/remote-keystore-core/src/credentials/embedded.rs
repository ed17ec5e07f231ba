//! Signing identity compiled into the binary
//!
//! Used whenever remote retrieval cannot produce a complete bundle. The
//! values are public; anything signed with them should be treated as a
//! development build.

use once_cell::sync::Lazy;

use super::error::AcquisitionResult;
use super::types::{CredentialBundle, CredentialDescriptor};

/// Store password of the embedded keystore
pub const DEFAULT_STORE_PASSWORD: &str = "android";
/// Key alias inside the embedded keystore
pub const DEFAULT_KEY_ALIAS: &str = "androiddebugkey";
/// Key password inside the embedded keystore
pub const DEFAULT_KEY_PASSWORD: &str = "android";

/// Keystore payload, two hex digits per byte
pub const DEFAULT_KEYSTORE_HEX: &str = concat!(
    "feedfeed000000020000000100000001000f616e64726f696464656275676b65",
    "790000018bcfe568008a33e610465b8238c7ac82507a8a74d55d15186adaa40b",
    "d81ff8c32a4d9d49e18210aca1da6d919ba9c8285c725d196bf923470a17e143",
    "24f2498fb355a0f713d5c8995f05ca6123d7ac489c8400466dddcca5432c2981",
    "d2213ecb37d911fde41567a46f011676253137af1865ec0aaf9e850a74d99151",
    "a8d7d72cf5c53c1bf4714592feed7ba8d461859302f18b47bfa353417a34b135",
    "3ed6122df373926f42558972deb1ff0cc01018c4cece7a891b223221c7d354d8",
    "8ba7e50542ed3baf5676db22fc8a7f9f0ef22278f9de22554edde2fe56a050dc",
);

static EMBEDDED_DEFAULT: Lazy<CredentialBundle> = Lazy::new(|| match build_default(DEFAULT_KEYSTORE_HEX) {
    Ok(bundle) => bundle,
    // Only reachable when the constant itself is malformed
    Err(e) => panic!("{}", e),
});

/// The embedded default bundle, decoded on first use
pub fn embedded_default() -> &'static CredentialBundle {
    &EMBEDDED_DEFAULT
}

/// Decode a keystore payload
pub fn decode_keystore_hex(encoded: &str) -> AcquisitionResult<Vec<u8>> {
    Ok(hex::decode(encoded)?)
}

fn build_default(encoded: &str) -> AcquisitionResult<CredentialBundle> {
    let keystore = decode_keystore_hex(encoded)?;
    Ok(CredentialBundle::embedded(
        keystore,
        CredentialDescriptor::new(DEFAULT_STORE_PASSWORD, DEFAULT_KEY_ALIAS, DEFAULT_KEY_PASSWORD),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::AcquisitionError;

    #[test]
    fn test_default_bundle_values() {
        let bundle = embedded_default();
        assert!(bundle.is_default());
        assert_eq!(bundle.store_password(), DEFAULT_STORE_PASSWORD);
        assert_eq!(bundle.key_alias(), DEFAULT_KEY_ALIAS);
        assert_eq!(bundle.key_password(), DEFAULT_KEY_PASSWORD);
        assert_eq!(bundle.keystore_bytes().len(), DEFAULT_KEYSTORE_HEX.len() / 2);
        // JKS magic
        assert_eq!(&bundle.keystore_bytes()[..4], &[0xfe, 0xed, 0xfe, 0xed]);
    }

    #[test]
    fn test_hex_round_trip() {
        let bytes = decode_keystore_hex(DEFAULT_KEYSTORE_HEX).unwrap();
        assert!(hex::encode(&bytes).eq_ignore_ascii_case(DEFAULT_KEYSTORE_HEX));
        assert_eq!(hex::encode_upper(&bytes), DEFAULT_KEYSTORE_HEX.to_uppercase());
    }

    #[test]
    fn test_decode_accepts_either_case() {
        assert_eq!(decode_keystore_hex("0aFf").unwrap(), vec![0x0a, 0xff]);
        assert_eq!(decode_keystore_hex("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_odd_length_is_corrupt() {
        let err = decode_keystore_hex("abc").unwrap_err();
        assert!(matches!(err, AcquisitionError::CorruptEmbeddedDefault(hex::FromHexError::OddLength)));
        assert!(build_default("feedfee").is_err());
    }

    #[test]
    fn test_invalid_digit_is_corrupt() {
        assert!(matches!(
            decode_keystore_hex("zz"),
            Err(AcquisitionError::CorruptEmbeddedDefault(_))
        ));
    }

    #[test]
    fn test_default_is_shared() {
        assert!(std::ptr::eq(embedded_default(), embedded_default()));
    }
}
