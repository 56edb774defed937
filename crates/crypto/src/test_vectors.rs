//! Golden test vectors for the canonical wire format.
//!
//! These pin the exact message bytes and Ed25519 signatures that the oracle
//! produces for fixed assertions, so any drift between signer and verifier
//! implementations fails here first. The signatures were produced by an
//! independent Ed25519 implementation signing the oracle's canonical JSON.

use crate::canonical::RiskAssertion;

/// A golden vector: assertion, expected canonical text and expected signature.
#[derive(Debug, Clone)]
pub struct CanonicalTestVector {
    pub name: &'static str,
    pub assertion: RiskAssertion,
    pub expected_canonical: &'static str,
    pub expected_signature_hex: &'static str,
}

/// Fixed private key for test vectors (RFC 8032, test 1).
///
/// ⚠️ WARNING: DO NOT USE IN PRODUCTION ⚠️
///
/// This key is publicly known and only exists for reproducible vectors.
pub const TEST_VECTOR_PRIVATE_KEY: [u8; 32] = [
    0x9d, 0x61, 0xb1, 0x9d, 0xef, 0xfd, 0x5a, 0x60, 0xba, 0x84, 0x4a, 0xf4, 0x92, 0xec, 0x2c, 0xc4,
    0x44, 0x49, 0xc5, 0x69, 0x7b, 0x32, 0x69, 0x19, 0x70, 0x3b, 0xac, 0x03, 0x1c, 0xae, 0x7f, 0x60,
];

/// Public key matching [`TEST_VECTOR_PRIVATE_KEY`].
pub const TEST_VECTOR_PUBLIC_KEY_HEX: &str =
    "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

pub fn get_test_vectors() -> Vec<CanonicalTestVector> {
    vec![
        CanonicalTestVector {
            name: "vector_1_stellar_account_freeze",
            assertion: RiskAssertion::new(
                "GBRPYHIL2CI3FNQ4BXLFMNDLFJUNPU2HY3ZMFSHONUCEOASW7QC7OX2H",
                87,
                1737718800,
            ),
            expected_canonical: r#"{"risk_score":87,"timestamp":1737718800,"wallet":"GBRPYHIL2CI3FNQ4BXLFMNDLFJUNPU2HY3ZMFSHONUCEOASW7QC7OX2H"}"#,
            expected_signature_hex: "03f9c47cdb6c6610cfb95e0ae1543ff9a0dc416a563cc821330e46331f1451f00f609f5888bf8d2733c91597939452fe672cb54dc893c50e4553aff4f8d3e10b",
        },
        CanonicalTestVector {
            name: "vector_2_zero_score",
            assertion: RiskAssertion::new("W1", 0, 1700000000),
            expected_canonical: r#"{"risk_score":0,"timestamp":1700000000,"wallet":"W1"}"#,
            expected_signature_hex: "717ab374a493c75107d587f2a64adfb22e715852be91fa6c22fbfb2686c229120ede707920b211b6a50d5b71b702df3e9abfb109b2427a3f7bf051592ad26d01",
        },
        CanonicalTestVector {
            name: "vector_3_escaped_wallet",
            assertion: RiskAssertion::new("w\u{e9}\"\\\n\u{1F600}", 100, u64::MAX),
            expected_canonical: r#"{"risk_score":100,"timestamp":18446744073709551615,"wallet":"w\u00e9\"\\\n\ud83d\ude00"}"#,
            expected_signature_hex: "b1e47c9ea12b93f35931880b18557dcd0c66a286ebbe811562a629c86780937c1cba09d259724f5afb53793a8d68995efcbf55ed26da9f4cb5a0aab956374a0e",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::AssertionSigner;
    use crate::verify::{verify_assertion, Ed25519Verifier};
    use sentinel_core::{AuthorityKey, SignatureBytes};

    #[test]
    fn test_public_key_matches_vector() {
        let signer = AssertionSigner::from_key(&TEST_VECTOR_PRIVATE_KEY).unwrap();
        assert_eq!(signer.public_key().to_hex(), TEST_VECTOR_PUBLIC_KEY_HEX);
    }

    #[test]
    fn test_canonical_bytes_match_golden() {
        for vector in get_test_vectors() {
            assert_eq!(
                vector.assertion.to_canonical_string(),
                vector.expected_canonical,
                "canonical form drifted for {}",
                vector.name
            );
        }
    }

    #[test]
    fn test_signatures_match_golden() {
        let signer = AssertionSigner::from_key(&TEST_VECTOR_PRIVATE_KEY).unwrap();
        for vector in get_test_vectors() {
            let signature = signer.sign_unchecked(&vector.assertion);
            assert_eq!(
                signature.to_hex(),
                vector.expected_signature_hex,
                "signature drifted for {}",
                vector.name
            );
        }
    }

    #[test]
    fn test_golden_signatures_verify() {
        let key = AuthorityKey::from_hex(TEST_VECTOR_PUBLIC_KEY_HEX).unwrap();
        for vector in get_test_vectors() {
            let signature = SignatureBytes::from_hex(vector.expected_signature_hex).unwrap();
            assert!(
                verify_assertion(&Ed25519Verifier, &key, &vector.assertion, &signature),
                "golden signature rejected for {}",
                vector.name
            );
        }
    }

    #[test]
    fn test_golden_bytes_parse_back() {
        for vector in get_test_vectors() {
            let parsed = RiskAssertion::from_canonical(vector.expected_canonical.as_bytes()).unwrap();
            assert_eq!(parsed, vector.assertion, "parse mismatch for {}", vector.name);
        }
    }
}
