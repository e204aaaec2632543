//! API token formatting, parsing, and verifier construction.
//!
//! Tokens look like `tu_v1_<token uuid>.<64 hex chars>`. Only a SHA-256
//! verifier of the secret is stored.

use std::{fmt, str::FromStr};

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::domain::users::records::UserUuid;

/// API token identifier prefix.
pub const API_TOKEN_PREFIX: &str = "tu";

/// Number of secret bytes encoded in a token.
pub const API_TOKEN_SECRET_BYTES: usize = 32;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiTokenVersion {
    V1,
}

impl ApiTokenVersion {
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::V1 => 1,
        }
    }

    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::V1 => "v1",
        }
    }
}

impl TryFrom<i16> for ApiTokenVersion {
    type Error = ApiTokenError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            _ => Err(ApiTokenError::UnsupportedVersion),
        }
    }
}

impl FromStr for ApiTokenVersion {
    type Err = ApiTokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "v1" => Ok(Self::V1),
            _ => Err(ApiTokenError::UnsupportedVersion),
        }
    }
}

/// Raw token secret. Zeroed on drop and never printed.
#[derive(Clone)]
pub struct ApiTokenSecret {
    bytes: [u8; API_TOKEN_SECRET_BYTES],
}

impl ApiTokenSecret {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; API_TOKEN_SECRET_BYTES]) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; API_TOKEN_SECRET_BYTES] {
        &self.bytes
    }

    fn to_hex(&self) -> String {
        let mut encoded = String::with_capacity(API_TOKEN_SECRET_BYTES * 2);

        for byte in &self.bytes {
            for nibble in [byte >> 4, byte & 0x0f] {
                if let Some(digit) = HEX_DIGITS.get(usize::from(nibble)) {
                    encoded.push(char::from(*digit));
                }
            }
        }

        encoded
    }
}

impl fmt::Debug for ApiTokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiTokenSecret(**redacted**)")
    }
}

impl Drop for ApiTokenSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

#[derive(Debug, Clone)]
pub struct ParsedApiToken {
    pub token_uuid: Uuid,
    pub version: ApiTokenVersion,
    pub secret: ApiTokenSecret,
}

#[derive(Debug, Error)]
pub enum ApiTokenError {
    #[error("api token format is invalid")]
    InvalidFormat,

    #[error("api token uses an unsupported version")]
    UnsupportedVersion,

    #[error("api token secret encoding is invalid")]
    InvalidSecretEncoding,
}

#[must_use]
pub fn generate_api_token_secret() -> ApiTokenSecret {
    let mut secret = [0_u8; API_TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    ApiTokenSecret::from_bytes(secret)
}

#[must_use]
pub fn format_api_token(
    token_uuid: Uuid,
    version: ApiTokenVersion,
    secret: &ApiTokenSecret,
) -> String {
    format!(
        "{API_TOKEN_PREFIX}_{}_{}.{}",
        version.segment(),
        token_uuid.simple(),
        secret.to_hex()
    )
}

/// Split a bearer token into its id, version and secret.
///
/// # Errors
///
/// Returns an error for anything that is not a well-formed token.
pub fn parse_api_token(token: &str) -> Result<ParsedApiToken, ApiTokenError> {
    let (identifier, secret_hex) = token.split_once('.').ok_or(ApiTokenError::InvalidFormat)?;

    let mut segments = identifier.splitn(3, '_');

    let (Some(API_TOKEN_PREFIX), Some(version), Some(token_uuid)) =
        (segments.next(), segments.next(), segments.next())
    else {
        return Err(ApiTokenError::InvalidFormat);
    };

    let version = ApiTokenVersion::from_str(version)?;
    let token_uuid = Uuid::try_parse(token_uuid)
        .ok()
        .ok_or(ApiTokenError::InvalidFormat)?;
    let secret = decode_secret_hex(secret_hex).ok_or(ApiTokenError::InvalidSecretEncoding)?;

    Ok(ParsedApiToken {
        token_uuid,
        version,
        secret: ApiTokenSecret::from_bytes(secret),
    })
}

/// Canonical verifier input: `{token_uuid}:{version}:{user_uuid}:{secret_hex}`.
#[must_use]
pub fn build_verifier_input(
    token_uuid: &Uuid,
    version: ApiTokenVersion,
    user: UserUuid,
    secret: &ApiTokenSecret,
) -> Vec<u8> {
    format!(
        "{}:{}:{}:{}",
        token_uuid.simple(),
        version.as_i16(),
        user.into_uuid().simple(),
        secret.to_hex(),
    )
    .into_bytes()
}

/// Lowercase hex SHA-256 of the verifier input.
#[must_use]
pub fn hash_verifier_input(input: &[u8]) -> String {
    format!("{:x}", Sha256::digest(input))
}

/// Compare a computed verifier against the stored one without early exit.
#[must_use]
pub fn verifier_matches(computed: &str, stored: &str) -> bool {
    computed.len() == stored.len()
        && computed
            .bytes()
            .zip(stored.bytes())
            .fold(0_u8, |diff, (a, b)| diff | (a ^ b))
            == 0
}

fn decode_secret_hex(secret_hex: &str) -> Option<[u8; API_TOKEN_SECRET_BYTES]> {
    if secret_hex.len() != API_TOKEN_SECRET_BYTES * 2 {
        return None;
    }

    let mut secret = [0_u8; API_TOKEN_SECRET_BYTES];

    for (byte, pair) in secret.iter_mut().zip(secret_hex.as_bytes().chunks_exact(2)) {
        let [hi, lo] = pair else {
            return None;
        };

        *byte = (decode_hex_nibble(*hi)? << 4) | decode_hex_nibble(*lo)?;
    }

    Some(secret)
}

fn decode_hex_nibble(value: u8) -> Option<u8> {
    match value {
        b'0'..=b'9' => Some(value - b'0'),
        b'a'..=b'f' => Some(value - b'a' + 10),
        b'A'..=b'F' => Some(value - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn formatted_token_parses_back() -> TestResult {
        let token_uuid = Uuid::now_v7();
        let secret = ApiTokenSecret::from_bytes([0xAB; API_TOKEN_SECRET_BYTES]);
        let token = format_api_token(token_uuid, ApiTokenVersion::V1, &secret);

        assert!(token.starts_with("tu_v1_"));

        let parsed = parse_api_token(&token)?;

        assert_eq!(parsed.token_uuid, token_uuid);
        assert_eq!(parsed.version, ApiTokenVersion::V1);
        assert_eq!(parsed.secret.as_bytes(), secret.as_bytes());

        Ok(())
    }

    #[test]
    fn parse_rejects_foreign_prefix_and_version() {
        let secret = "ab".repeat(API_TOKEN_SECRET_BYTES);

        assert!(matches!(
            parse_api_token(&format!("lt_v1_{}.{secret}", Uuid::nil().simple())),
            Err(ApiTokenError::InvalidFormat)
        ));
        assert!(matches!(
            parse_api_token(&format!("tu_v9_{}.{secret}", Uuid::nil().simple())),
            Err(ApiTokenError::UnsupportedVersion)
        ));
        assert!(matches!(
            parse_api_token("tu_v1_not-a-uuid"),
            Err(ApiTokenError::InvalidFormat)
        ));
    }

    #[test]
    fn parse_rejects_bad_secret_encoding() {
        let uuid = Uuid::nil().simple();

        for secret in ["abc".to_string(), "zz".repeat(API_TOKEN_SECRET_BYTES)] {
            assert!(
                matches!(
                    parse_api_token(&format!("tu_v1_{uuid}.{secret}")),
                    Err(ApiTokenError::InvalidSecretEncoding)
                ),
                "secret {secret:?} should be rejected"
            );
        }
    }

    #[test]
    fn verifier_is_bound_to_the_user() {
        let token_uuid = Uuid::nil();
        let secret = ApiTokenSecret::from_bytes([0xCD; API_TOKEN_SECRET_BYTES]);
        let owner = UserUuid::new();

        let expected = hash_verifier_input(&build_verifier_input(
            &token_uuid,
            ApiTokenVersion::V1,
            owner,
            &secret,
        ));
        let same = hash_verifier_input(&build_verifier_input(
            &token_uuid,
            ApiTokenVersion::V1,
            owner,
            &secret,
        ));
        let other = hash_verifier_input(&build_verifier_input(
            &token_uuid,
            ApiTokenVersion::V1,
            UserUuid::new(),
            &secret,
        ));

        assert_eq!(expected.len(), 64, "hex sha-256");
        assert!(verifier_matches(&same, &expected));
        assert!(!verifier_matches(&other, &expected));
    }

    #[test]
    fn secret_debug_is_redacted() {
        let secret = ApiTokenSecret::from_bytes([0x11; API_TOKEN_SECRET_BYTES]);

        assert_eq!(format!("{secret:?}"), "ApiTokenSecret(**redacted**)");
    }
}
