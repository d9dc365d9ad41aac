//! Tests for the token codec

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::token::Identity;
use crate::errors::{DomainError, TokenError};
use crate::services::auth::TokenCodec;

const SECRET: &[u8] = b"codec-test-secret";

fn codec() -> TokenCodec {
    TokenCodec::new(SECRET, Algorithm::HS256).unwrap()
}

fn identity() -> Identity {
    Identity::new(Uuid::new_v4().to_string(), "alice")
}

/// Replaces the character at `index` with a different base64url character
fn tamper(token: &str, index: usize) -> String {
    let mut chars: Vec<char> = token.chars().collect();
    chars[index] = if chars[index] == 'A' { 'B' } else { 'A' };
    chars.into_iter().collect()
}

#[test]
fn test_encode_decode_preserves_claims() {
    let codec = codec();
    let identity = identity();
    let issued_at = Utc::now();

    let token = codec
        .encode_at(&identity, Some("jti-1"), issued_at, Duration::minutes(15))
        .unwrap();
    let claims = codec.decode(&token).unwrap();

    assert_eq!(claims.sub, identity.sub);
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.iat, issued_at.timestamp());
    assert_eq!(claims.exp, issued_at.timestamp() + 900);
    assert_eq!(claims.jti.as_deref(), Some("jti-1"));
}

#[test]
fn test_access_token_has_no_jti() {
    let codec = codec();
    let token = codec.encode(&identity(), None, Duration::minutes(15)).unwrap();

    assert_eq!(codec.decode(&token).unwrap().jti, None);
}

#[test]
fn test_valid_before_expiry_and_expired_after() {
    let codec = codec();
    let identity = identity();

    let ttl = Duration::minutes(15);
    let now = Utc::now();

    // exp lands one second after now
    let live = codec
        .encode_at(&identity, None, now - ttl + Duration::seconds(1), ttl)
        .unwrap();
    let claims = codec.decode(&live).unwrap();
    assert_eq!(claims.exp, now.timestamp() + 1);

    // exp lands one second before now
    let dead = codec
        .encode_at(&identity, None, now - ttl - Duration::seconds(1), ttl)
        .unwrap();
    assert_eq!(codec.decode(&dead), Err(TokenError::TokenExpired));
}

#[test]
fn test_token_issued_long_ago_is_expired() {
    let codec = codec();
    let issued_at = Utc::now() - Duration::hours(2);

    let token = codec
        .encode_at(&identity(), None, issued_at, Duration::hours(1))
        .unwrap();

    assert_eq!(codec.decode(&token), Err(TokenError::TokenExpired));
}

#[test]
fn test_any_altered_character_is_invalid() {
    let codec = codec();
    let token = codec.encode(&identity(), Some("jti"), Duration::minutes(5)).unwrap();

    for (index, c) in token.char_indices() {
        if c == '.' {
            continue;
        }
        let altered = tamper(&token, index);
        assert_eq!(
            codec.decode(&altered),
            Err(TokenError::TokenInvalid),
            "altering position {} was accepted",
            index
        );
    }
}

#[test]
fn test_altered_expired_token_is_invalid_not_expired() {
    let codec = codec();
    let token = codec.encode(&identity(), None, Duration::seconds(-60)).unwrap();
    let signature_start = token.rfind('.').unwrap() + 1;

    let altered = tamper(&token, signature_start);
    assert_eq!(codec.decode(&altered), Err(TokenError::TokenInvalid));
}

#[test]
fn test_malformed_input_is_invalid() {
    let codec = codec();

    for input in ["", "not-a-token", "a.b", "a.b.c", "...."] {
        assert_eq!(codec.decode(input), Err(TokenError::TokenInvalid), "{:?}", input);
    }
}

#[test]
fn test_other_secret_is_invalid() {
    let access = TokenCodec::new(b"access-secret", Algorithm::HS256).unwrap();
    let refresh = TokenCodec::new(b"refresh-secret", Algorithm::HS256).unwrap();

    let access_token = access.encode(&identity(), None, Duration::minutes(5)).unwrap();
    let refresh_token = refresh.encode(&identity(), Some("jti"), Duration::days(1)).unwrap();

    assert_eq!(refresh.decode(&access_token), Err(TokenError::TokenInvalid));
    assert_eq!(access.decode(&refresh_token), Err(TokenError::TokenInvalid));
}

#[test]
fn test_expired_token_under_other_secret_is_invalid() {
    let access = TokenCodec::new(b"access-secret", Algorithm::HS256).unwrap();
    let refresh = TokenCodec::new(b"refresh-secret", Algorithm::HS256).unwrap();

    let expired_access = access.encode(&identity(), None, Duration::seconds(-5)).unwrap();
    assert_eq!(refresh.decode(&expired_access), Err(TokenError::TokenInvalid));
}

#[test]
fn test_algorithm_mismatch_is_invalid() {
    let hs512 = TokenCodec::new(SECRET, Algorithm::HS512).unwrap();
    let token = hs512.encode(&identity(), None, Duration::minutes(5)).unwrap();

    assert_eq!(codec().decode(&token), Err(TokenError::TokenInvalid));
    assert!(hs512.decode(&token).is_ok());
}

#[test]
fn test_missing_claims_are_invalid() {
    #[derive(Serialize)]
    struct Partial {
        sub: String,
        exp: i64,
    }

    let token = encode(
        &Header::new(Algorithm::HS256),
        &Partial {
            sub: Uuid::new_v4().to_string(),
            exp: Utc::now().timestamp() + 300,
        },
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap();

    assert_eq!(codec().decode(&token), Err(TokenError::TokenInvalid));
}

#[test]
fn test_rejects_asymmetric_algorithms() {
    for algorithm in [Algorithm::RS256, Algorithm::ES256, Algorithm::EdDSA] {
        let result = TokenCodec::new(SECRET, algorithm);
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }
}
