//! Stateless JWT encoding and decoding

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::token::{Claims, Identity};
use crate::errors::{DomainError, TokenError};

use super::config::ensure_hmac;

/// Signs and verifies tokens for one secret
///
/// The codec never consults a store; a token that decodes successfully is
/// only known to be authentic and unexpired.
pub struct TokenCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Creates a codec for a shared secret
    ///
    /// # Returns
    ///
    /// A new `TokenCodec`, or `DomainError::Validation` for a non-HMAC algorithm
    pub fn new(secret: &[u8], algorithm: Algorithm) -> Result<Self, DomainError> {
        ensure_hmac(algorithm)?;

        let mut validation = Validation::new(algorithm);
        // Expiry is exact: a token is dead from the second `exp` is reached.
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Encodes identity claims into a signed token valid for `ttl`
    ///
    /// # Arguments
    ///
    /// * `identity` - Subject and username copied into the payload
    /// * `jti` - Token identifier, set for refresh tokens only
    /// * `ttl` - Lifetime counted from now
    pub fn encode(
        &self,
        identity: &Identity,
        jti: Option<&str>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        self.encode_at(identity, jti, Utc::now(), ttl)
    }

    /// Same as [`TokenCodec::encode`] with an explicit issue time
    pub fn encode_at(
        &self,
        identity: &Identity,
        jti: Option<&str>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let iat = issued_at.timestamp();
        let claims = Claims {
            sub: identity.sub.clone(),
            username: identity.username.clone(),
            iat,
            exp: iat + ttl.num_seconds(),
            jti: jti.map(str::to_owned),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|_| TokenError::TokenGenerationFailed)
    }

    /// Verifies a token and returns its claims
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - Signature, algorithm and expiry all check out
    /// * `Err(TokenError::TokenExpired)` - Authentic but past `exp`
    /// * `Err(TokenError::TokenInvalid)` - Anything else
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                _ => TokenError::TokenInvalid,
            })
    }
}
