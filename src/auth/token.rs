use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{AuthError, Result};
use crate::config::AppConfig;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(account_id: Uuid, expires_in: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: account_id,
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }
}

/// Issues and verifies HS256 session tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: Duration,
}

impl TokenService {
    pub fn new(secret: &str, expires_in: Duration) -> Result<Self> {
        if secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expires_in,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            &config.security.jwt_secret,
            Duration::days(config.security.jwt_expiry_days),
        )
    }

    pub fn issue(&self, account_id: Uuid) -> Result<String> {
        self.issue_with_expiry(account_id, self.expires_in)
    }

    fn issue_with_expiry(&self, account_id: Uuid, expires_in: Duration) -> Result<String> {
        encode(&Header::default(), &Claims::new(account_id, expires_in), &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Decode a token and return the account id it was issued for.
    /// Expired, tampered and malformed tokens all fail with `InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<Uuid> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims.sub)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(secret, Duration::days(30)).unwrap()
    }

    #[test]
    fn test_issue_then_verify_round_trips_account() {
        let tokens = service("test_secret");
        let account_id = Uuid::new_v4();

        let token = tokens.issue(account_id).unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), account_id);
    }

    #[test]
    fn test_expired_token_fails() {
        let tokens = service("test_secret");
        let token = tokens
            .issue_with_expiry(Uuid::new_v4(), Duration::seconds(-60))
            .unwrap();

        assert!(matches!(tokens.verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let token = service("correct_secret").issue(Uuid::new_v4()).unwrap();
        assert!(service("wrong_secret").verify(&token).is_err());
    }

    #[test]
    fn test_tampered_token_fails() {
        let tokens = service("test_secret");
        let mut token = tokens.issue(Uuid::new_v4()).unwrap();
        token.push('x');

        assert!(tokens.verify(&token).is_err());
        assert!(tokens.verify("not.a.token").is_err());
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            TokenService::new("", Duration::days(1)),
            Err(AuthError::InvalidSecret)
        ));
    }
}
