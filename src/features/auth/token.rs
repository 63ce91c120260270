use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedSeller;

/// Verifies bearer tokens issued by the hosted auth platform.
///
/// Tokens are HS256-signed with a shared secret; issuer, audience,
/// expiry and not-before are all enforced.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(rename = "iss")]
    _iss: String,
    #[serde(rename = "exp")]
    _exp: u64,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.leeway = config.jwt_leeway.as_secs();
        validation.validate_nbf = true;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<AuthenticatedSeller, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;

        let claims = token_data.claims;

        // The subject is the seller's row id in the auth platform
        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Token subject is not a valid id".to_string()))?;

        Ok(AuthenticatedSeller {
            id,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;
    use std::time::Duration;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        email: Option<String>,
        iss: String,
        aud: String,
        iat: u64,
        exp: u64,
    }

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            issuer: "https://auth.example.com".to_string(),
            audience: "sellerdesk".to_string(),
            jwt_leeway: Duration::from_secs(60),
        }
    }

    fn issue_token(config: &AuthConfig, sub: &str) -> String {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let claims = TestClaims {
            sub: sub.to_string(),
            email: Some("seller@example.com".to_string()),
            iss: config.issuer.clone(),
            aud: config.audience.clone(),
            iat: now,
            exp: now + 3600,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_valid_token() {
        let config = test_config();
        let verifier = TokenVerifier::new(&config);
        let seller_id = Uuid::new_v4();

        let token = issue_token(&config, &seller_id.to_string());
        let seller = verifier.verify(&token).unwrap();

        assert_eq!(seller.id, seller_id);
        assert_eq!(seller.email.as_deref(), Some("seller@example.com"));
    }

    #[test]
    fn test_verify_rejects_bad_signature() {
        let config = test_config();
        let verifier = TokenVerifier::new(&config);

        let mut other = test_config();
        other.jwt_secret = "other-secret".to_string();
        let token = issue_token(&other, &Uuid::new_v4().to_string());

        assert!(matches!(
            verifier.verify(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_verify_rejects_non_uuid_subject() {
        let config = test_config();
        let verifier = TokenVerifier::new(&config);

        let token = issue_token(&config, "not-a-uuid");
        assert!(matches!(
            verifier.verify(&token),
            Err(AppError::Unauthorized(_))
        ));
    }
}
