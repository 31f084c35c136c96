//! JWT-backed identity extracted from the session cookie.
//!
//! The external auth service issues the token at sign-in; this application
//! only validates it and reads the claims.

use std::future::{Ready, ready};

use actix_identity::Identity;
use actix_web::error::ErrorUnauthorized;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::models::config::ServerConfig;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    /// Subject, the user's email.
    pub sub: String,
    /// Local `users.id` of the signed-in user.
    pub user_id: i32,
    pub email: String,
    pub name: String,
    /// Service roles, e.g. `crm`, `crm_admin`, plus the application role.
    pub roles: Vec<String>,
    /// Expiry as a unix timestamp.
    pub exp: usize,
}

impl AuthenticatedUser {
    /// Decode and validate a token with the shared secret.
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let data = decode::<AuthenticatedUser>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }

    /// Sign the claims into a token. Used by tests and local tooling; the
    /// production token comes from the auth service.
    pub fn to_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let identity = Identity::from_request(req, payload).into_inner();
        let config = req.app_data::<web::Data<ServerConfig>>();

        let user = (|| {
            let identity = identity.ok()?;
            let token = identity.id().ok()?;
            let config = config?;
            AuthenticatedUser::from_token(&token, &config.secret).ok()
        })();

        match user {
            Some(user) => ready(Ok(user)),
            None => ready(Err(ErrorUnauthorized("authentication required"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "rep@example.com".to_string(),
            user_id: 1,
            email: "rep@example.com".to_string(),
            name: "Rep".to_string(),
            roles: vec!["crm".to_string(), "user".to_string()],
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        }
    }

    #[test]
    fn token_round_trip() {
        let user = sample_user();
        let token = user.to_token("0123456789abcdef").unwrap();
        let decoded = AuthenticatedUser::from_token(&token, "0123456789abcdef").unwrap();
        assert_eq!(decoded, user);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sample_user().to_token("0123456789abcdef").unwrap();
        assert!(AuthenticatedUser::from_token(&token, "another-secret").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut user = sample_user();
        user.exp = (chrono::Utc::now().timestamp() - 3600) as usize;
        let token = user.to_token("0123456789abcdef").unwrap();
        assert!(AuthenticatedUser::from_token(&token, "0123456789abcdef").is_err());
    }
}
