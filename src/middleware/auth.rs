use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::middleware::error_handling::{AppError, Result};
use crate::models::user::UserRole;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    /// Reject callers whose account role does not match the route's role.
    pub fn require_role(&self, role: UserRole) -> Result<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden("Access denied".to_string()))
        }
    }
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
        }
    }

    pub fn generate_token(
        &self,
        user_id: Uuid,
        email: &str,
        name: &str,
        role: UserRole,
    ) -> std::result::Result<String, jsonwebtoken::errors::Error> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as usize)
            .unwrap_or(0);

        let claims = Claims {
            sub: user_id.to_string(),
            user_id,
            email: email.to_string(),
            name: name.to_string(),
            role,
            exp: now + 24 * 60 * 60,
            iat: now,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    pub fn validate_token(&self, token: &str) -> std::result::Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
    }

    pub fn extract_token_from_header(auth_header: &str) -> Option<&str> {
        auth_header.strip_prefix("Bearer ")
    }
}

pub async fn auth_middleware(
    State(config): State<AppConfig>,
    mut request: Request,
    next: Next,
) -> std::result::Result<Response, StatusCode> {
    let jwt_service = JwtService::new(&config.jwt_secret);

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(JwtService::extract_token_from_header);

    if let Some(token) = token {
        match jwt_service.validate_token(token) {
            Ok(claims) => {
                request.extensions_mut().insert(claims);
                return Ok(next.run(request).await);
            }
            Err(_) => return Err(StatusCode::UNAUTHORIZED),
        }
    }

    Err(StatusCode::UNAUTHORIZED)
}
