use crate::models::{AuthState, AuthUser};
use crate::utils::{AppError, WidgetConfig};
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use std::rc::Rc;

/// Claims issued by the identity provider
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        AuthUser {
            user_id: Some(claims.sub).filter(|id| !id.is_empty()),
            first_name: claims.first_name,
            last_name: claims.last_name,
            username: claims.username,
            email: claims.email,
        }
    }
}

/// HS256 verification against the provider's shared secret
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str, issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        if let Some(iss) = issuer {
            validation.set_issuer(&[iss]);
        }

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn from_config(config: &WidgetConfig) -> Self {
        Self::new(&config.jwt_secret, config.jwt_issuer.as_deref())
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
    }

    /// Auth state for an `Authorization` header value; anything unusable
    /// means "not authenticated"
    pub fn auth_state(&self, header: Option<&str>) -> AuthState {
        let token = match header.and_then(|h| h.strip_prefix("Bearer ")) {
            Some(token) => token.trim(),
            None => return AuthState::anonymous(),
        };

        match self.verify(token) {
            Ok(claims) => AuthState::authenticated(claims.into()),
            Err(e) => {
                log::warn!("🔒 {}", e);
                AuthState::anonymous()
            }
        }
    }
}

/// Resolves the caller's identity into an `AuthState` request extension.
/// Never rejects; handlers decide what an anonymous caller may do.
pub struct AuthMiddleware {
    verifier: Rc<TokenVerifier>,
}

impl AuthMiddleware {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self {
            verifier: Rc::new(verifier),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            verifier: self.verifier.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    verifier: Rc<TokenVerifier>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let header = req
            .headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let state = self.verifier.auth_state(header);
        req.extensions_mut().insert(state);

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res)
        })
    }
}

/// Auth state attached by `AuthMiddleware`, anonymous when absent
pub fn auth_state(req: &HttpRequest) -> AuthState {
    req.extensions()
        .get::<AuthState>()
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
pub mod test_tokens {
    use super::Claims;
    use jsonwebtoken::{encode, EncodingKey, Header};

    pub const SECRET: &str = "test-secret";

    pub fn token_for(user_id: &str) -> String {
        token_with_issuer(user_id, None)
    }

    pub fn token_with_issuer(user_id: &str, issuer: Option<&str>) -> String {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
            iss: issuer.map(str::to_string),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes()))
            .unwrap()
    }
}
