use crate::config::Config;
use crate::model::role::Role;
use crate::models::Claims;
use actix_web::{dev::Payload, error::ErrorUnauthorized, web::Data, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, DecodingKey, Validation};

#[derive(Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            Some(t) => t,
            None => return ready(Err(ErrorUnauthorized("Missing token"))),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(actix_web::error::ErrorInternalServerError(
                    "Config missing",
                )))
            }
        };

        let data = match decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(d) => d,
            Err(_) => return ready(Err(ErrorUnauthorized("Invalid token"))),
        };

        let role = match Role::from_id(data.claims.role) {
            Some(r) => r,
            None => return ready(Err(ErrorUnauthorized("Invalid role"))),
        };

        ready(Ok(AuthUser {
            user_id: data.claims.user_id,
            email: data.claims.sub,
            name: data.claims.name,
            role,
        }))
    }
}

impl AuthUser {
    /// Approve/reject and the all-requests listing are director-only.
    pub fn require_director(&self) -> actix_web::Result<()> {
        if self.role == Role::Director {
            Ok(())
        } else {
            Err(actix_web::error::ErrorForbidden("Director only"))
        }
    }

    pub fn is_staff(&self) -> bool {
        self.role == Role::Staff
    }
}
