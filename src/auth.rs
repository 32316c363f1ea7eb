use std::ops::Deref;

use actix_web::{body, dev, http::{self, header::ContentType, StatusCode}, web, FromRequest, HttpRequest, HttpResponse};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, DecodingKey, EncodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::entity::sea_orm_active_enums::RoleType;

/// Verifies the tokens handed out by the identity provider
pub struct Authority {
    jwt_key: (EncodingKey, DecodingKey),
}

impl Authority {
    pub fn new(jwt_key: &[u8]) -> Self {
        Self {
            jwt_key: (EncodingKey::from_secret(jwt_key), DecodingKey::from_secret(jwt_key))
        }
    }

    pub fn authorize(&self, token: impl AsRef<str>) -> Result<Identity, AuthError> {
        let payload = decode::<Claims<Identity>>(token.as_ref(), &self.jwt_key.1, &Validation::default())?;

        Ok(payload.claims.data)
    }
}

/// The authenticated caller, trusted as-is by the payroll engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
    pub role: RoleType,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == RoleType::Admin
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims<T> {
    exp: i64,
    data: T,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authority error")]
    AuthorityError(#[from] jsonwebtoken::errors::Error),
}

impl actix_web::error::ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse<body::BoxBody> {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> http::StatusCode {
        match self {
            AuthError::AuthorityError(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl FromRequest for Identity {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // Grabs the value after space ( ) from `Authorization` header
            // Example: JWT sometoken
            //              ^ grabs this value
            let Some(Ok(Some((_, token)))) = req.headers()
                .get("Authorization")
                .map(|v|
                    v.to_str()
                        .map(|str| str.split_once(" "))
                )
            else {
                return Err(actix_web::error::ErrorUnauthorized("unauthorized"))
            };

            let Some(authority) = req.app_data::<web::Data<Authority>>() else {
                return Err(actix_web::error::ErrorInternalServerError("authority is not configured"))
            };
            let identity = authority.authorize(token)?;

            Ok(identity)
        })
    }
}

pub struct Admin(pub Identity);

impl Deref for Admin {
    type Target = Identity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for Admin {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let identity = Identity::from_request(&req, &mut dev::Payload::None).await?;

            if !identity.is_admin() {
                return Err(actix_web::error::ErrorForbidden("forbidden"))
            }

            Ok(Self(identity))
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use actix_web::{body::MessageBody, get, test, web, App, Responder};
    use chrono::{Duration, Local};
    use jsonwebtoken::{encode, Header};

    use super::*;

    impl Authority {
        /// Issue a token for specified identity with 1 week of expiration time, the way the identity provider does
        pub(crate) fn issue_for(&self, identity: &Identity) -> Result<String, AuthError> {
            let claims = Claims {
                exp: (Local::now() + Duration::weeks(1)).timestamp(),
                data: identity,
            };

            Ok(encode(&Header::default(), &claims, &self.jwt_key.0)?)
        }
    }

    pub(crate) fn identity(role: RoleType) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            username: "Bob".to_string(),
            role,
        }
    }

    #[actix_web::test]
    async fn test_authority() {
        let authority = Authority::new(b"secret");

        let bob = identity(RoleType::Employee);

        let token = authority.issue_for(&bob).unwrap();

        let authorized = authority.authorize(token).expect("Unable to authorize user from token");
        assert_eq!(bob, authorized);
    }

    #[actix_web::test]
    async fn test_authority_rejects_foreign_key() {
        let token = Authority::new(b"secret").issue_for(&identity(RoleType::Admin)).unwrap();

        assert!(Authority::new(b"another secret").authorize(token).is_err());
    }

    #[actix_web::test]
    async fn test_identity_roles() {
        assert!(identity(RoleType::Admin).is_admin());
        assert!(!identity(RoleType::Employee).is_admin());

        let authority = Authority::new(b"secret");
        let admin = identity(RoleType::Admin);

        let authorized = authority.authorize(authority.issue_for(&admin).unwrap()).unwrap();
        assert!(authorized.is_admin());
    }

    #[actix_web::test]
    async fn test_extractor() {
        let secret = b"secret";

        #[get("/")]
        async fn test_handler(identity: Identity) -> impl Responder {
            identity.id.to_string()
        }

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .service(test_handler)
        ).await;

        {
            let forbidden_req = test::TestRequest::default()
                .uri("/")
                .insert_header(("Authorization", "JWT wrong"))
                .to_request();

            let response = test::call_service(&app, forbidden_req).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }

        {
            let unauthorized_req = test::TestRequest::default()
                .uri("/")
                .to_request();

            let response = test::call_service(&app, unauthorized_req).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        {
            let bob = identity(RoleType::Employee);

            let token = Authority::new(secret).issue_for(&bob).unwrap();

            let authorized_req = test::TestRequest::default()
                .insert_header(("Authorization", format!("JWT {token}")))
                .to_request();

            let response = test::call_service(&app, authorized_req).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.into_body().try_into_bytes().unwrap(), bob.id.to_string().as_bytes());
        }
    }

    #[actix_web::test]
    async fn test_admin_extractor() {
        let secret = b"secret";

        #[get("/")]
        async fn test_handler(admin: Admin) -> impl Responder {
            assert_eq!(admin.role, RoleType::Admin);

            ""
        }

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .service(test_handler)
        ).await;

        {
            let token = Authority::new(secret).issue_for(&identity(RoleType::Admin)).unwrap();

            let success_req = test::TestRequest::default()
                .insert_header(("Authorization", format!("JWT {token}")))
                .to_request();

            let response = test::call_service(&app, success_req).await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        {
            let token = Authority::new(secret).issue_for(&identity(RoleType::Employee)).unwrap();

            let forbidden_req = test::TestRequest::default()
                .insert_header(("Authorization", format!("JWT {token}")))
                .to_request();

            let response = test::call_service(&app, forbidden_req).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }
    }
}
