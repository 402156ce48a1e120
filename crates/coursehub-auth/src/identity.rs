use actix_web::{
    dev::{Payload, ServiceRequest},
    error::ResponseError,
    http::StatusCode,
    FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use bson::oid::ObjectId;
use futures::future::{ready, Ready};
use paperclip::actix::OperationModifier;
use serde_json::json;
use thiserror::Error;

/// The authenticated requester, attached to the request by the identity
/// middleware before any handler runs.
#[derive(Clone, Debug, PartialEq)]
pub struct Identity {
    user_id: ObjectId,
}

impl Identity {
    pub fn new(user_id: ObjectId) -> Self {
        Identity { user_id }
    }

    pub fn get_user_id(&self) -> &ObjectId {
        &self.user_id
    }

    pub fn set_identity(user_id: ObjectId, req: &ServiceRequest) {
        req.extensions_mut().insert(Identity::new(user_id));
    }
}

impl FromRequest for Identity {
    type Error = IdentityError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Identity>()
                .cloned()
                .ok_or(IdentityError::Unauthenticated),
        )
    }
}

impl paperclip::v2::schema::Apiv2Schema for Identity {}

impl OperationModifier for Identity {}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("User not authenticated.")]
    Unauthenticated,
}

impl ResponseError for IdentityError {
    fn status_code(&self) -> StatusCode {
        match *self {
            IdentityError::Unauthenticated => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "message": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, test::TestRequest};
    use serde_json::Value;

    #[actix_web::test]
    async fn extracts_identity_from_extensions() {
        let user_id = ObjectId::new();
        let req = TestRequest::default().to_srv_request();
        Identity::set_identity(user_id, &req);
        let (req, mut payload) = req.into_parts();

        let identity = Identity::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(identity.get_user_id(), &user_id);
    }

    #[actix_web::test]
    async fn missing_identity_is_unauthorized() {
        let (req, mut payload) = TestRequest::default().to_http_parts();

        let err = Identity::from_request(&req, &mut payload).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn unauthorized_body_only_carries_message() {
        let res = IdentityError::Unauthenticated.error_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body = to_bytes(res.into_body()).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "message": "User not authenticated." }));
    }
}
