pub mod courses;

use actix_web::{
    dev::Payload,
    error::{InternalError, ResponseError},
    http::StatusCode,
    web, FromRequest, HttpRequest, HttpResponse,
};
use futures::future::{ready, Ready};
use paperclip::actix::{Apiv2Schema, OperationModifier};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

const JSON_LIMIT: usize = 1 << 20;

/// Body of every message-only response, errors included.
#[derive(Apiv2Schema, Debug, Serialize)]
pub struct MessageResponse {
    message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

pub fn message_response(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(MessageResponse::new(message))
}

/// Malformed JSON bodies are answered with a 400 and the parser's message.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| {
            let res = message_response(StatusCode::BAD_REQUEST, err.to_string());
            InternalError::from_response(err, res).into()
        })
}

/// Query string extractor that understands nested keys such as
/// `categories[]=a&categories[]=b`.
pub struct QsQuery<T>(T);

impl<T> QsQuery<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for QsQuery<T>
where
    T: DeserializeOwned,
{
    type Error = QueryError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            serde_qs::Config::new(5, false)
                .deserialize_str::<T>(req.query_string())
                .map(QsQuery)
                .map_err(QueryError),
        )
    }
}

impl<T> paperclip::v2::schema::Apiv2Schema for QsQuery<T> {}

impl<T> OperationModifier for QsQuery<T> {}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct QueryError(serde_qs::Error);

impl ResponseError for QueryError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        message_response(self.status_code(), self.to_string())
    }
}
