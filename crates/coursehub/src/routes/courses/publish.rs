use crate::{
    routes::{message_response, MessageResponse},
    server::ServerData,
};

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use bson::oid::ObjectId;
use coursehub_db::DatabaseError;
use log::error;
use paperclip::actix::{api_v2_errors, api_v2_operation, web, Apiv2Schema};
use serde::Deserialize;
use thiserror::Error;

#[derive(Apiv2Schema, Debug, Deserialize)]
pub struct PublishCourse {
    /// Only the literal `true` publishes, any other value unpublishes.
    publish: Option<String>,
}

impl PublishCourse {
    fn is_publish(&self) -> bool {
        self.publish.as_deref() == Some("true")
    }
}

#[api_v2_operation(tags(Courses))]
pub async fn toggle_publish_course(
    data: web::Data<ServerData>,
    path: web::Path<String>,
    query: web::Query<PublishCourse>,
) -> Result<web::Json<MessageResponse>, TogglePublishError> {
    let course_id = ObjectId::parse_str(path.into_inner())?;
    let published = data
        .toggle_publish_course(course_id, query.is_publish())
        .await?;
    let status = if published { "Published" } else { "Unpublished" };
    Ok(web::Json(MessageResponse::new(format!(
        "Course is {}.",
        status
    ))))
}

#[api_v2_errors(code = 400, code = 404, code = 500)]
#[derive(Debug, Error)]
pub enum TogglePublishError {
    #[error("[TogglePublishError::CourseId]: {0}")]
    CourseId(#[from] bson::oid::Error),
    #[error("[TogglePublishError::CourseNotFound]: {0}")]
    CourseNotFound(ObjectId),
    #[error("[TogglePublishError::Database]: {0}")]
    Database(#[from] DatabaseError),
}

impl ResponseError for TogglePublishError {
    fn status_code(&self) -> StatusCode {
        match *self {
            TogglePublishError::CourseId(_) => StatusCode::BAD_REQUEST,
            TogglePublishError::CourseNotFound(_) => StatusCode::NOT_FOUND,
            TogglePublishError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match *self {
            TogglePublishError::CourseId(_) => "Invalid course id.",
            TogglePublishError::CourseNotFound(_) => "Course not found.",
            TogglePublishError::Database(_) => {
                error!("{}", self);
                "Failed to toggle publish status."
            }
        };
        message_response(self.status_code(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_true_publishes() {
        let publish = |value: Option<&str>| PublishCourse {
            publish: value.map(String::from),
        };

        assert!(publish(Some("true")).is_publish());
        assert!(!publish(Some("false")).is_publish());
        assert!(!publish(Some("TRUE")).is_publish());
        assert!(!publish(None).is_publish());
    }
}
