use crate::{routes::message_response, server::ServerData};

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use coursehub_auth::Identity;
use coursehub_common::{CourseResponse, Fields, ValidationError, COURSE_SCHEMA};
use coursehub_db::DatabaseError;
use log::error;
use paperclip::actix::{api_v2_errors, api_v2_operation, web, Apiv2Schema, CreatedJson};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Apiv2Schema, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourse {
    course_title: Option<String>,
    category: Option<String>,
}

impl Fields for CreateCourse {
    fn field(&self, key: &str) -> Option<&str> {
        match key {
            "courseTitle" => self.course_title.as_deref(),
            "category" => self.category.as_deref(),
            _ => None,
        }
    }
}

#[derive(Apiv2Schema, Debug, Serialize)]
pub struct CreateCourseResponse {
    course: CourseResponse,
    message: String,
}

/// Creates an unpublished course owned by the requester.
#[api_v2_operation(tags(Courses))]
pub async fn create_course(
    data: web::Data<ServerData>,
    identity: Identity,
    body: web::Json<CreateCourse>,
) -> Result<CreatedJson<CreateCourseResponse>, CreateCourseError> {
    let body = body.into_inner();
    COURSE_SCHEMA.validate(&body)?;
    let course = data
        .create_course(
            *identity.get_user_id(),
            body.course_title.unwrap_or_default(),
            body.category.unwrap_or_default(),
        )
        .await?;
    Ok(CreatedJson(CreateCourseResponse {
        course,
        message: "Course created successfully.".to_string(),
    }))
}

#[api_v2_errors(code = 400, code = 401, code = 500)]
#[derive(Debug, Error)]
pub enum CreateCourseError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("[CreateCourseError::Database]: {0}")]
    Database(#[from] DatabaseError),
}

impl ResponseError for CreateCourseError {
    fn status_code(&self) -> StatusCode {
        match *self {
            CreateCourseError::Validation(_) => StatusCode::BAD_REQUEST,
            CreateCourseError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            CreateCourseError::Validation(err) => {
                message_response(self.status_code(), err.to_string())
            }
            CreateCourseError::Database(_) => {
                error!("{}", self);
                message_response(self.status_code(), "Failed to create course.")
            }
        }
    }
}
