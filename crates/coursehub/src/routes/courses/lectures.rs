use crate::{routes::message_response, server::ServerData};

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use bson::oid::ObjectId;
use coursehub_common::{Fields, LectureResponse, ValidationError, LECTURE_SCHEMA};
use coursehub_db::DatabaseError;
use log::error;
use paperclip::actix::{api_v2_errors, api_v2_operation, web, Apiv2Schema, CreatedJson};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Apiv2Schema, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLecture {
    lecture_title: Option<String>,
}

impl Fields for CreateLecture {
    fn field(&self, key: &str) -> Option<&str> {
        match key {
            "lectureTitle" => self.lecture_title.as_deref(),
            _ => None,
        }
    }
}

#[derive(Apiv2Schema, Debug, Serialize)]
pub struct CreateLectureResponse {
    lecture: LectureResponse,
    message: String,
}

#[derive(Apiv2Schema, Debug, Serialize)]
pub struct LecturesResponse {
    lectures: Vec<LectureResponse>,
}

/// Adds a lecture to the end of the course's lecture list.
#[api_v2_operation(tags(Lectures))]
pub async fn create_lecture(
    data: web::Data<ServerData>,
    path: web::Path<String>,
    body: web::Json<CreateLecture>,
) -> Result<CreatedJson<CreateLectureResponse>, LectureError> {
    let course_id = ObjectId::parse_str(path.into_inner())?;
    let body = body.into_inner();
    LECTURE_SCHEMA.validate(&body)?;
    let lecture = data
        .create_lecture(course_id, body.lecture_title.unwrap_or_default())
        .await?;
    Ok(CreatedJson(CreateLectureResponse {
        lecture,
        message: "Lecture created successfully.".to_string(),
    }))
}

#[api_v2_operation(tags(Lectures))]
pub async fn get_course_lectures(
    data: web::Data<ServerData>,
    path: web::Path<String>,
) -> Result<web::Json<LecturesResponse>, LectureError> {
    let course_id = ObjectId::parse_str(path.into_inner())?;
    let lectures = data.get_course_lectures(course_id).await?;
    Ok(web::Json(LecturesResponse { lectures }))
}

#[api_v2_errors(code = 400, code = 404, code = 500)]
#[derive(Debug, Error)]
pub enum LectureError {
    #[error("[LectureError::CourseId]: {0}")]
    CourseId(#[from] bson::oid::Error),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("[LectureError::CourseNotFound]: {0}")]
    CourseNotFound(ObjectId),
    #[error("[LectureError::Database]: {0}")]
    Database(#[from] DatabaseError),
}

impl ResponseError for LectureError {
    fn status_code(&self) -> StatusCode {
        match *self {
            LectureError::CourseId(_) | LectureError::Validation(_) => StatusCode::BAD_REQUEST,
            LectureError::CourseNotFound(_) => StatusCode::NOT_FOUND,
            LectureError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            LectureError::CourseId(_) => message_response(self.status_code(), "Invalid course id."),
            LectureError::Validation(err) => message_response(self.status_code(), err.to_string()),
            LectureError::CourseNotFound(_) => {
                message_response(self.status_code(), "Course not found.")
            }
            LectureError::Database(_) => {
                error!("{}", self);
                message_response(self.status_code(), "Failed to process lecture.")
            }
        }
    }
}
