use super::published::CoursesResponse;
use crate::{routes::message_response, server::ServerData};

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use bson::oid::ObjectId;
use coursehub_auth::Identity;
use coursehub_common::CourseResponse;
use coursehub_db::DatabaseError;
use log::error;
use paperclip::actix::{api_v2_errors, api_v2_operation, web, Apiv2Schema};
use serde::Serialize;
use thiserror::Error;

#[derive(Apiv2Schema, Debug, Serialize)]
pub struct CourseByIdResponse {
    course: CourseResponse,
}

#[api_v2_operation(tags(Courses))]
pub async fn get_course(
    data: web::Data<ServerData>,
    path: web::Path<String>,
) -> Result<web::Json<CourseByIdResponse>, GetCourseError> {
    let course_id = ObjectId::parse_str(path.into_inner())?;
    let course = data.get_course(course_id).await?;
    Ok(web::Json(CourseByIdResponse { course }))
}

/// Courses created by the requester, published or not.
#[api_v2_operation(tags(Courses))]
pub async fn get_creator_courses(
    data: web::Data<ServerData>,
    identity: Identity,
) -> Result<web::Json<CoursesResponse>, GetCourseError> {
    let courses = data.get_creator_courses(*identity.get_user_id()).await?;
    Ok(web::Json(CoursesResponse::new(courses)))
}

#[api_v2_errors(code = 400, code = 401, code = 404, code = 500)]
#[derive(Debug, Error)]
pub enum GetCourseError {
    #[error("[GetCourseError::CourseId]: {0}")]
    CourseId(#[from] bson::oid::Error),
    #[error("[GetCourseError::CourseNotFound]: {0}")]
    CourseNotFound(ObjectId),
    #[error("[GetCourseError::Database]: {0}")]
    Database(#[from] DatabaseError),
}

impl ResponseError for GetCourseError {
    fn status_code(&self) -> StatusCode {
        match *self {
            GetCourseError::CourseId(_) => StatusCode::BAD_REQUEST,
            GetCourseError::CourseNotFound(_) => StatusCode::NOT_FOUND,
            GetCourseError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match *self {
            GetCourseError::CourseId(_) => "Invalid course id.",
            GetCourseError::CourseNotFound(_) => "Course not found.",
            GetCourseError::Database(_) => {
                error!("{}", self);
                "Failed to get course."
            }
        };
        message_response(self.status_code(), message)
    }
}
