use crate::{routes::message_response, server::ServerData};

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use coursehub_common::CourseResponse;
use coursehub_db::DatabaseError;
use log::error;
use paperclip::actix::{api_v2_errors, api_v2_operation, web, Apiv2Schema};
use serde::Serialize;
use thiserror::Error;

#[derive(Apiv2Schema, Debug, Serialize)]
pub struct CoursesResponse {
    courses: Vec<CourseResponse>,
}

impl CoursesResponse {
    pub fn new(courses: Vec<CourseResponse>) -> Self {
        CoursesResponse { courses }
    }
}

/// Every published course with its creator's name and photo.
#[api_v2_operation(tags(Courses))]
pub async fn get_published_courses(
    data: web::Data<ServerData>,
) -> Result<web::Json<CoursesResponse>, GetPublishedCoursesError> {
    let courses = data.get_published_courses().await?;
    Ok(web::Json(CoursesResponse::new(courses)))
}

#[api_v2_errors(code = 500)]
#[derive(Debug, Error)]
pub enum GetPublishedCoursesError {
    #[error("[GetPublishedCoursesError::Database]: {0}")]
    Database(#[from] DatabaseError),
}

impl ResponseError for GetPublishedCoursesError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        error!("{}", self);
        message_response(self.status_code(), "Failed to get published courses.")
    }
}
