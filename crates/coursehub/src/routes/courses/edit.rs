use crate::{
    media::{MediaError, ThumbnailFile},
    routes::message_response,
    server::ServerData,
};

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{
    dev::Payload,
    error::ResponseError,
    http::{header::CONTENT_TYPE, StatusCode},
    FromRequest, HttpRequest, HttpResponse,
};
use bson::oid::ObjectId;
use coursehub_common::{CourseLevel, CourseLevelError, CourseResponse, CourseUpdate};
use coursehub_db::DatabaseError;
use futures::{future::LocalBoxFuture, TryStreamExt};
use log::error;
use paperclip::actix::{api_v2_errors, api_v2_operation, web, Apiv2Schema, OperationModifier};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

static THUMBNAIL_FIELD: &str = "courseThumbnail";
const MAX_THUMBNAIL_BYTES: usize = 10 << 20;
const MAX_FIELD_BYTES: usize = 64 << 10;

/// Scalar course fields as sent by the client. Every field is optional and
/// empty strings for level and price count as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditCourse {
    course_title: Option<String>,
    sub_title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    course_level: Option<String>,
    #[serde(default, deserialize_with = "deserialize_price")]
    course_price: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Price {
    Number(f64),
    Text(String),
}

fn deserialize_price<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Price>::deserialize(de)?.map(|price| match price {
        Price::Number(price) => price.to_string(),
        Price::Text(price) => price,
    }))
}

impl EditCourse {
    fn set(&mut self, name: &str, value: String) {
        match name {
            "courseTitle" => self.course_title = Some(value),
            "subTitle" => self.sub_title = Some(value),
            "description" => self.description = Some(value),
            "category" => self.category = Some(value),
            "courseLevel" => self.course_level = Some(value),
            "coursePrice" => self.course_price = Some(value),
            _ => {}
        }
    }

    fn into_update(self) -> Result<CourseUpdate, EditCourseFormError> {
        let course_level = match self.course_level.filter(|level| !level.is_empty()) {
            Some(level) => Some(level.parse::<CourseLevel>()?),
            None => None,
        };
        let course_price = match self.course_price.filter(|price| !price.trim().is_empty()) {
            Some(price) => Some(
                price
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|price| price.is_finite())
                    .ok_or(EditCourseFormError::CoursePrice(price))?,
            ),
            None => None,
        };
        Ok(CourseUpdate {
            course_title: self.course_title,
            sub_title: self.sub_title,
            description: self.description,
            category: self.category,
            course_level,
            course_price,
            course_thumbnail: None,
        })
    }
}

/// The edit request, read either from `multipart/form-data` with an optional
/// `courseThumbnail` file or from a JSON body.
#[derive(Debug)]
pub struct EditCourseForm {
    update: CourseUpdate,
    thumbnail: Option<ThumbnailFile>,
}

impl EditCourseForm {
    pub fn new(update: CourseUpdate, thumbnail: Option<ThumbnailFile>) -> Self {
        EditCourseForm { update, thumbnail }
    }

    pub fn into_parts(self) -> (CourseUpdate, Option<ThumbnailFile>) {
        (self.update, self.thumbnail)
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, EditCourseFormError> {
        let mut body = EditCourse::default();
        let mut thumbnail = None;
        while let Some(mut field) = multipart.try_next().await? {
            let name = field
                .content_disposition()
                .get_name()
                .unwrap_or_default()
                .to_string();
            if name == THUMBNAIL_FIELD {
                let file_name = field
                    .content_disposition()
                    .get_filename()
                    .filter(|file_name| !file_name.is_empty())
                    .map(String::from);
                let content_type = field
                    .content_type()
                    .map(|mime| mime.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let bytes = read_field(&mut field, &name, MAX_THUMBNAIL_BYTES).await?;
                if !bytes.is_empty() {
                    thumbnail = Some(ThumbnailFile::new(file_name, content_type, bytes));
                }
            } else {
                let bytes = read_field(&mut field, &name, MAX_FIELD_BYTES).await?;
                let value =
                    String::from_utf8(bytes).map_err(|_| EditCourseFormError::Utf8(name.clone()))?;
                body.set(&name, value);
            }
        }
        Ok(EditCourseForm::new(body.into_update()?, thumbnail))
    }
}

async fn read_field(
    field: &mut Field,
    name: &str,
    limit: usize,
) -> Result<Vec<u8>, EditCourseFormError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        if bytes.len() + chunk.len() > limit {
            return Err(EditCourseFormError::TooLarge(name.to_string()));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map_or(false, |value| value.starts_with("multipart/form-data"))
}

impl FromRequest for EditCourseForm {
    type Error = EditCourseFormError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if is_multipart(req) {
            let multipart = Multipart::new(req.headers(), payload.take());
            Box::pin(EditCourseForm::from_multipart(multipart))
        } else {
            let json = actix_web::web::Json::<EditCourse>::from_request(req, payload);
            Box::pin(async move {
                let body = json.await.map_err(EditCourseFormError::Json)?;
                Ok(EditCourseForm::new(body.into_inner().into_update()?, None))
            })
        }
    }
}

impl paperclip::v2::schema::Apiv2Schema for EditCourseForm {}

impl OperationModifier for EditCourseForm {}

#[derive(Debug, Error)]
pub enum EditCourseFormError {
    #[error("{0}")]
    Multipart(#[from] MultipartError),
    #[error("{0}")]
    Json(actix_web::Error),
    #[error("\"{0}\" must be valid UTF-8")]
    Utf8(String),
    #[error("\"{0}\" is too large")]
    TooLarge(String),
    #[error("{0}")]
    CourseLevel(#[from] CourseLevelError),
    #[error("\"coursePrice\" must be a number, got \"{0}\"")]
    CoursePrice(String),
}

impl ResponseError for EditCourseFormError {
    fn status_code(&self) -> StatusCode {
        match self {
            EditCourseFormError::Json(err) => err.as_response_error().status_code(),
            EditCourseFormError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            EditCourseFormError::Json(err) => err.error_response(),
            _ => message_response(self.status_code(), self.to_string()),
        }
    }
}

#[derive(Apiv2Schema, Debug, Serialize)]
pub struct EditCourseResponse {
    course: CourseResponse,
    message: String,
}

/// Updates the supplied fields of a course. A new thumbnail replaces the
/// previous asset, which is deleted from the media host first.
#[api_v2_operation(tags(Courses))]
pub async fn edit_course(
    data: web::Data<ServerData>,
    path: web::Path<String>,
    form: EditCourseForm,
) -> Result<web::Json<EditCourseResponse>, EditCourseError> {
    let course_id = ObjectId::parse_str(path.into_inner())?;
    let course = data.edit_course(course_id, form).await?;
    Ok(web::Json(EditCourseResponse {
        course,
        message: "Course updated successfully.".to_string(),
    }))
}

#[api_v2_errors(code = 400, code = 404, code = 500)]
#[derive(Debug, Error)]
pub enum EditCourseError {
    #[error("[EditCourseError::CourseId]: {0}")]
    CourseId(#[from] bson::oid::Error),
    #[error("[EditCourseError::CourseNotFound]: {0}")]
    CourseNotFound(ObjectId),
    #[error("[EditCourseError::Upload]: {0}")]
    Upload(MediaError),
    #[error("[EditCourseError::Database]: {0}")]
    Database(#[from] DatabaseError),
}

impl ResponseError for EditCourseError {
    fn status_code(&self) -> StatusCode {
        match *self {
            EditCourseError::CourseId(_) => StatusCode::BAD_REQUEST,
            EditCourseError::CourseNotFound(_) => StatusCode::NOT_FOUND,
            EditCourseError::Upload(_) | EditCourseError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match *self {
            EditCourseError::CourseId(_) => "Invalid course id.",
            EditCourseError::CourseNotFound(_) => "Course not found.",
            EditCourseError::Upload(_) => {
                error!("{}", self);
                "Failed to upload thumbnail."
            }
            EditCourseError::Database(_) => {
                error!("{}", self);
                "Failed to update course."
            }
        };
        message_response(self.status_code(), message)
    }
}
