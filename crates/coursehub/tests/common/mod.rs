#![allow(dead_code)]

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::header::HeaderName,
    web, App,
};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use coursehub::{
    identity::RequesterIdentity,
    media::{MediaError, MediaStore, ThumbnailFile, UploadedMedia},
    routes::{courses, json_config},
    server::{Data, ServerData},
};
use coursehub_auth::User;
use coursehub_common::{Course, CourseUpdate, Lecture};
use coursehub_db::{
    memory::MemoryDatabase, CourseFilter, CourseQuery, CourseRepository, DatabaseError,
};
use std::sync::{Arc, Mutex};

pub static REQUESTER_HEADER: &str = "x-user-id";

static BOUNDARY: &str = "coursehub-test-boundary";

#[derive(Clone, Debug, PartialEq)]
pub enum MediaCall {
    Delete(String),
    Upload(Option<String>),
}

/// Media store that records every call in order and optionally refuses
/// uploads or deletes.
#[derive(Debug, Default)]
pub struct FakeMedia {
    calls: Mutex<Vec<MediaCall>>,
    fail_uploads: bool,
    fail_deletes: bool,
    folder: Option<String>,
}

impl FakeMedia {
    pub fn new() -> Self {
        FakeMedia::default()
    }

    pub fn failing_uploads() -> Self {
        FakeMedia {
            fail_uploads: true,
            ..FakeMedia::default()
        }
    }

    pub fn failing_deletes() -> Self {
        FakeMedia {
            fail_deletes: true,
            ..FakeMedia::default()
        }
    }

    pub fn in_folder(folder: &str) -> Self {
        FakeMedia {
            folder: Some(folder.to_string()),
            ..FakeMedia::default()
        }
    }

    pub fn calls(&self) -> Vec<MediaCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait(?Send)]
impl MediaStore for FakeMedia {
    async fn upload(&self, file: ThumbnailFile) -> Result<UploadedMedia, MediaError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(MediaCall::Upload(file.get_file_name().cloned()));
        if self.fail_uploads {
            return Err(MediaError::Rejected(500, "upload refused".to_string()));
        }
        let public_id = match &self.folder {
            Some(folder) => format!("{}/thumbnail_{}", folder, calls.len()),
            None => format!("thumbnail_{}", calls.len()),
        };
        Ok(UploadedMedia {
            secure_url: thumbnail_url(&public_id),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        self.calls
            .lock()
            .unwrap()
            .push(MediaCall::Delete(public_id.to_string()));
        if self.fail_deletes {
            return Err(MediaError::Rejected(404, "not found".to_string()));
        }
        Ok(())
    }

    fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }
}

/// Repository whose every call fails with a driver-level error.
pub struct FailingDatabase;

fn deserialize_error() -> bson::de::Error {
    bson::from_document::<Course>(doc! {}).unwrap_err()
}

/// Text of the error every `FailingDatabase` call returns.
pub fn driver_error_message() -> String {
    deserialize_error().to_string()
}

fn driver_error() -> DatabaseError {
    DatabaseError::Deserialize(deserialize_error())
}

#[async_trait]
impl CourseRepository for FailingDatabase {
    async fn insert_course(&self, _course: Course) -> Result<Course, DatabaseError> {
        Err(driver_error())
    }

    async fn find_course(&self, _course_id: &ObjectId) -> Result<Option<Course>, DatabaseError> {
        Err(driver_error())
    }

    async fn find_courses(&self, _query: &CourseQuery) -> Result<Vec<Course>, DatabaseError> {
        Err(driver_error())
    }

    async fn count_courses(&self, _filter: &CourseFilter) -> Result<u64, DatabaseError> {
        Err(driver_error())
    }

    async fn update_course(
        &self,
        _course_id: &ObjectId,
        _update: &CourseUpdate,
    ) -> Result<Option<Course>, DatabaseError> {
        Err(driver_error())
    }

    async fn set_course_published(
        &self,
        _course_id: &ObjectId,
        _published: bool,
    ) -> Result<Option<Course>, DatabaseError> {
        Err(driver_error())
    }

    async fn find_users(&self, _user_ids: &[ObjectId]) -> Result<Vec<User>, DatabaseError> {
        Err(driver_error())
    }

    async fn insert_lecture(
        &self,
        _course_id: &ObjectId,
        _lecture: Lecture,
    ) -> Result<Lecture, DatabaseError> {
        Err(driver_error())
    }

    async fn find_lectures(
        &self,
        _lecture_ids: &[ObjectId],
    ) -> Result<Vec<Lecture>, DatabaseError> {
        Err(driver_error())
    }
}

pub fn thumbnail_url(public_id: &str) -> String {
    format!(
        "https://res.cloudinary.com/demo/image/upload/v1700000000/{}.png",
        public_id
    )
}

pub fn app(
    database: Arc<dyn CourseRepository>,
    media: Arc<dyn MediaStore>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let data: ServerData = Arc::new(Data::new(database, media));
    App::new()
        .app_data(web::Data::new(data))
        .app_data(json_config())
        .service(courses::service())
        .wrap(RequesterIdentity::new(HeaderName::from_static(
            REQUESTER_HEADER,
        )))
}

pub struct SeedCourse<'a> {
    pub creator: ObjectId,
    pub title: &'a str,
    pub category: &'a str,
    pub sub_title: Option<&'a str>,
    pub price: Option<f64>,
    pub thumbnail: Option<String>,
    pub published: bool,
}

impl<'a> SeedCourse<'a> {
    pub fn new(title: &'a str, category: &'a str) -> Self {
        SeedCourse {
            creator: ObjectId::new(),
            title,
            category,
            sub_title: None,
            price: None,
            thumbnail: None,
            published: true,
        }
    }

    pub async fn insert(self, database: &MemoryDatabase) -> Course {
        let course = database
            .insert_course(Course::insert(
                self.creator,
                self.title.to_string(),
                self.category.to_string(),
            ))
            .await
            .unwrap();
        let update = CourseUpdate {
            sub_title: self.sub_title.map(String::from),
            course_price: self.price,
            course_thumbnail: self.thumbnail,
            ..CourseUpdate::default()
        };
        database
            .update_course(course.get_id(), &update)
            .await
            .unwrap();
        database
            .set_course_published(course.get_id(), self.published)
            .await
            .unwrap()
            .unwrap()
    }
}

/// Builds a `multipart/form-data` body with text fields and an optional
/// `courseThumbnail` file given as `(file name, content type, bytes)`.
pub fn multipart_body(
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"courseThumbnail\"; \
                 filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, file_name, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    (
        format!("multipart/form-data; boundary={}", BOUNDARY),
        body,
    )
}
