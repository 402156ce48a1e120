use crate::{CourseFilter, CourseQuery, DatabaseError};

use async_trait::async_trait;
use bson::oid::ObjectId;
use coursehub_auth::User;
use coursehub_common::{Course, CourseUpdate, Lecture};

/// Everything the request handlers need from persistence. Lookups by id return
/// `None` for absent records and leave the not-found policy to the caller.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn insert_course(&self, course: Course) -> Result<Course, DatabaseError>;

    async fn find_course(&self, course_id: &ObjectId) -> Result<Option<Course>, DatabaseError>;

    async fn find_courses(&self, query: &CourseQuery) -> Result<Vec<Course>, DatabaseError>;

    async fn count_courses(&self, filter: &CourseFilter) -> Result<u64, DatabaseError>;

    async fn update_course(
        &self,
        course_id: &ObjectId,
        update: &CourseUpdate,
    ) -> Result<Option<Course>, DatabaseError>;

    async fn set_course_published(
        &self,
        course_id: &ObjectId,
        published: bool,
    ) -> Result<Option<Course>, DatabaseError>;

    /// Public creator projections for the given ids. Unknown ids are skipped.
    async fn find_users(&self, user_ids: &[ObjectId]) -> Result<Vec<User>, DatabaseError>;

    /// Stores the lecture and appends its id to the course's lecture list.
    async fn insert_lecture(
        &self,
        course_id: &ObjectId,
        lecture: Lecture,
    ) -> Result<Lecture, DatabaseError>;

    /// Lectures in the order of `lecture_ids`.
    async fn find_lectures(&self, lecture_ids: &[ObjectId]) -> Result<Vec<Lecture>, DatabaseError>;
}
