//! In-process repository used by the test-suites and for running the API
//! without a MongoDB instance.

use crate::{CourseFilter, CourseQuery, CourseRepository, DatabaseError};

use async_trait::async_trait;
use bson::oid::ObjectId;
use coursehub_auth::User;
use coursehub_common::{Course, CourseUpdate, Lecture};
use parking_lot::Mutex;

#[derive(Debug, Default)]
pub struct MemoryDatabase {
    courses: Mutex<Vec<Course>>,
    lectures: Mutex<Vec<Lecture>>,
    users: Mutex<Vec<User>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        MemoryDatabase {
            users: Mutex::new(users),
            ..MemoryDatabase::default()
        }
    }

    /// Snapshot of every stored course, in insertion order.
    pub fn courses(&self) -> Vec<Course> {
        self.courses.lock().clone()
    }
}

#[async_trait]
impl CourseRepository for MemoryDatabase {
    async fn insert_course(&self, course: Course) -> Result<Course, DatabaseError> {
        self.courses.lock().push(course.clone());
        Ok(course)
    }

    async fn find_course(&self, course_id: &ObjectId) -> Result<Option<Course>, DatabaseError> {
        Ok(self
            .courses
            .lock()
            .iter()
            .find(|course| course.get_id() == course_id)
            .cloned())
    }

    async fn find_courses(&self, query: &CourseQuery) -> Result<Vec<Course>, DatabaseError> {
        let mut courses: Vec<Course> = self
            .courses
            .lock()
            .iter()
            .filter(|course| query.filter.matches(course))
            .cloned()
            .collect();
        if let Some(sort) = query.sort {
            courses.sort_by(|a, b| sort.compare(a, b));
        }
        if let Some(pagination) = query.pagination {
            let skip = usize::try_from(pagination.skip()).unwrap_or(usize::MAX);
            let limit = usize::try_from(pagination.limit).unwrap_or(usize::MAX);
            courses = courses.into_iter().skip(skip).take(limit).collect();
        }
        Ok(courses)
    }

    async fn count_courses(&self, filter: &CourseFilter) -> Result<u64, DatabaseError> {
        let count = self
            .courses
            .lock()
            .iter()
            .filter(|course| filter.matches(course))
            .count();
        Ok(count as u64)
    }

    async fn update_course(
        &self,
        course_id: &ObjectId,
        update: &CourseUpdate,
    ) -> Result<Option<Course>, DatabaseError> {
        let mut courses = self.courses.lock();
        Ok(courses
            .iter_mut()
            .find(|course| course.get_id() == course_id)
            .map(|course| {
                course.apply(update);
                course.clone()
            }))
    }

    async fn set_course_published(
        &self,
        course_id: &ObjectId,
        published: bool,
    ) -> Result<Option<Course>, DatabaseError> {
        let mut courses = self.courses.lock();
        Ok(courses
            .iter_mut()
            .find(|course| course.get_id() == course_id)
            .map(|course| {
                course.set_published(published);
                course.clone()
            }))
    }

    async fn find_users(&self, user_ids: &[ObjectId]) -> Result<Vec<User>, DatabaseError> {
        Ok(self
            .users
            .lock()
            .iter()
            .filter(|user| user_ids.contains(user.get_id()))
            .cloned()
            .collect())
    }

    async fn insert_lecture(
        &self,
        course_id: &ObjectId,
        lecture: Lecture,
    ) -> Result<Lecture, DatabaseError> {
        self.lectures.lock().push(lecture.clone());
        if let Some(course) = self
            .courses
            .lock()
            .iter_mut()
            .find(|course| course.get_id() == course_id)
        {
            course.push_lecture(*lecture.get_id());
        }
        Ok(lecture)
    }

    async fn find_lectures(&self, lecture_ids: &[ObjectId]) -> Result<Vec<Lecture>, DatabaseError> {
        let lectures = self.lectures.lock();
        Ok(lecture_ids
            .iter()
            .filter_map(|id| lectures.iter().find(|lecture| lecture.get_id() == id))
            .cloned()
            .collect())
    }
}
