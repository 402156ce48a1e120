use crate::{
    media::MediaStore,
    routes::courses::{
        create::CreateCourseError,
        edit::{EditCourseError, EditCourseForm},
        get::GetCourseError,
        lectures::LectureError,
        publish::TogglePublishError,
        published::GetPublishedCoursesError,
        search::{SearchCourses, SearchCoursesError, SearchCoursesResponse},
    },
};

use bson::oid::ObjectId;
use coursehub_common::{Course, CourseResponse, CourseUpdate, Lecture, LectureResponse};
use coursehub_db::{CourseFilter, CourseQuery, CourseRepository, DatabaseError};
use log::{info, warn};
use std::sync::Arc;

/// Request-independent state shared by the handlers of one worker.
pub struct Data {
    database: Arc<dyn CourseRepository>,
    media: Arc<dyn MediaStore>,
}

pub type ServerData = Arc<Data>;

impl Data {
    pub fn new(database: Arc<dyn CourseRepository>, media: Arc<dyn MediaStore>) -> Self {
        Data { database, media }
    }

    pub async fn create_course(
        &self,
        creator: ObjectId,
        course_title: String,
        category: String,
    ) -> Result<CourseResponse, CreateCourseError> {
        let course = Course::insert(creator, course_title, category);
        let course = self.database.insert_course(course).await?;
        info!("Course {} created by {}", course.get_id(), creator);
        Ok(CourseResponse::from_course(course, None))
    }

    pub async fn search_courses(
        &self,
        search: SearchCourses,
    ) -> Result<SearchCoursesResponse, SearchCoursesError> {
        let pagination = search.pagination();
        let query = search.into_query();
        let courses = self.database.find_courses(&query).await?;
        let total_courses = self.database.count_courses(&query.filter).await?;
        let courses = self.populate_creators(courses).await?;
        Ok(SearchCoursesResponse::new(courses, total_courses, pagination))
    }

    pub async fn get_published_courses(
        &self,
    ) -> Result<Vec<CourseResponse>, GetPublishedCoursesError> {
        let query = CourseQuery::new(CourseFilter::published());
        let courses = self.database.find_courses(&query).await?;
        Ok(self.populate_creators(courses).await?)
    }

    pub async fn get_course(&self, course_id: ObjectId) -> Result<CourseResponse, GetCourseError> {
        let course = self
            .database
            .find_course(&course_id)
            .await?
            .ok_or(GetCourseError::CourseNotFound(course_id))?;
        let mut courses = self.populate_creators(vec![course]).await?;
        courses.pop().ok_or(GetCourseError::CourseNotFound(course_id))
    }

    pub async fn get_creator_courses(
        &self,
        creator: ObjectId,
    ) -> Result<Vec<CourseResponse>, GetCourseError> {
        let query = CourseQuery::new(CourseFilter::by_creator(creator));
        let courses = self.database.find_courses(&query).await?;
        Ok(self.populate_creators(courses).await?)
    }

    /// Replaces the supplied fields. With a new thumbnail the previous asset
    /// is deleted before the upload; a failed delete is only logged while a
    /// failed upload leaves the record as it was.
    pub async fn edit_course(
        &self,
        course_id: ObjectId,
        form: EditCourseForm,
    ) -> Result<CourseResponse, EditCourseError> {
        let course = self
            .database
            .find_course(&course_id)
            .await?
            .ok_or(EditCourseError::CourseNotFound(course_id))?;
        let (update, thumbnail) = form.into_parts();

        let course_thumbnail = match thumbnail {
            Some(thumbnail) => {
                let deleted = match course.get_thumbnail_public_id(self.media.folder()) {
                    Some(public_id) => match self.media.delete(&public_id).await {
                        Ok(()) => Some(public_id),
                        Err(err) => {
                            warn!(
                                "Deleting thumbnail {} of course {} failed: {}",
                                public_id, course_id, err
                            );
                            None
                        }
                    },
                    None => None,
                };
                let uploaded = self.media.upload(thumbnail).await.map_err(|err| {
                    if let Some(public_id) = &deleted {
                        warn!(
                            "Course {} still references deleted thumbnail {}",
                            course_id, public_id
                        );
                    }
                    EditCourseError::Upload(err)
                })?;
                Some(uploaded.secure_url)
            }
            None => None,
        };

        let update = CourseUpdate {
            course_thumbnail,
            ..update
        };
        let course = self
            .database
            .update_course(&course_id, &update)
            .await?
            .ok_or(EditCourseError::CourseNotFound(course_id))?;
        Ok(CourseResponse::from_course(course, None))
    }

    /// Returns the stored publish state.
    pub async fn toggle_publish_course(
        &self,
        course_id: ObjectId,
        publish: bool,
    ) -> Result<bool, TogglePublishError> {
        let course = self
            .database
            .set_course_published(&course_id, publish)
            .await?
            .ok_or(TogglePublishError::CourseNotFound(course_id))?;
        info!(
            "Course {} is now {}",
            course_id,
            if course.is_published() { "published" } else { "unpublished" }
        );
        Ok(course.is_published())
    }

    pub async fn create_lecture(
        &self,
        course_id: ObjectId,
        lecture_title: String,
    ) -> Result<LectureResponse, LectureError> {
        if self.database.find_course(&course_id).await?.is_none() {
            return Err(LectureError::CourseNotFound(course_id));
        }
        let lecture = self
            .database
            .insert_lecture(&course_id, Lecture::insert(lecture_title))
            .await?;
        Ok(lecture.into())
    }

    pub async fn get_course_lectures(
        &self,
        course_id: ObjectId,
    ) -> Result<Vec<LectureResponse>, LectureError> {
        let course = self
            .database
            .find_course(&course_id)
            .await?
            .ok_or(LectureError::CourseNotFound(course_id))?;
        let lectures = self.database.find_lectures(course.get_lectures()).await?;
        Ok(lectures.into_iter().map(LectureResponse::from).collect())
    }

    async fn populate_creators(
        &self,
        courses: Vec<Course>,
    ) -> Result<Vec<CourseResponse>, DatabaseError> {
        let mut creator_ids: Vec<ObjectId> = vec![];
        for course in courses.iter() {
            if !creator_ids.contains(course.get_creator()) {
                creator_ids.push(*course.get_creator());
            }
        }
        let users = if creator_ids.is_empty() {
            vec![]
        } else {
            self.database.find_users(&creator_ids).await?
        };
        Ok(CourseResponse::from_courses(courses, &users))
    }
}
