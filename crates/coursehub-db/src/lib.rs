mod collections;
mod error;
pub mod memory;
mod query;
mod repository;

use collections::Collections;

pub use error::*;
pub use query::*;
pub use repository::*;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, DateTime, Document};
use coursehub_auth::User;
use coursehub_common::{Course, CourseUpdate, Lecture};
use futures::TryStreamExt;
use log::{info, warn};
use mongodb::{
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Client, Collection, IndexModel,
};
use std::convert::TryFrom;

pub struct Database {
    courses: Collection<Document>,
    lectures: Collection<Document>,
    users: Collection<Document>,
}

impl Database {
    pub async fn connect(mongodb_uri: &str, database_name: &str) -> Result<Self, DatabaseError> {
        info!("Connecting to MongoDB database {}", database_name);
        let client = Client::with_uri_str(mongodb_uri).await?;
        let database = client.database(database_name);
        let courses = database.collection(Collections::Courses.as_str());
        let lectures = database.collection(Collections::Lectures.as_str());
        let users = database.collection(Collections::Users.as_str());

        if let Err(err) = Database::generate_course_indexes(&courses).await {
            warn!("Creating course indexes failed: {}", err);
        }

        Ok(Database {
            courses,
            lectures,
            users,
        })
    }

    async fn generate_course_indexes(courses: &Collection<Document>) -> Result<(), DatabaseError> {
        let indexes = vec![
            doc! {
                "isPublished": 1,
                "category": 1
            },
            doc! {
                "isPublished": 1,
                "coursePrice": 1
            },
            doc! {
                "creator": 1
            },
        ];
        let listed_indexes: Vec<Document> = courses
            .list_indexes(None)
            .await?
            .map_ok(|index| index.keys)
            .try_collect()
            .await?;
        for index in indexes {
            if !listed_indexes.iter().any(|idx| idx == &index) {
                courses
                    .create_index(IndexModel::builder().keys(index).build(), None)
                    .await?;
            }
        }
        Ok(())
    }

    async fn find_one_and_update(
        &self,
        course_id: &ObjectId,
        update: Document,
    ) -> Result<Option<Course>, DatabaseError> {
        let filter = doc! {
            "_id": *course_id
        };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let course = self
            .courses
            .find_one_and_update(filter, update, options)
            .await?
            .map(Course::try_from)
            .transpose()?;
        Ok(course)
    }
}

#[async_trait]
impl CourseRepository for Database {
    async fn insert_course(&self, course: Course) -> Result<Course, DatabaseError> {
        let document = bson::to_document(&course)?;
        self.courses.insert_one(document, None).await?;
        Ok(course)
    }

    async fn find_course(&self, course_id: &ObjectId) -> Result<Option<Course>, DatabaseError> {
        let filter = doc! {
            "_id": *course_id
        };
        let course = self
            .courses
            .find_one(filter, None)
            .await?
            .map(Course::try_from)
            .transpose()?;
        Ok(course)
    }

    async fn find_courses(&self, query: &CourseQuery) -> Result<Vec<Course>, DatabaseError> {
        let options = FindOptions::builder()
            .sort(query.sort.map(|sort| sort.to_document()))
            .skip(query.pagination.map(|pagination| pagination.skip()))
            .limit(
                query
                    .pagination
                    .map(|pagination| i64::try_from(pagination.limit).unwrap_or(i64::MAX)),
            )
            .build();
        let documents: Vec<Document> = self
            .courses
            .find(query.filter.to_document(), options)
            .await?
            .try_collect()
            .await?;
        let courses = documents
            .into_iter()
            .map(Course::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(courses)
    }

    async fn count_courses(&self, filter: &CourseFilter) -> Result<u64, DatabaseError> {
        let count = self
            .courses
            .count_documents(filter.to_document(), None)
            .await?;
        Ok(count)
    }

    async fn update_course(
        &self,
        course_id: &ObjectId,
        update: &CourseUpdate,
    ) -> Result<Option<Course>, DatabaseError> {
        self.find_one_and_update(course_id, update_document(update, DateTime::now()))
            .await
    }

    async fn set_course_published(
        &self,
        course_id: &ObjectId,
        published: bool,
    ) -> Result<Option<Course>, DatabaseError> {
        let update = doc! {
            "$set": {
                "isPublished": published,
                "updatedAt": DateTime::now(),
            }
        };
        self.find_one_and_update(course_id, update).await
    }

    async fn find_users(&self, user_ids: &[ObjectId]) -> Result<Vec<User>, DatabaseError> {
        let filter = doc! {
            "_id": {
                "$in": user_ids.to_vec()
            }
        };
        let options = FindOptions::builder()
            .projection(doc! {
                "name": 1,
                "photoUrl": 1
            })
            .build();
        let documents: Vec<Document> = self.users.find(filter, options).await?.try_collect().await?;
        let users = documents
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    async fn insert_lecture(
        &self,
        course_id: &ObjectId,
        lecture: Lecture,
    ) -> Result<Lecture, DatabaseError> {
        let document = bson::to_document(&lecture)?;
        self.lectures.insert_one(document, None).await?;
        let filter = doc! {
            "_id": *course_id
        };
        let update = doc! {
            "$push": {
                "lectures": *lecture.get_id()
            },
            "$set": {
                "updatedAt": DateTime::now()
            }
        };
        self.courses.update_one(filter, update, None).await?;
        Ok(lecture)
    }

    async fn find_lectures(&self, lecture_ids: &[ObjectId]) -> Result<Vec<Lecture>, DatabaseError> {
        let filter = doc! {
            "_id": {
                "$in": lecture_ids.to_vec()
            }
        };
        let documents: Vec<Document> = self.lectures.find(filter, None).await?.try_collect().await?;
        let mut lectures = documents
            .into_iter()
            .map(Lecture::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        lectures.sort_by_key(|lecture| {
            lecture_ids
                .iter()
                .position(|id| id == lecture.get_id())
                .unwrap_or(usize::MAX)
        });
        Ok(lectures)
    }
}
