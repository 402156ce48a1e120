use crate::epoch;

use bson::{oid::ObjectId, DateTime, Document};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, str::FromStr};
use thiserror::Error;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id")]
    id: ObjectId,
    course_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    course_level: Option<CourseLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    course_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    course_thumbnail: Option<String>,
    creator: ObjectId,
    #[serde(default)]
    is_published: bool,
    #[serde(default)]
    lectures: Vec<ObjectId>,
    #[serde(default = "epoch")]
    created_at: DateTime,
    #[serde(default = "epoch")]
    updated_at: DateTime,
}

impl Course {
    /// Builds a fresh, unpublished course owned by `creator`.
    pub fn insert(creator: ObjectId, course_title: String, category: String) -> Self {
        let now = DateTime::now();
        Course {
            id: ObjectId::new(),
            course_title,
            sub_title: None,
            description: None,
            category,
            course_level: None,
            course_price: None,
            course_thumbnail: None,
            creator,
            is_published: false,
            lectures: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    pub fn get_id(&self) -> &ObjectId {
        &self.id
    }

    pub fn get_course_title(&self) -> &String {
        &self.course_title
    }

    pub fn get_sub_title(&self) -> Option<&String> {
        self.sub_title.as_ref()
    }

    pub fn get_description(&self) -> Option<&String> {
        self.description.as_ref()
    }

    pub fn get_category(&self) -> &String {
        &self.category
    }

    pub fn get_course_level(&self) -> Option<&CourseLevel> {
        self.course_level.as_ref()
    }

    pub fn get_course_price(&self) -> Option<f64> {
        self.course_price
    }

    pub fn get_course_thumbnail(&self) -> Option<&String> {
        self.course_thumbnail.as_ref()
    }

    pub fn get_creator(&self) -> &ObjectId {
        &self.creator
    }

    pub fn is_published(&self) -> bool {
        self.is_published
    }

    pub fn get_lectures(&self) -> &Vec<ObjectId> {
        &self.lectures
    }

    pub fn get_created_at(&self) -> DateTime {
        self.created_at
    }

    pub fn get_updated_at(&self) -> DateTime {
        self.updated_at
    }

    /// Identifier of the stored thumbnail on the media host. See
    /// [`public_id_from_url`].
    pub fn get_thumbnail_public_id(&self, folder: Option<&str>) -> Option<String> {
        self.course_thumbnail
            .as_deref()
            .filter(|thumbnail| !thumbnail.is_empty())
            .and_then(|thumbnail| public_id_from_url(thumbnail, folder))
    }

    pub fn set_published(&mut self, published: bool) {
        self.is_published = published;
        self.updated_at = DateTime::now();
    }

    pub fn push_lecture(&mut self, lecture_id: ObjectId) {
        self.lectures.push(lecture_id);
        self.updated_at = DateTime::now();
    }

    pub fn apply(&mut self, update: &CourseUpdate) {
        if let Some(course_title) = &update.course_title {
            self.course_title = course_title.clone();
        }
        if let Some(sub_title) = &update.sub_title {
            self.sub_title = Some(sub_title.clone());
        }
        if let Some(description) = &update.description {
            self.description = Some(description.clone());
        }
        if let Some(category) = &update.category {
            self.category = category.clone();
        }
        if let Some(course_level) = &update.course_level {
            self.course_level = Some(course_level.clone());
        }
        if let Some(course_price) = update.course_price {
            self.course_price = Some(course_price);
        }
        self.course_thumbnail = update.course_thumbnail.clone();
        self.updated_at = DateTime::now();
    }
}

impl TryFrom<Document> for Course {
    type Error = bson::de::Error;

    fn try_from(document: Document) -> Result<Course, Self::Error> {
        bson::from_document(document)
    }
}

/// Takes `https://host/.../v123/abc123.png` to `abc123`. Assets uploaded
/// into `folder` keep it as prefix, so `.../v123/folder/abc123.png` becomes
/// `folder/abc123`.
pub fn public_id_from_url(url: &str, folder: Option<&str>) -> Option<String> {
    let name = url
        .rsplit('/')
        .next()
        .and_then(|file_name| file_name.split('.').next())
        .filter(|name| !name.is_empty())?;
    match folder.map(|folder| folder.trim_matches('/')) {
        Some(folder) if !folder.is_empty() => Some(format!("{}/{}", folder, name)),
        _ => Some(name.to_string()),
    }
}

#[derive(Apiv2Schema, Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum CourseLevel {
    Beginner,
    Medium,
    Advance,
}

impl fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            CourseLevel::Beginner => "Beginner",
            CourseLevel::Medium => "Medium",
            CourseLevel::Advance => "Advance",
        };
        f.write_str(level)
    }
}

impl FromStr for CourseLevel {
    type Err = CourseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Beginner" => Ok(CourseLevel::Beginner),
            "Medium" => Ok(CourseLevel::Medium),
            "Advance" => Ok(CourseLevel::Advance),
            _ => Err(CourseLevelError(s.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("\"courseLevel\" must be one of [Beginner, Medium, Advance], got \"{0}\"")]
pub struct CourseLevelError(String);

/// Fields replaced by an edit. `None` scalars are left as they are, while the
/// thumbnail is always written: an edit without a new upload clears it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CourseUpdate {
    pub course_title: Option<String>,
    pub sub_title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub course_level: Option<CourseLevel>,
    pub course_price: Option<f64>,
    pub course_thumbnail: Option<String>,
}
