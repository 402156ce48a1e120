use crate::{format_timestamp, Course, CourseLevel, Lecture};

use coursehub_auth::User;
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

#[derive(Apiv2Schema, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    #[serde(rename = "_id")]
    id: String,
    course_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    course_level: Option<CourseLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    course_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    course_thumbnail: Option<String>,
    creator: CreatorResponse,
    is_published: bool,
    lectures: Vec<String>,
    created_at: String,
    updated_at: String,
}

/// The course creator. `name` and `photoUrl` are only present when the
/// creator has been populated from the users collection.
#[derive(Apiv2Schema, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorResponse {
    #[serde(rename = "_id")]
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo_url: Option<String>,
}

impl CourseResponse {
    pub fn from_course(course: Course, creator: Option<&User>) -> CourseResponse {
        CourseResponse {
            id: course.get_id().to_hex(),
            course_title: course.get_course_title().clone(),
            sub_title: course.get_sub_title().cloned(),
            description: course.get_description().cloned(),
            category: course.get_category().clone(),
            course_level: course.get_course_level().cloned(),
            course_price: course.get_course_price(),
            course_thumbnail: course.get_course_thumbnail().cloned(),
            creator: CreatorResponse {
                id: course.get_creator().to_hex(),
                name: creator.map(|user| user.get_name().clone()),
                photo_url: creator.and_then(|user| user.get_photo_url().cloned()),
            },
            is_published: course.is_published(),
            lectures: course
                .get_lectures()
                .iter()
                .map(|lecture| lecture.to_hex())
                .collect(),
            created_at: format_timestamp(course.get_created_at()),
            updated_at: format_timestamp(course.get_updated_at()),
        }
    }

    /// Pairs each course with its creator out of an already fetched user list.
    pub fn from_courses(courses: Vec<Course>, users: &[User]) -> Vec<CourseResponse> {
        courses
            .into_iter()
            .map(|course| {
                let creator = users
                    .iter()
                    .find(|user| user.get_id() == course.get_creator());
                CourseResponse::from_course(course, creator)
            })
            .collect()
    }
}

#[derive(Apiv2Schema, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureResponse {
    #[serde(rename = "_id")]
    id: String,
    lecture_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    public_id: Option<String>,
    is_preview_free: bool,
    created_at: String,
    updated_at: String,
}

impl From<Lecture> for LectureResponse {
    fn from(lecture: Lecture) -> Self {
        LectureResponse {
            id: lecture.get_id().to_hex(),
            lecture_title: lecture.get_lecture_title().clone(),
            video_url: lecture.get_video_url().cloned(),
            public_id: lecture.get_public_id().cloned(),
            is_preview_free: lecture.is_preview_free(),
            created_at: format_timestamp(lecture.get_created_at()),
            updated_at: format_timestamp(lecture.get_updated_at()),
        }
    }
}
