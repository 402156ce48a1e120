use crate::epoch;

use bson::{oid::ObjectId, DateTime, Document};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    #[serde(rename = "_id")]
    id: ObjectId,
    lecture_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    public_id: Option<String>,
    #[serde(default)]
    is_preview_free: bool,
    #[serde(default = "epoch")]
    created_at: DateTime,
    #[serde(default = "epoch")]
    updated_at: DateTime,
}

impl Lecture {
    pub fn insert(lecture_title: String) -> Self {
        let now = DateTime::now();
        Lecture {
            id: ObjectId::new(),
            lecture_title,
            video_url: None,
            public_id: None,
            is_preview_free: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn get_id(&self) -> &ObjectId {
        &self.id
    }

    pub fn get_lecture_title(&self) -> &String {
        &self.lecture_title
    }

    pub fn get_video_url(&self) -> Option<&String> {
        self.video_url.as_ref()
    }

    pub fn get_public_id(&self) -> Option<&String> {
        self.public_id.as_ref()
    }

    pub fn is_preview_free(&self) -> bool {
        self.is_preview_free
    }

    pub fn get_created_at(&self) -> DateTime {
        self.created_at
    }

    pub fn get_updated_at(&self) -> DateTime {
        self.updated_at
    }
}

impl TryFrom<Document> for Lecture {
    type Error = bson::de::Error;

    fn try_from(document: Document) -> Result<Lecture, Self::Error> {
        bson::from_document(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn reads_documents_with_date_timestamps() {
        let created_at = DateTime::from_millis(1_700_000_000_000);
        let lecture = Lecture::try_from(doc! {
            "_id": ObjectId::new(),
            "lectureTitle": "Ownership",
            "isPreviewFree": true,
            "createdAt": created_at,
            "updatedAt": created_at,
        })
        .unwrap();

        assert_eq!(lecture.get_lecture_title().as_str(), "Ownership");
        assert!(lecture.is_preview_free());
        assert_eq!(lecture.get_updated_at(), created_at);
    }

    #[test]
    fn stores_timestamps_as_dates() {
        let lecture = Lecture::insert("Borrowing".to_string());
        let document = bson::to_document(&lecture).unwrap();

        assert_eq!(
            document.get_datetime("createdAt").unwrap(),
            &lecture.get_created_at()
        );
    }
}
