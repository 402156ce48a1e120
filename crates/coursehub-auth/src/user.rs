use bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Public projection of an account, as used when populating a course creator.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    photo_url: Option<String>,
}

impl User {
    pub fn new(id: ObjectId, name: String, photo_url: Option<String>) -> Self {
        User {
            id,
            name,
            photo_url,
        }
    }

    pub fn get_id(&self) -> &ObjectId {
        &self.id
    }

    pub fn get_name(&self) -> &String {
        &self.name
    }

    pub fn get_photo_url(&self) -> Option<&String> {
        self.photo_url.as_ref()
    }
}

impl TryFrom<Document> for User {
    type Error = bson::de::Error;

    fn try_from(document: Document) -> Result<User, Self::Error> {
        bson::from_document(document)
    }
}
