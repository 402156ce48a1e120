use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
    #[error("[DatabaseError::Serialize]: {0}")]
    Serialize(#[from] bson::ser::Error),
    #[error("[DatabaseError::Deserialize]: {0}")]
    Deserialize(#[from] bson::de::Error),
}
