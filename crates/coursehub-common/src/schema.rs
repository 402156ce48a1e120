use thiserror::Error;

/// A key in a validation schema together with its rule.
#[derive(Clone, Copy, Debug)]
pub struct Key {
    name: &'static str,
    rule: Rule,
}

#[derive(Clone, Copy, Debug)]
enum Rule {
    RequiredString,
}

impl Key {
    pub const fn required_string(name: &'static str) -> Self {
        Key {
            name,
            rule: Rule::RequiredString,
        }
    }
}

/// Read access to the string fields of a request body, by their wire name.
pub trait Fields {
    fn field(&self, key: &str) -> Option<&str>;
}

/// A stateless object schema. Schemas are plain statics and may be shared
/// between any number of concurrent requests.
#[derive(Debug)]
pub struct Schema {
    keys: &'static [Key],
}

impl Schema {
    pub const fn new(keys: &'static [Key]) -> Self {
        Schema { keys }
    }

    /// Checks the keys in declaration order and stops at the first failure.
    pub fn validate<T>(&self, value: &T) -> Result<(), ValidationError>
    where
        T: Fields + ?Sized,
    {
        for key in self.keys {
            match key.rule {
                Rule::RequiredString => match value.field(key.name) {
                    None => return Err(ValidationError::Required(key.name)),
                    Some("") => return Err(ValidationError::Empty(key.name)),
                    Some(_) => {}
                },
            }
        }
        Ok(())
    }
}

static COURSE_KEYS: [Key; 2] = [
    Key::required_string("courseTitle"),
    Key::required_string("category"),
];

static LECTURE_KEYS: [Key; 1] = [Key::required_string("lectureTitle")];

pub static COURSE_SCHEMA: Schema = Schema::new(&COURSE_KEYS);

pub static LECTURE_SCHEMA: Schema = Schema::new(&LECTURE_KEYS);

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("\"{0}\" is required")]
    Required(&'static str),
    #[error("\"{0}\" is not allowed to be empty")]
    Empty(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Body(HashMap<&'static str, &'static str>);

    impl Fields for Body {
        fn field(&self, key: &str) -> Option<&str> {
            self.0.get(key).copied()
        }
    }

    fn body(fields: &[(&'static str, &'static str)]) -> Body {
        Body(fields.iter().copied().collect())
    }

    #[test]
    fn accepts_complete_course() {
        let body = body(&[("courseTitle", "Rust"), ("category", "Programming")]);
        assert_eq!(COURSE_SCHEMA.validate(&body), Ok(()));
    }

    #[test]
    fn reports_first_missing_key() {
        let err = COURSE_SCHEMA.validate(&body(&[])).unwrap_err();
        assert_eq!(err, ValidationError::Required("courseTitle"));
        assert_eq!(err.to_string(), "\"courseTitle\" is required");

        let err = COURSE_SCHEMA
            .validate(&body(&[("courseTitle", "Rust")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "\"category\" is required");
    }

    #[test]
    fn rejects_empty_strings() {
        let err = COURSE_SCHEMA
            .validate(&body(&[("courseTitle", ""), ("category", "Programming")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "\"courseTitle\" is not allowed to be empty");
    }

    #[test]
    fn lecture_schema_requires_title() {
        assert_eq!(
            LECTURE_SCHEMA.validate(&body(&[])),
            Err(ValidationError::Required("lectureTitle"))
        );
        assert_eq!(
            LECTURE_SCHEMA.validate(&body(&[("lectureTitle", "Intro")])),
            Ok(())
        );
    }
}
