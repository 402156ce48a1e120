use bson::{doc, oid::ObjectId, DateTime, Document};
use coursehub_common::{Course, CourseUpdate};
use std::cmp::Ordering;

/// Which courses to match. Every set criterion must hold.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CourseFilter {
    pub published: Option<bool>,
    /// Case-insensitive substring of the title, subtitle or category.
    pub text: Option<String>,
    /// Restricts the category to this set when non-empty.
    pub categories: Vec<String>,
    pub creator: Option<ObjectId>,
}

impl CourseFilter {
    pub fn published() -> Self {
        CourseFilter {
            published: Some(true),
            ..CourseFilter::default()
        }
    }

    pub fn by_creator(creator: ObjectId) -> Self {
        CourseFilter {
            creator: Some(creator),
            ..CourseFilter::default()
        }
    }

    pub fn to_document(&self) -> Document {
        let mut filter = doc! {};
        if let Some(published) = self.published {
            filter.insert("isPublished", published);
        }
        if let Some(creator) = self.creator {
            filter.insert("creator", creator);
        }
        if let Some(text) = self.get_text() {
            let pattern = format!(".*{}.*", regex::escape(text));
            let fields = ["courseTitle", "subTitle", "category"];
            let any_of: Vec<Document> = fields
                .iter()
                .map(|field| {
                    doc! {
                        *field: {
                            "$regex": pattern.clone(),
                            "$options": "i"
                        }
                    }
                })
                .collect();
            filter.insert("$or", any_of);
        }
        if !self.categories.is_empty() {
            filter.insert(
                "category",
                doc! {
                    "$in": self.categories.clone()
                },
            );
        }
        filter
    }

    pub fn matches(&self, course: &Course) -> bool {
        if let Some(published) = self.published {
            if course.is_published() != published {
                return false;
            }
        }
        if let Some(creator) = &self.creator {
            if course.get_creator() != creator {
                return false;
            }
        }
        if let Some(text) = self.get_text() {
            let text = text.to_lowercase();
            let contains = |value: Option<&String>| {
                value.map_or(false, |value| value.to_lowercase().contains(&text))
            };
            if !contains(Some(course.get_course_title()))
                && !contains(course.get_sub_title())
                && !contains(Some(course.get_category()))
            {
                return false;
            }
        }
        if !self.categories.is_empty() && !self.categories.contains(course.get_category()) {
            return false;
        }
        true
    }

    /// An empty search text matches everything and is dropped from the filter.
    fn get_text(&self) -> Option<&String> {
        self.text.as_ref().filter(|text| !text.is_empty())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PriceSort {
    Ascending,
    Descending,
}

impl PriceSort {
    /// `low` sorts cheapest first, `high` most expensive first, anything else
    /// leaves the order to the store.
    pub fn from_query(value: &str) -> Option<Self> {
        match value {
            "low" => Some(PriceSort::Ascending),
            "high" => Some(PriceSort::Descending),
            _ => None,
        }
    }

    pub fn to_document(self) -> Document {
        match self {
            PriceSort::Ascending => doc! { "coursePrice": 1 },
            PriceSort::Descending => doc! { "coursePrice": -1 },
        }
    }

    pub fn compare(self, a: &Course, b: &Course) -> Ordering {
        let ordering = a
            .get_course_price()
            .partial_cmp(&b.get_course_price())
            .unwrap_or(Ordering::Equal);
        match self {
            PriceSort::Ascending => ordering,
            PriceSort::Descending => ordering.reverse(),
        }
    }
}

/// 1-based page of `limit` records.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        if self.limit == 0 {
            0
        } else {
            total.div_ceil(self.limit)
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CourseQuery {
    pub filter: CourseFilter,
    pub sort: Option<PriceSort>,
    pub pagination: Option<Pagination>,
}

impl CourseQuery {
    pub fn new(filter: CourseFilter) -> Self {
        CourseQuery {
            filter,
            ..CourseQuery::default()
        }
    }
}

/// `$set` for every supplied field plus the thumbnail, or `$unset` of the
/// thumbnail when no new one was uploaded.
pub fn update_document(update: &CourseUpdate, updated_at: DateTime) -> Document {
    let mut set = doc! {};
    if let Some(course_title) = &update.course_title {
        set.insert("courseTitle", course_title.clone());
    }
    if let Some(sub_title) = &update.sub_title {
        set.insert("subTitle", sub_title.clone());
    }
    if let Some(description) = &update.description {
        set.insert("description", description.clone());
    }
    if let Some(category) = &update.category {
        set.insert("category", category.clone());
    }
    if let Some(course_level) = &update.course_level {
        set.insert("courseLevel", course_level.to_string());
    }
    if let Some(course_price) = update.course_price {
        set.insert("coursePrice", course_price);
    }
    set.insert("updatedAt", updated_at);

    let mut update_doc = doc! {};
    match &update.course_thumbnail {
        Some(course_thumbnail) => {
            set.insert("courseThumbnail", course_thumbnail.clone());
            update_doc.insert("$set", set);
        }
        None => {
            update_doc.insert("$set", set);
            update_doc.insert("$unset", doc! { "courseThumbnail": "" });
        }
    }
    update_doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursehub_common::CourseLevel;

    fn course(title: &str, sub_title: Option<&str>, category: &str) -> Course {
        let mut course = Course::insert(ObjectId::new(), title.to_string(), category.to_string());
        course.apply(&CourseUpdate {
            sub_title: sub_title.map(String::from),
            ..CourseUpdate::default()
        });
        course.set_published(true);
        course
    }

    #[test]
    fn published_filter_document() {
        assert_eq!(
            CourseFilter::published().to_document(),
            doc! { "isPublished": true }
        );
    }

    #[test]
    fn search_filter_document_escapes_text() {
        let filter = CourseFilter {
            published: Some(true),
            text: Some("c++".to_string()),
            categories: vec!["Programming".to_string()],
            creator: None,
        };

        assert_eq!(
            filter.to_document(),
            doc! {
                "isPublished": true,
                "$or": [
                    { "courseTitle": { "$regex": ".*c\\+\\+.*", "$options": "i" } },
                    { "subTitle": { "$regex": ".*c\\+\\+.*", "$options": "i" } },
                    { "category": { "$regex": ".*c\\+\\+.*", "$options": "i" } },
                ],
                "category": { "$in": ["Programming"] },
            }
        );
    }

    #[test]
    fn empty_text_is_dropped() {
        let filter = CourseFilter {
            text: Some(String::new()),
            ..CourseFilter::published()
        };
        assert_eq!(filter.to_document(), doc! { "isPublished": true });
    }

    #[test]
    fn text_matches_title_subtitle_or_category() {
        let filter = CourseFilter {
            text: Some("react".to_string()),
            ..CourseFilter::published()
        };

        assert!(filter.matches(&course("Learn React", None, "Web")));
        assert!(filter.matches(&course("Hooks", Some("Modern REACT patterns"), "Web")));
        assert!(filter.matches(&course("Hooks", None, "React Native")));
        assert!(!filter.matches(&course("Vue", Some("Composition API"), "Web")));
    }

    #[test]
    fn categories_restrict_regardless_of_text() {
        let filter = CourseFilter {
            categories: vec!["Web Development".to_string()],
            ..CourseFilter::published()
        };

        assert!(filter.matches(&course("Any", None, "Web Development")));
        assert!(!filter.matches(&course("Web Development 101", None, "Design")));
    }

    #[test]
    fn unpublished_courses_never_match_published_filter() {
        let mut draft = course("Learn React", None, "Web");
        draft.set_published(false);
        assert!(!CourseFilter::published().matches(&draft));
    }

    #[test]
    fn price_sort_from_query() {
        assert_eq!(PriceSort::from_query("low"), Some(PriceSort::Ascending));
        assert_eq!(PriceSort::from_query("high"), Some(PriceSort::Descending));
        assert_eq!(PriceSort::from_query(""), None);
        assert_eq!(PriceSort::from_query("cheap"), None);
    }

    #[test]
    fn pagination_math() {
        let pagination = Pagination { page: 3, limit: 10 };
        assert_eq!(pagination.skip(), 20);
        assert_eq!(pagination.total_pages(0), 0);
        assert_eq!(pagination.total_pages(20), 2);
        assert_eq!(pagination.total_pages(21), 3);
        assert_eq!(Pagination { page: 1, limit: 10 }.skip(), 0);
    }

    #[test]
    fn update_document_unsets_missing_thumbnail() {
        let update = CourseUpdate {
            course_title: Some("New".to_string()),
            course_level: Some(CourseLevel::Beginner),
            course_price: Some(19.5),
            ..CourseUpdate::default()
        };

        assert_eq!(
            update_document(&update, DateTime::from_millis(42)),
            doc! {
                "$set": {
                    "courseTitle": "New",
                    "courseLevel": "Beginner",
                    "coursePrice": 19.5,
                    "updatedAt": DateTime::from_millis(42),
                },
                "$unset": { "courseThumbnail": "" },
            }
        );
    }

    #[test]
    fn update_document_sets_new_thumbnail() {
        let update = CourseUpdate {
            course_thumbnail: Some("https://cdn.example/new.png".to_string()),
            ..CourseUpdate::default()
        };

        assert_eq!(
            update_document(&update, DateTime::from_millis(7)),
            doc! {
                "$set": {
                    "updatedAt": DateTime::from_millis(7),
                    "courseThumbnail": "https://cdn.example/new.png",
                },
            }
        );
    }
}
