use crate::{
    routes::{message_response, QsQuery},
    server::ServerData,
};

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use coursehub_common::CourseResponse;
use coursehub_db::{CourseFilter, CourseQuery, DatabaseError, Pagination, PriceSort};
use log::error;
use paperclip::actix::{api_v2_errors, api_v2_operation, web, Apiv2Schema};
use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;

const DEFAULT_PAGE: u64 = 1;
const DEFAULT_LIMIT: u64 = 10;

#[derive(Apiv2Schema, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCourses {
    #[serde(default)]
    query: String,
    #[serde(default, deserialize_with = "deserialize_categories")]
    categories: Vec<String>,
    /// `low` sorts by ascending, `high` by descending price.
    #[serde(default)]
    sort_by_price: String,
    #[serde(default = "default_page", deserialize_with = "deserialize_page")]
    page: u64,
    #[serde(default = "default_limit", deserialize_with = "deserialize_limit")]
    limit: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

fn deserialize_page<'de, D>(de: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let page = u64::deserialize(de)?;
    if page == 0 {
        return Err(de::Error::custom("page must be at least 1"));
    }
    Ok(page)
}

fn deserialize_limit<'de, D>(de: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let limit = u64::deserialize(de)?;
    if limit == 0 {
        return Err(de::Error::custom("limit must be at least 1"));
    }
    Ok(limit)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Accepts `categories=a` as well as `categories[]=a&categories[]=b`. Empty
/// entries are dropped.
fn deserialize_categories<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let categories = match OneOrMany::deserialize(de)? {
        OneOrMany::One(category) => vec![category],
        OneOrMany::Many(categories) => categories,
    };
    Ok(categories
        .into_iter()
        .filter(|category| !category.is_empty())
        .collect())
}

impl SearchCourses {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
        }
    }

    /// Published courses matching the text and categories, optionally sorted
    /// by price, one page at a time.
    pub fn into_query(self) -> CourseQuery {
        let pagination = self.pagination();
        let text = Some(self.query).filter(|query| !query.is_empty());
        CourseQuery {
            filter: CourseFilter {
                published: Some(true),
                text,
                categories: self.categories,
                creator: None,
            },
            sort: PriceSort::from_query(&self.sort_by_price),
            pagination: Some(pagination),
        }
    }
}

#[derive(Apiv2Schema, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCoursesResponse {
    success: bool,
    courses: Vec<CourseResponse>,
    total_courses: u64,
    total_pages: u64,
    current_page: u64,
}

impl SearchCoursesResponse {
    pub fn new(courses: Vec<CourseResponse>, total_courses: u64, pagination: Pagination) -> Self {
        SearchCoursesResponse {
            success: true,
            courses,
            total_courses,
            total_pages: pagination.total_pages(total_courses),
            current_page: pagination.page,
        }
    }
}

#[api_v2_operation(tags(Courses))]
pub async fn search_courses(
    data: web::Data<ServerData>,
    query: QsQuery<SearchCourses>,
) -> Result<web::Json<SearchCoursesResponse>, SearchCoursesError> {
    let res = data.search_courses(query.into_inner()).await?;
    Ok(web::Json(res))
}

#[api_v2_errors(code = 400, code = 500)]
#[derive(Debug, Error)]
pub enum SearchCoursesError {
    #[error("[SearchCoursesError::Database]: {0}")]
    Database(#[from] DatabaseError),
}

impl ResponseError for SearchCoursesError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        error!("{}", self);
        message_response(self.status_code(), "Failed to search courses.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> Result<SearchCourses, serde_qs::Error> {
        serde_qs::Config::new(5, false).deserialize_str(query)
    }

    #[test]
    fn defaults_to_first_page() {
        let search = parse("").unwrap();

        assert_eq!(search.page, 1);
        assert_eq!(search.limit, 10);
        assert!(search.categories.is_empty());

        let query = search.into_query();
        assert_eq!(query.filter.text, None);
        assert_eq!(query.filter.published, Some(true));
        assert_eq!(query.sort, None);
    }

    #[test]
    fn reads_every_parameter() {
        let search = parse(
            "query=rust&categories%5B%5D=Programming&categories%5B%5D=Design\
             &sortByPrice=high&page=2&limit=3",
        )
        .unwrap();
        let query = search.into_query();

        assert_eq!(query.filter.text.as_deref(), Some("rust"));
        assert_eq!(
            query.filter.categories,
            vec!["Programming".to_string(), "Design".to_string()]
        );
        assert_eq!(query.sort, Some(PriceSort::Descending));
        assert_eq!(query.pagination, Some(Pagination { page: 2, limit: 3 }));
    }

    #[test]
    fn single_category_is_accepted() {
        let search = parse("categories=Programming").unwrap();
        assert_eq!(search.categories, vec!["Programming".to_string()]);

        let search = parse("categories=").unwrap();
        assert!(search.categories.is_empty());
    }

    #[test]
    fn rejects_zero_limit_and_page() {
        assert!(parse("limit=0").is_err());
        assert!(parse("page=0").is_err());
    }

    #[test]
    fn accepts_large_limit() {
        let search = parse("limit=500").unwrap();
        assert_eq!(search.limit, 500);
        assert_eq!(
            search.into_query().pagination,
            Some(Pagination { page: 1, limit: 500 })
        );
    }

    #[test]
    fn total_pages_rounds_up() {
        let res = SearchCoursesResponse::new(vec![], 5, Pagination { page: 1, limit: 2 });
        assert_eq!(res.total_pages, 3);
        assert_eq!(res.current_page, 1);
        assert!(res.success);
    }
}
