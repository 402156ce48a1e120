use actix_web::dev;
use paperclip::actix::{web, Mountable};

pub mod create;
pub mod edit;
pub mod get;
pub mod lectures;
pub mod publish;
pub mod published;
pub mod search;

pub fn service() -> impl dev::HttpServiceFactory + Mountable {
    web::scope("/courses")
        .service(
            web::resource("")
                .route(web::post().to(create::create_course))
                .route(web::get().to(get::get_creator_courses)),
        )
        .service(web::resource("/search").route(web::get().to(search::search_courses)))
        .service(
            web::resource("/published").route(web::get().to(published::get_published_courses)),
        )
        .service(
            web::resource("/{course_id}")
                .route(web::get().to(get::get_course))
                .route(web::put().to(edit::edit_course)),
        )
        .service(
            web::resource("/{course_id}/publish")
                .route(web::patch().to(publish::toggle_publish_course)),
        )
        .service(
            web::resource("/{course_id}/lectures")
                .route(web::post().to(lectures::create_lecture))
                .route(web::get().to(lectures::get_course_lectures)),
        )
}
