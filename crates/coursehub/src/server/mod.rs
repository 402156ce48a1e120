use crate::{
    config::Config,
    identity::RequesterIdentity,
    media::{Cloudinary, MediaStore},
    routes::{courses, json_config},
};

use actix_cors::Cors;
use actix_web::{
    dev::Server as ActixServer,
    middleware::{Compress, Logger},
    App, HttpServer,
};
use coursehub_db::CourseRepository;
use log::info;
use paperclip::{
    actix::{web, OpenApiExt},
    v2::models::{DefaultApiRaw, Info, Tag},
};
use std::{io, sync::Arc};

mod data;

pub use data::*;

pub struct Server;

impl Server {
    pub fn start(
        config: Config,
        database: Arc<dyn CourseRepository>,
    ) -> Result<ActixServer, io::Error> {
        info!("Starting CourseHub API server on {}", config.bind_address);
        let bind_address = config.bind_address.clone();

        Ok(HttpServer::new(move || {
            let spec = DefaultApiRaw {
                tags: vec![
                    Tag {
                        name: "Courses".to_string(),
                        description: Some("Course catalog and authoring".to_string()),
                        external_docs: None,
                    },
                    Tag {
                        name: "Lectures".to_string(),
                        description: Some("Lectures of a course".to_string()),
                        external_docs: None,
                    },
                ],
                info: Info {
                    title: "CourseHub API".into(),
                    description: Some(
                        "Create, search, edit and publish courses of an online learning platform."
                            .into(),
                    ),
                    ..Default::default()
                },
                ..Default::default()
            };
            let media: Arc<dyn MediaStore> = Arc::new(Cloudinary::new(&config.media));
            let data: ServerData = Arc::new(Data::new(database.clone(), media));

            App::new()
                .wrap_api_with_spec(spec)
                .app_data(web::Data::new(data))
                .app_data(json_config())
                .service(courses::service())
                .with_json_spec_at("/api/spec")
                .wrap(RequesterIdentity::new(config.requester_header.clone()))
                .wrap(Cors::permissive())
                .wrap(Compress::default())
                .wrap(Logger::default())
                .build()
        })
        .bind(bind_address)?
        .workers(num_cpus::get())
        .run())
    }
}
