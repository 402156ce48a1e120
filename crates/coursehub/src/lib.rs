pub mod config;
pub mod identity;
pub mod media;
pub mod routes;
pub mod server;
