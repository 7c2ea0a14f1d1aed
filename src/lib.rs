#[macro_use]
extern crate diesel;

pub mod db;
pub mod feeds;
pub mod models;
pub mod schema;
