pub mod config;
pub mod db;
pub mod models;
pub mod schema;
pub mod metrics;
pub mod bots;
pub mod api;

#[macro_use]
extern crate diesel;
