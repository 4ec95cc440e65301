pub mod admin;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod routes;
pub mod site;
pub mod sitemap;
pub mod state;
