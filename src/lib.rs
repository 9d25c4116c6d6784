pub mod admin;
pub mod chat;
pub mod config;
pub mod models;
pub mod pricing;
pub mod render;
pub mod reveal;
