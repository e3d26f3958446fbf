//! HTTP API and embedded frontend

pub mod handler;
pub mod server;

pub use server::{router, HttpServer};
