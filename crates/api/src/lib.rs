//! HTTP gateway: access-control middleware in front of the platform routes.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
