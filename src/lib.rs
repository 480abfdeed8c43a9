//! Backend for the disaster-management training tracking dashboard.
//!
//! [`analytics`] holds the pure aggregation functions behind the dashboard
//! and analytics views; everything else is the service around them.

pub mod analytics;
pub mod app;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod feed;
pub mod map;
pub mod middleware;
pub mod modules;
pub mod telemetry;
pub mod websocket;
