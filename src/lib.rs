//! Library exports for the extraction API
//! 
//! This module exposes internal components for testing and potential library usage.

pub mod config;
pub mod error;
pub mod extractor;
pub mod handler;
pub mod middleware;
pub mod model;
pub mod route;
