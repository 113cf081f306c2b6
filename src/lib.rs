//! covergen - terminal client for the AI blog-cover generator
//!
//! Generate candidate covers, pick one, overlay a caption and download a
//! resized export. Also drives the dashboard of past generations and the
//! admin console, all over the service's HTTP API.

pub mod admin;
pub mod api;
pub mod cli;
pub mod core;
pub mod dashboard;
pub mod generator;
pub mod landing;
pub mod output;

pub use core::config::Config;
pub use core::error::{Error, Result};
