//! REST contract of the cover generator service

mod admin;
pub mod client;
pub mod github;
pub mod types;

pub use client::ApiClient;
pub use github::GithubClient;
