pub mod client;
pub mod error;
pub mod source;
pub mod wire;

pub use client::GithubClient;
pub use error::FetchError;
pub use source::{CachedTreeSource, TreeSource};
