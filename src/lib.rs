pub mod cache;
pub mod config;
pub mod db;
mod error;
pub mod extract;
pub mod fetch;
pub mod links;
pub mod paths;
pub mod photos;

pub use error::{AlbumError, Result};
