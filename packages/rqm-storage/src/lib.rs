pub mod cache;
pub mod catalog;
pub mod db;
pub mod entities;
pub mod models;
pub mod schema;
pub mod search;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
