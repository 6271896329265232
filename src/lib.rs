pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod keygen;
pub mod license;
pub mod models;
pub mod util;
