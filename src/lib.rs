pub mod config;
pub mod convert;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod tools;
pub mod upload;
