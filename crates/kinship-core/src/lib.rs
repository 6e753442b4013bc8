pub mod config;
pub mod error;
pub mod model;
pub mod password;
pub mod query;
pub mod storage;
