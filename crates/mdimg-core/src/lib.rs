pub mod config;
pub mod logging;

pub mod batch;
pub mod discover;
pub mod error;
pub mod fetch;
pub mod naming;
pub mod rewrite;
pub mod scanner;
pub mod setup;
pub mod storage;

pub use error::Error;
