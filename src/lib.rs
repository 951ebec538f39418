pub mod build;
pub mod check;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod fetch;
pub mod plan;
pub mod registry;
pub mod report;
pub mod scheduler;
pub mod selection;
pub mod workdir;

pub use error::{Result, ReviewError};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FATAL: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;
