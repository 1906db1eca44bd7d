//! Split SQL scripts into statements and submit them one by one to a remote
//! SQL execution API, tolerating "already exists" failures.

pub mod batch;
pub mod cli;
pub mod config;
pub mod event;
pub mod executor;
pub mod handlers;
pub mod logging;
pub mod printer;
pub mod response;
pub mod script;
pub mod source;
pub mod utils;
