pub mod config;
pub mod convert;
pub mod query;
pub mod results;
pub mod session;
pub mod util;
pub mod web;
