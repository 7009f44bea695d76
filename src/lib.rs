pub mod api;
pub mod cli;
pub mod conf;
pub mod core;
pub mod pipeline;
pub mod service;
pub mod session;
pub mod table;

#[cfg(feature = "testutil")]
pub mod testutil;
