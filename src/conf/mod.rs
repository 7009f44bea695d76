mod combine;
mod config;
mod server;

pub use combine::CombineConfig;
pub use config::Config;
pub use server::ServerConfig;
