pub mod scores;
pub mod server;

pub use server::run_api_server;
