pub mod config;
pub mod feed;
pub mod fixtures;
pub mod fpl_fetch;
pub mod http_cache;
pub mod http_client;
pub mod session;
pub mod standings;
pub mod state;
pub mod stats;
pub mod team_detail;
