pub mod cli;
pub mod config;
pub mod github;
pub mod http;
pub mod input;
pub mod json_extract;
pub mod llm;
pub mod normalize;
pub mod query;
pub mod search;
pub mod server;
pub mod suggest;
pub mod types;
