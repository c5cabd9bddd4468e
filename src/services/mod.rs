pub mod client;
pub mod job_store;
pub mod output_url;
pub mod provider;
pub mod three_play;
pub mod transcript;
