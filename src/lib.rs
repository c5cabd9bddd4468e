//! Captioning job broker
//!
//! Accepts requests to caption a media asset, dispatches the work to a
//! pluggable third-party captioning vendor, tracks each job until the vendor
//! reports it ready, and turns the resulting caption files (WebVTT, SRT, SBV,
//! SSA) into plain-text transcripts.

pub mod app_state;
pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod services;
