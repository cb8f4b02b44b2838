pub mod api;
pub mod config;
pub mod downloader;
pub mod humanize;
pub mod observability;
pub mod storage;
