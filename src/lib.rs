pub mod blobstore;
pub mod config;
pub mod preview;
pub mod web;
