pub mod config;
pub mod mail;
pub mod pdf;
pub mod persistence;
