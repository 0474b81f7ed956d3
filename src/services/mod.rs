// Service module exports

pub mod config;
pub mod database;
pub mod meeting;
pub mod provider;
pub mod settings;
