pub mod backup;
pub mod config;
pub mod data_storage;
pub mod export;
pub mod input;
pub mod messages;
pub mod record;
pub mod view;
