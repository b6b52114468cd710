pub mod config;
pub mod feed;
pub mod importer;
pub mod menu;
pub mod reader;
pub mod view;
