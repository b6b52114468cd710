pub mod fetcher;
pub mod loader;
pub mod parser;
pub mod registry;
pub mod types;
