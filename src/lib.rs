pub mod config;
pub mod logging;
pub mod project;
pub mod store;
pub mod update;
pub mod version;
