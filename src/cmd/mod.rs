pub mod agents;
pub mod config_cmd;
pub mod get;
pub mod path;
pub mod read;
pub mod remove;
pub mod sections;
pub mod upsert;
