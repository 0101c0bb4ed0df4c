pub mod client;
pub mod config;
pub mod consts;
pub mod error;
pub mod events;
pub mod highlight;
pub mod mock;
pub mod operation;
pub mod prefs;
pub mod transport;
