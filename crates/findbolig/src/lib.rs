pub mod auth;
pub mod client;
pub mod config;
pub mod history;
pub mod parser;
pub mod placement;
pub mod run;
pub mod session;
pub mod types;
pub mod waitlist;

pub use client::FindboligClient;
pub use config::PortalConfig;
pub use history::HistoryFile;
pub use run::{RunError, RunOptions, run};

pub(crate) const BASE_URL: &str = "https://www.findbolig.nu/";
