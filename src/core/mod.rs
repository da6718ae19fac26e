pub mod config;

pub use config::EdinetConfig;
