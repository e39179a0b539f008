//! Configuration module for Lead-Ripple
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use lead_ripple::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("leads.toml")).unwrap();
//! println!("Target leads: {}", config.crawler.target);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    Config, CrawlerConfig, FilterConfig, OutputConfig, ProvidersConfig, SearchConfig,
    UserAgentConfig,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
