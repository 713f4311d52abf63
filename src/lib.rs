pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod records;
pub mod reference_matcher;
pub mod site_groups;
pub mod tissue_map;
pub mod tracks;

pub use error::{NovelError, Result};
