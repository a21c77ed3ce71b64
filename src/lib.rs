pub mod analyze;
pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod export;
pub mod index;
pub mod model;
pub mod parsers;
pub mod path;
pub mod report;
pub mod score;
pub mod source;
pub mod units;
