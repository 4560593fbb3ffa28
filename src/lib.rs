pub mod analyzers;
pub mod config;
pub mod fetch;
pub mod merge;
pub mod output;
pub mod parser;
pub mod stats;
