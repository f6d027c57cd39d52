pub mod config;
pub mod dynamics;
pub mod graph;
pub mod output;
pub mod sweep;
pub mod utils;
