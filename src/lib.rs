#[macro_use] pub mod core;

pub mod calculation;
pub mod cli;
pub mod company;
pub mod config;
pub mod db;
pub mod formatting;
pub mod storage;
pub mod taxes;
pub mod types;
pub mod util;
