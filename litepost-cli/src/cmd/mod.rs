pub mod config;
pub mod env;
pub mod history;
pub mod migrate;
pub mod report;
pub mod requests;
pub mod run;
pub mod save;
pub mod send;
