pub mod api;
pub mod cli;
pub mod db;
pub mod paths;
pub mod prompts;
