pub mod config_cmd;
pub mod output;
pub mod run_cmd;
