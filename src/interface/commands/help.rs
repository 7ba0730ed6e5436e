//! # Help Command
//!
//! Handles `help` (aliases `commands`, `info`).

use crate::domain::config::BotConfig;
use crate::interface::commands::Reply;

pub fn handle_help(config: &BotConfig) -> Reply {
    Reply::Text(crate::strings::help::main_help(&config.prefix))
}
