pub mod remote_commands;
pub mod status_commands;
pub mod utils;
