pub mod calc_command;
pub mod charge;
pub mod config;
pub mod console;
pub mod datetime;
pub mod elapsed;
pub mod entry;
pub mod interactive_command;
pub mod report;
pub mod timestamp;
