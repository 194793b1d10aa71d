pub mod app;
pub mod args;
pub mod colors;
pub mod commands;
pub mod display;
pub mod utils;

pub use app::JamcacheApp;
pub use args::{Args, Command};
pub use utils::format_number;
