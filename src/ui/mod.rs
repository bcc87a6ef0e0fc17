// Wed Jan 15 2026 - Alex

pub mod cli;
pub mod progress;
pub mod table;

pub use cli::{Args, Command, CommandHandler};
pub use progress::ProgressManager;
pub use table::{Alignment, BorderStyle, TableBuilder};
