// Wed Jan 15 2026 - Alex

pub mod args;
pub mod handler;

pub use args::{AnnotateArgs, Args, Command, RunArgs, StabilityArgs};
pub use handler::CommandHandler;

use clap::Parser;

pub fn parse_args() -> Args {
    Args::parse()
}

pub fn run() -> anyhow::Result<()> {
    let args = parse_args();
    if args.no_color {
        colored::control::set_override(false);
    }
    let handler = CommandHandler::new().with_color(!args.no_color);
    handler.execute(args)
}
