// CLI module
// Command-line interface and argument parsing

pub mod args;

pub use args::{parse_args, CliArgs};
