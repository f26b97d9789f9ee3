use crate::app::cli::{help_text, parse_cli_verb, CliVerb};
use crate::app::command_support::{load_settings, split_config_flag};
use std::io::Read;

pub mod check;
pub mod operations;
pub mod run;

/// Entry point shared by the binary and tests. `stdin` is read only by `run` when no
/// `--input` is given.
pub fn run_cli(args: Vec<String>, stdin: &mut dyn Read) -> Result<String, String> {
    let (config_path, args) = split_config_flag(args)?;
    if args.is_empty() {
        return Ok(help_text());
    }

    match parse_cli_verb(args[0].as_str()) {
        CliVerb::Operations => operations::cmd_operations(&args[1..]),
        CliVerb::Run => {
            let settings = load_settings(config_path.as_deref())?;
            run::cmd_run(&args[1..], &settings, stdin)
        }
        CliVerb::Check => {
            let settings = load_settings(config_path.as_deref())?;
            check::cmd_check(&args[1..], &settings)
        }
        CliVerb::Help => Ok(help_text()),
        CliVerb::Unknown => Err(format!("unknown command `{}`", args[0])),
    }
}
