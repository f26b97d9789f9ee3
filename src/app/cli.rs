use crate::catalog::Catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Operations,
    Run,
    Check,
    Help,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "operations" | "ops" => CliVerb::Operations,
        "run" => CliVerb::Run,
        "check" => CliVerb::Check,
        "help" | "--help" | "-h" => CliVerb::Help,
        _ => CliVerb::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Usage: cipherflow [--config <path>] <command> ...".to_string(),
        String::new(),
        "Commands:".to_string(),
        "  operations                           List available operations by category"
            .to_string(),
        "  run <recipe> [--input <text>]        Run a recipe over --input or stdin".to_string(),
        "      [--trace]                        Print every step's result; step failures do not fail the command"
            .to_string(),
        "  check <recipe>                       Validate a recipe and print its normalized form"
            .to_string(),
        "  help                                 Show this help".to_string(),
    ]
}

pub fn operation_help_lines(catalog: &Catalog) -> Vec<String> {
    let mut ids: Vec<_> = catalog.operations().iter().map(|op| op.id).collect();
    ids.sort_unstable();
    ids.into_iter()
        .filter_map(|id| catalog.lookup(id))
        .map(|op| format!("  {0:36} {1}", op.id, op.description))
        .collect()
}

pub(crate) fn help_text() -> String {
    let mut lines = cli_help_lines();
    lines.push(String::new());
    lines.push("Operations:".to_string());
    lines.extend(operation_help_lines(Catalog::builtin()));
    lines.join("\n")
}
