use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::tempdir;

fn run(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cipherflow"))
        .args(args)
        .env("HOME", home)
        .output()
        .expect("run cipherflow")
}

fn run_with_stdin(home: &Path, args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_cipherflow"))
        .args(args)
        .env("HOME", home)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn cipherflow");
    child
        .stdin
        .take()
        .expect("stdin handle")
        .write_all(input.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait cipherflow")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn assert_ok(output: &Output) {
    assert!(
        output.status.success(),
        "stdout:\n{}\nstderr:\n{}",
        stdout(output),
        stderr(output)
    );
}

fn assert_err_contains(output: &Output, needle: &str) {
    assert!(
        !output.status.success(),
        "expected failure, stdout:\n{}\nstderr:\n{}",
        stdout(output),
        stderr(output)
    );
    let text = format!("{}{}", stdout(output), stderr(output));
    assert!(
        text.contains(needle),
        "expected error to contain `{needle}`, got:\n{text}"
    );
}

fn write_recipe(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("write recipe");
    path
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

#[test]
fn no_arguments_prints_help() {
    let home = tempdir().expect("tempdir");
    let output = run(home.path(), &[]);
    assert_ok(&output);
    let text = stdout(&output);
    assert!(text.contains("Usage: cipherflow"));
    assert!(text.contains("base64Encode"));
}

#[test]
fn unknown_command_fails() {
    let home = tempdir().expect("tempdir");
    assert_err_contains(&run(home.path(), &["decode"]), "unknown command `decode`");
}

#[test]
fn operations_lists_categories_in_order() {
    let home = tempdir().expect("tempdir");
    let output = run(home.path(), &["operations"]);
    assert_ok(&output);
    let text = stdout(&output);
    let categories: Vec<&str> = text
        .lines()
        .filter(|line| !line.starts_with(' ') && !line.is_empty())
        .collect();
    assert_eq!(categories, vec!["URL", "Base64", "Hex", "HTML", "Unicode"]);
    assert!(text.contains("urlDecode"));
    assert!(text.contains("Unicode Unescape"));
}

#[test]
fn run_applies_recipe_to_input_flag() {
    let home = tempdir().expect("tempdir");
    let recipe = write_recipe(
        home.path(),
        "recipe.json",
        r#"{"version":1,"steps":[{"operationId":"urlDecode"},{"operationId":"base64Encode"}]}"#,
    );
    let output = run(
        home.path(),
        &["run", path_arg(&recipe), "--input", "hello%20world"],
    );
    assert_ok(&output);
    assert_eq!(stdout(&output), "aGVsbG8gd29ybGQ=\n");
}

#[test]
fn run_reads_input_from_stdin() {
    let home = tempdir().expect("tempdir");
    let recipe = write_recipe(home.path(), "recipe.json", r#"[{"operationId":"hexEncode"}]"#);
    let output = run_with_stdin(home.path(), &["run", path_arg(&recipe)], "hi");
    assert_ok(&output);
    assert_eq!(stdout(&output), "6869\n");
}

#[test]
fn run_reports_failing_step() {
    let home = tempdir().expect("tempdir");
    let recipe = write_recipe(
        home.path(),
        "recipe.json",
        r#"[{"operationId":"hexEncode"},{"operationId":"hexDecode"},{"operationId":"hexDecode"}]"#,
    );
    let output = run(home.path(), &["run", path_arg(&recipe), "--input", "abc"]);
    assert_err_contains(&output, "step 3 `hexDecode` failed");
}

#[test]
fn run_trace_shows_every_step_and_succeeds() {
    let home = tempdir().expect("tempdir");
    let recipe = write_recipe(
        home.path(),
        "recipe.json",
        r#"[{"operationId":"hexDecode"},{"operationId":"hexEncode"}]"#,
    );
    let output = run(
        home.path(),
        &["run", path_arg(&recipe), "--input", "abc", "--trace"],
    );
    assert_ok(&output);
    let text = stdout(&output);
    assert!(text.contains("step 1 hexDecode error: hex input has odd length (3 characters)"));
    assert!(text.contains("step 2 hexEncode skipped"));
    assert!(text.trim_end().ends_with("abc"));
}

#[test]
fn run_rejects_unknown_operation_in_recipe() {
    let home = tempdir().expect("tempdir");
    let recipe = write_recipe(home.path(), "recipe.json", r#"[{"operationId":"doesNotExist"}]"#);
    let output = run(home.path(), &["run", path_arg(&recipe), "--input", "x"]);
    assert_err_contains(&output, "step 1 uses unknown operation: doesNotExist");
}

#[test]
fn check_prints_normalized_recipe() {
    let home = tempdir().expect("tempdir");
    let recipe = write_recipe(
        home.path(),
        "legacy.json",
        r#"{"pipeline":[{"operationId":"base64Encode"}]}"#,
    );
    let output = run(home.path(), &["check", path_arg(&recipe)]);
    assert_ok(&output);
    let value: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("normalized recipe is json");
    assert_eq!(
        value,
        serde_json::json!({
            "version": 1,
            "steps": [{"operationId": "base64Encode", "config": {"urlSafe": false, "includePadding": true}}]
        })
    );
}

#[test]
fn check_fails_on_missing_file() {
    let home = tempdir().expect("tempdir");
    let missing = home.path().join("missing.json");
    assert_err_contains(
        &run(home.path(), &["check", path_arg(&missing)]),
        "failed to read recipe",
    );
}

#[test]
fn global_settings_bound_input_size() {
    let home = tempdir().expect("tempdir");
    let state = home.path().join(".cipherflow");
    fs::create_dir_all(&state).expect("state dir");
    fs::write(state.join("config.yaml"), "max_input_bytes: 3\n").expect("write config");
    let recipe = write_recipe(home.path(), "recipe.json", r#"[{"operationId":"hexEncode"}]"#);

    let output = run(home.path(), &["run", path_arg(&recipe), "--input", "hello"]);
    assert_err_contains(&output, "input of 5 bytes exceeds limit of 3 bytes");
}

#[test]
fn config_flag_enables_run_log() {
    let home = tempdir().expect("tempdir");
    let log_path = home.path().join("logs/runs.log");
    let config = home.path().join("settings.yaml");
    fs::write(
        &config,
        format!("run_log: {}\npretty_recipes: false\n", log_path.display()),
    )
    .expect("write config");
    let recipe = write_recipe(home.path(), "recipe.json", r#"[{"operationId":"htmlEncode"}]"#);

    let output = run(
        home.path(),
        &[
            "--config",
            path_arg(&config),
            "run",
            path_arg(&recipe),
            "--input",
            "<p>",
        ],
    );
    assert_ok(&output);
    assert_eq!(stdout(&output), "&lt;p&gt;\n");

    let log = fs::read_to_string(&log_path).expect("run log written");
    let entry: serde_json::Value =
        serde_json::from_str(log.lines().next().expect("one entry")).expect("json line");
    assert_eq!(entry["event"], "pipeline.run");
    assert_eq!(entry["level"], "info");

    let check = run(
        home.path(),
        &["--config", path_arg(&config), "check", path_arg(&recipe)],
    );
    assert_ok(&check);
    assert_eq!(
        stdout(&check),
        "{\"version\":1,\"steps\":[{\"operationId\":\"htmlEncode\",\"config\":{}}]}\n"
    );
}

#[test]
fn invalid_config_file_fails_commands() {
    let home = tempdir().expect("tempdir");
    let config = home.path().join("settings.yaml");
    fs::write(&config, "max_input_bytes: 0\n").expect("write config");
    let recipe = write_recipe(home.path(), "recipe.json", "[]");
    assert_err_contains(
        &run(home.path(), &["--config", path_arg(&config), "check", path_arg(&recipe)]),
        "max_input_bytes",
    );
}
