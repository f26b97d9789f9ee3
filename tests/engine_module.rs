use cipherflow::catalog::{operation_ids, Catalog};
use cipherflow::engine::{
    run_pipeline, run_pipeline_with_limits, ExecutionLimits, ExecutionState,
};
use cipherflow::operations::{Base64DecodeConfig, Base64EncodeConfig, HexDecodeConfig, OperationConfig};
use cipherflow::pipeline::Pipeline;
use cipherflow::recipe::deserialize_pipeline;

fn pipeline_of(ids: &[&str]) -> Pipeline {
    ids.iter().fold(Pipeline::new(), |pipeline, id| {
        pipeline.add_step(Catalog::builtin(), id)
    })
}

#[test]
fn empty_pipeline_returns_input_unchanged() {
    for input in ["", "hello", "  spaced\r\n"] {
        let report = run_pipeline(Catalog::builtin(), input, &Pipeline::new());
        assert_eq!(report.output, input);
        assert!(report.trace.is_empty());
    }
}

#[test]
fn base64_encode_with_padding() {
    let pipeline = pipeline_of(&[operation_ids::BASE64_ENCODE]);
    let step = pipeline.steps()[0].id();
    let pipeline = pipeline.update_step_config(
        step,
        OperationConfig::Base64Encode(Base64EncodeConfig {
            url_safe: false,
            include_padding: true,
        }),
    );
    let report = run_pipeline(Catalog::builtin(), "hi", &pipeline);
    assert_eq!(report.output, "aGk=");
    assert_eq!(
        report.state(step),
        Some(&ExecutionState::Output("aGk=".to_string()))
    );
}

#[test]
fn base64_decode_repairs_missing_padding() {
    let pipeline = pipeline_of(&[operation_ids::BASE64_DECODE]);
    let step = pipeline.steps()[0].id();
    let pipeline = pipeline.update_step_config(
        step,
        OperationConfig::Base64Decode(Base64DecodeConfig { url_safe: true }),
    );
    let report = run_pipeline(Catalog::builtin(), "aGk", &pipeline);
    assert_eq!(report.output, "hi");
}

#[test]
fn hex_decode_ignores_whitespace() {
    let pipeline = pipeline_of(&[operation_ids::HEX_DECODE]);
    let step = pipeline.steps()[0].id();
    let pipeline = pipeline.update_step_config(
        step,
        OperationConfig::HexDecode(HexDecodeConfig {
            ignore_whitespace: true,
        }),
    );
    assert_eq!(run_pipeline(Catalog::builtin(), "68 69", &pipeline).output, "hi");
}

#[test]
fn single_failing_step_leaves_input_and_one_error() {
    let pipeline = pipeline_of(&[operation_ids::HEX_DECODE]);
    let report = run_pipeline(Catalog::builtin(), "abc", &pipeline);
    assert_eq!(report.output, "abc");
    assert_eq!(report.trace.len(), 1);
    let error = report
        .state(pipeline.steps()[0].id())
        .and_then(ExecutionState::error)
        .expect("error state");
    assert!(error.contains("odd length"), "unexpected error: {error}");
}

#[test]
fn failure_short_circuits_later_steps() {
    let pipeline = pipeline_of(&[
        operation_ids::URL_ENCODE,
        operation_ids::HEX_DECODE,
        operation_ids::BASE64_ENCODE,
    ]);
    let [first, second, third] = [0, 1, 2].map(|index| pipeline.steps()[index].id());

    // "%" url-encodes to "%25", which has an odd number of hex characters.
    let report = run_pipeline(Catalog::builtin(), "%", &pipeline);

    assert_eq!(
        report.state(first),
        Some(&ExecutionState::Output("%25".to_string()))
    );
    assert!(report.state(second).expect("second ran").is_error());
    assert_eq!(report.state(third), None);
    assert_eq!(report.trace.len(), 2);
    assert_eq!(report.output, "%25");
    assert_eq!(report.failed_step(), Some(second));
}

#[test]
fn empty_output_is_distinct_from_not_reached() {
    let pipeline = pipeline_of(&[operation_ids::HEX_DECODE, operation_ids::HEX_ENCODE]);
    let report = run_pipeline(Catalog::builtin(), "", &pipeline);
    for step in pipeline.steps() {
        assert_eq!(report.state(step.id()), Some(&ExecutionState::Output(String::new())));
    }
}

#[test]
fn multi_step_chain_feeds_each_output_forward() {
    let pipeline = pipeline_of(&[
        operation_ids::HTML_ENCODE,
        operation_ids::BASE64_ENCODE,
        operation_ids::BASE64_DECODE,
        operation_ids::HTML_DECODE,
    ]);
    let report = run_pipeline(Catalog::builtin(), "<a href='x'>", &pipeline);
    assert_eq!(report.output, "<a href='x'>");
    assert_eq!(
        report.state(pipeline.steps()[0].id()).and_then(ExecutionState::output),
        Some("&lt;a href=&#39;x&#39;&gt;")
    );
}

#[test]
fn unknown_operation_stops_the_run() {
    let pipeline = pipeline_of(&[
        operation_ids::HEX_ENCODE,
        operation_ids::URL_ENCODE,
        operation_ids::HEX_DECODE,
    ]);
    let builtin = Catalog::builtin();
    let reduced = Catalog::new(
        builtin
            .operations()
            .iter()
            .filter(|op| op.id != operation_ids::URL_ENCODE)
            .copied()
            .collect(),
    )
    .expect("catalog");

    let report = run_pipeline(&reduced, "hi", &pipeline);
    assert_eq!(report.output, "6869");
    assert_eq!(
        report.state(pipeline.steps()[1].id()),
        Some(&ExecutionState::Error(
            "unknown operation: urlEncode".to_string()
        ))
    );
    assert_eq!(report.state(pipeline.steps()[2].id()), None);
}

#[test]
fn mismatched_config_fails_inside_the_step() {
    let pipeline = pipeline_of(&[operation_ids::HEX_ENCODE]);
    let step = pipeline.steps()[0].id();
    let pipeline = pipeline.update_step_config(step, OperationConfig::UnicodeEscape);
    let report = run_pipeline(Catalog::builtin(), "hi", &pipeline);
    assert_eq!(report.output, "hi");
    assert!(report
        .state(step)
        .and_then(ExecutionState::error)
        .expect("error")
        .contains("cannot drive operation `hexEncode`"));
}

#[test]
fn input_limit_applies_to_every_step() {
    let pipeline = pipeline_of(&[operation_ids::HEX_ENCODE, operation_ids::HEX_ENCODE]);
    let limits = ExecutionLimits {
        max_input_bytes: Some(4),
    };
    let report = run_pipeline_with_limits(Catalog::builtin(), "abcd", &pipeline, limits);
    assert_eq!(report.output, "61626364");
    assert_eq!(
        report.state(pipeline.steps()[1].id()),
        Some(&ExecutionState::Error(
            "input of 8 bytes exceeds limit of 4 bytes".to_string()
        ))
    );
}

#[test]
fn runs_are_deterministic() {
    let pipeline = deserialize_pipeline(
        Catalog::builtin(),
        r#"[{"operationId":"unicodeEscape"},{"operationId":"urlEncode","config":{"spaceToPlus":true}}]"#,
    )
    .expect("recipe");
    let first = run_pipeline(Catalog::builtin(), "héllo wörld", &pipeline);
    let second = run_pipeline(Catalog::builtin(), "héllo wörld", &pipeline);
    assert_eq!(first, second);
    assert_eq!(first.output, "h%5Cu00E9llo+w%5Cu00F6rld");
}
