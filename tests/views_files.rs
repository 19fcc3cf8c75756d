use serde_json::{json, Value};

use suna_tool_views::config::Tuning;
use suna_tool_views::model::{Message, MessageKind, ToolCall};
use suna_tool_views::views::files::{extract_file_op, operation_for};
use suna_tool_views::views::{FileOperation, FileView, ToolView, ViewBody, ViewContext, ViewState};

fn tool_msg(content: Value) -> Message {
    Message {
        message_id: "tool-1".to_string(),
        kind: MessageKind::Tool,
        content,
        created_at: Some(1_700_000_000_000),
        metadata: Value::Null,
    }
}

fn ctx_without_result<'a>(call: &'a ToolCall, tuning: &'a Tuning) -> ViewContext<'a> {
    ViewContext {
        call,
        tool_message: None,
        assistant_message: None,
        messages: &[],
        is_streaming: false,
        tuning,
    }
}

#[test]
fn create_call_parameters_normalize_before_any_result() {
    let call = ToolCall::new("create-file")
        .with_param("target_file", "a.py")
        .with_param("code_edit", "print(1)");
    let tuning = Tuning::default();
    let payload = extract_file_op(&ctx_without_result(&call, &tuning));

    assert_eq!(payload.file_path.as_deref(), Some("a.py"));
    assert_eq!(payload.file_content.as_deref(), Some("print(1)"));
    assert_eq!(payload.operation, FileOperation::Create);
}

#[test]
fn operation_derives_from_tool_name() {
    assert_eq!(operation_for("create-file"), FileOperation::Create);
    assert_eq!(operation_for("full_file_rewrite"), FileOperation::Rewrite);
    assert_eq!(operation_for("delete-file"), FileOperation::Delete);
    assert_eq!(operation_for("read-file"), FileOperation::Read);
    assert_eq!(operation_for("str-replace"), FileOperation::Edit);
    assert_eq!(operation_for("edit-file"), FileOperation::Edit);
}

#[test]
fn str_replace_carries_the_replacement_pair() {
    let call = ToolCall::new("str-replace")
        .with_param("file_path", "src/app.ts")
        .with_param("old_str", "let x = 1")
        .with_param("new_str", "let x = 2");
    let tuning = Tuning::default();
    let ctx = ctx_without_result(&call, &tuning);

    let payload = extract_file_op(&ctx);
    assert_eq!(payload.old_str.as_deref(), Some("let x = 1"));
    assert_eq!(payload.new_str.as_deref(), Some("let x = 2"));
    assert_eq!(payload.operation, FileOperation::Edit);

    match FileView.resolve(&ctx) {
        ViewState::Success {
            body: ViewBody::File(p),
        } => assert!(p.old_str.is_some() && p.new_str.is_some()),
        other => panic!("expected file success, got {other:?}"),
    }
}

#[test]
fn read_result_text_becomes_file_content() {
    let call = ToolCall::new("read-file").with_param("file_path", "notes.md");
    let msg = tool_msg(json!({
        "tool_execution": {"result": {"success": true, "output": "# Notes\nline"}}
    }));
    let tuning = Tuning::default();
    let ctx = ViewContext {
        call: &call,
        tool_message: Some(&msg),
        assistant_message: None,
        messages: &[],
        is_streaming: false,
        tuning: &tuning,
    };

    let payload = extract_file_op(&ctx);
    assert_eq!(payload.operation, FileOperation::Read);
    assert_eq!(payload.file_content.as_deref(), Some("# Notes\nline"));
}

#[test]
fn failed_write_surfaces_error_verbatim() {
    let call = ToolCall::new("full-file-rewrite").with_param("file_path", "x.py");
    let msg = tool_msg(json!({
        "tool_execution": {"result": {"success": false, "error": "permission denied: x.py"}}
    }));
    let tuning = Tuning::default();
    let ctx = ViewContext {
        call: &call,
        tool_message: Some(&msg),
        assistant_message: None,
        messages: &[],
        is_streaming: false,
        tuning: &tuning,
    };

    match FileView.resolve(&ctx) {
        ViewState::Error { message } => assert_eq!(message, "permission denied: x.py"),
        other => panic!("expected error state, got {other:?}"),
    }
}

#[test]
fn streaming_write_loads_with_path_label() {
    let call = ToolCall::new("create-file").with_param("file_path", "src/new.rs");
    let tuning = Tuning::default();
    let ctx = ViewContext {
        call: &call,
        tool_message: None,
        assistant_message: None,
        messages: &[],
        is_streaming: true,
        tuning: &tuning,
    };

    assert_eq!(
        FileView.resolve(&ctx),
        ViewState::Loading {
            label: Some("src/new.rs".to_string())
        }
    );
}

#[test]
fn raw_xml_parameters_back_fill_missing_fields() {
    let mut call = ToolCall::new("create-file");
    call.raw_xml = Some(
        r#"<create-file><parameter name="file_path">demo.txt</parameter><parameter name="file_contents">hi</parameter></create-file>"#
            .to_string(),
    );
    let tuning = Tuning::default();
    let payload = extract_file_op(&ctx_without_result(&call, &tuning));
    assert_eq!(payload.file_path.as_deref(), Some("demo.txt"));
    assert_eq!(payload.file_content.as_deref(), Some("hi"));
}
