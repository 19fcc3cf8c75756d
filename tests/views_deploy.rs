use serde_json::{json, Value};

use suna_tool_views::config::Tuning;
use suna_tool_views::model::{Message, MessageKind, ToolCall};
use suna_tool_views::views::deploy::extract_deploy;
use suna_tool_views::views::{DeployView, ToolView, ViewBody, ViewContext, ViewState};

fn tool_msg(content: Value) -> Message {
    Message {
        message_id: "tool-1".to_string(),
        kind: MessageKind::Tool,
        content,
        created_at: Some(1_700_000_000_000),
        metadata: Value::Null,
    }
}

fn ctx<'a>(call: &'a ToolCall, msg: Option<&'a Message>, tuning: &'a Tuning) -> ViewContext<'a> {
    ViewContext {
        call,
        tool_message: msg,
        assistant_message: None,
        messages: &[],
        is_streaming: false,
        tuning,
    }
}

#[test]
fn structured_url_wins() {
    let call = ToolCall::new("deploy").with_param("name", "my-site");
    let msg = tool_msg(json!({
        "tool_execution": {"result": {"success": true, "output": {
            "url": "https://my-site.pages.dev", "message": "deployment complete"
        }}}
    }));
    let tuning = Tuning::default();

    let payload = extract_deploy(&ctx(&call, Some(&msg), &tuning));
    assert_eq!(payload.url.as_deref(), Some("https://my-site.pages.dev"));
    assert_eq!(payload.logs.as_deref(), Some("deployment complete"));
}

#[test]
fn url_is_fished_out_of_log_text_when_unstructured() {
    let call = ToolCall::new("deploy").with_param("name", "my-site");
    let msg = tool_msg(json!({
        "tool_execution": {"result": {"success": true,
            "output": "Uploading... done.\nDeployed to https://my-site.pages.dev in 3s"}}
    }));
    let tuning = Tuning::default();

    let payload = extract_deploy(&ctx(&call, Some(&msg), &tuning));
    assert_eq!(payload.url.as_deref(), Some("https://my-site.pages.dev"));

    match DeployView.resolve(&ctx(&call, Some(&msg), &tuning)) {
        ViewState::Success {
            body: ViewBody::Deploy(p),
        } => assert!(p.logs.as_deref().unwrap_or_default().contains("Uploading")),
        other => panic!("expected deploy success, got {other:?}"),
    }
}

#[test]
fn failed_deploy_surfaces_error() {
    let call = ToolCall::new("deploy");
    let msg = tool_msg(json!({
        "tool_execution": {"result": {"success": false, "error": "build failed: exit 1"}}
    }));
    let tuning = Tuning::default();

    match DeployView.resolve(&ctx(&call, Some(&msg), &tuning)) {
        ViewState::Error { message } => assert_eq!(message, "build failed: exit 1"),
        other => panic!("expected error state, got {other:?}"),
    }
}

#[test]
fn expose_port_loading_label_is_the_port() {
    let call = ToolCall::new("expose-port").with_param("port", "3000");
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
        DeployView.resolve(&ctx),
        ViewState::Loading {
            label: Some("3000".to_string())
        }
    );
}
