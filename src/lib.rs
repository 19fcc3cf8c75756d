//! Tool-call view dispatch and tool-result extraction for the Suna agent
//! chat UI.
//!
//! The library turns raw thread messages into presentation-ready tool views:
//! assistant text is scanned for embedded tool calls, each call's name is
//! resolved to a renderer through a flat registry, the renderer's extractor
//! normalizes the loosely-typed execution payload, and the result is one of
//! four mutually exclusive view states (loading, empty, error, success).
//! A companion `thread` module handles streaming-vs-persisted message
//! reconciliation and timeline navigation.
//!
//! The `suna-views` binary is a debugging surface over the same code: it
//! resolves the views in an exported thread JSON file and prints them.

pub mod config;
pub mod model;
pub mod parse;
pub mod thread;
pub mod views;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use config::Tuning;
use model::Message;
use thread::timeline::Timeline;
use views::{ViewBody, ViewContext, ViewRegistry, ViewState};

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "suna-views",
    version,
    about = "Inspect tool-call views in exported Suna threads"
)]
pub struct Cli {
    /// Path to a tuning TOML file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve and print the view for every tool call in a thread export
    Render {
        /// Thread export: a JSON message array or `{"messages": [...]}`
        file: PathBuf,
    },
    /// Dump normalized payloads and view states as JSON
    Extract { file: PathBuf },
}

pub fn run(cli: Cli) -> Result<()> {
    let tuning = Tuning::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Render { file } => render(&file, &tuning),
        Commands::Extract { file } => extract(&file, &tuning),
    }
}

/// Resolve every tool call in a thread to `(tool name, view state)`.
pub fn resolve_thread(messages: &[Message], tuning: &Tuning) -> Vec<(String, ViewState)> {
    let registry = ViewRegistry::new();
    let timeline = Timeline::from_messages(messages);
    timeline
        .snapshots()
        .iter()
        .map(|snapshot| {
            let assistant = snapshot
                .assistant_message_id
                .as_ref()
                .and_then(|id| messages.iter().find(|m| &m.message_id == id));
            let ctx = ViewContext {
                call: &snapshot.call,
                tool_message: snapshot.result_message.as_ref(),
                assistant_message: assistant,
                messages,
                is_streaming: false,
                tuning,
            };
            let state = registry.get(&snapshot.call.function_name).resolve(&ctx);
            (snapshot.call.function_name.clone(), state)
        })
        .collect()
}

fn load(path: &Path) -> Result<Vec<Message>> {
    model::load_thread(path).with_context(|| format!("load thread {}", path.display()))
}

fn render(path: &Path, tuning: &Tuning) -> Result<()> {
    let messages = load(path)?;
    let resolved = resolve_thread(&messages, tuning);
    if resolved.is_empty() {
        println!("no tool calls found");
        return Ok(());
    }
    // Tool failures are data here, not CLI failures: always exit 0.
    for (name, state) in resolved {
        let title = parse::display_name(&name);
        match state {
            ViewState::Loading { label } => {
                println!(
                    "{} {} {}",
                    "RUNNING".yellow().bold(),
                    title.bold(),
                    label.unwrap_or_default().dimmed()
                );
            }
            ViewState::Empty => {
                println!("{} {}", "NO DATA".dimmed().bold(), title.bold());
            }
            ViewState::Error { message } => {
                println!("{} {}", "FAILED".red().bold(), title.bold());
                println!("  {message}");
            }
            ViewState::Success { body } => {
                println!("{} {}", "OK".green().bold(), title.bold());
                for line in body_summary(&body) {
                    println!("  {line}");
                }
            }
        }
    }
    Ok(())
}

fn extract(path: &Path, tuning: &Tuning) -> Result<()> {
    let messages = load(path)?;
    let resolved: Vec<serde_json::Value> = resolve_thread(&messages, tuning)
        .into_iter()
        .map(|(tool, state)| {
            serde_json::json!({
                "tool": tool,
                "resolved": state,
            })
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&resolved).context("serialize resolved views")?
    );
    Ok(())
}

const PREVIEW_LINES: usize = 8;

fn preview(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text.lines().take(PREVIEW_LINES).map(String::from).collect();
    if text.lines().count() > PREVIEW_LINES {
        lines.push("…".to_string());
    }
    lines
}

fn body_summary(body: &ViewBody) -> Vec<String> {
    let mut out = Vec::new();
    match body {
        ViewBody::Terminal(p) => {
            if let Some(command) = &p.command {
                out.push(format!("$ {command}"));
            }
            if let Some(output) = &p.output {
                out.extend(preview(output));
            }
            if let Some(code) = p.exit_code {
                out.push(format!("exit {code}"));
            }
        }
        ViewBody::File(p) => {
            out.push(format!(
                "{:?} {}",
                p.operation,
                p.file_path.as_deref().unwrap_or("<unknown path>")
            ));
            if p.old_str.is_some() && p.new_str.is_some() {
                out.push("replacement diff available".to_string());
            } else if let Some(content) = &p.file_content {
                out.extend(preview(content));
            }
            if let Some(message) = &p.message {
                out.push(message.clone());
            }
        }
        ViewBody::Browser(p) => {
            if let Some(url) = &p.url {
                out.push(url.clone());
            }
            if let Some(message) = &p.message {
                out.extend(preview(message));
            }
            match &p.screenshot {
                Some(views::Screenshot::Base64(_)) => out.push("screenshot: inline".to_string()),
                Some(views::Screenshot::Url(url)) => out.push(format!("screenshot: {url}")),
                None => {}
            }
        }
        ViewBody::Search(p) => {
            if let Some(query) = &p.query {
                out.push(format!("query: {query}"));
            }
            out.push(format!("{} result(s)", p.results.len()));
            for hit in p.results.iter().take(5) {
                out.push(match &hit.title {
                    Some(title) => format!("{title} ({})", hit.url),
                    None => hit.url.clone(),
                });
            }
        }
        ViewBody::Deploy(p) => {
            if let Some(url) = &p.url {
                out.push(url.clone());
            }
            if let Some(logs) = &p.logs {
                out.extend(preview(logs));
            }
        }
        ViewBody::Generic(p) => {
            for (key, value) in &p.fields {
                out.push(format!("{key}: {value}"));
            }
            if let Some(output) = &p.output {
                out.extend(preview(output));
            }
        }
    }
    out
}
