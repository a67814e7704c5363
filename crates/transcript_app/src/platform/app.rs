use std::collections::VecDeque;
use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use transcript_core::{update, Action, AppState, AppViewModel, Msg, StatusKind};
use transcript_engine::MarkdownExporter;
use transcript_logging::{transcript_info, transcript_warn};

use super::cli::{Cli, Command, PageArgs};
use super::config::{load_config, AppConfig};
use super::effects::{load_page, EffectRunner};
use super::ui;

pub(crate) fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_config(cli.config.as_deref())?;
    transcript_logging::initialize(
        config.log_destination,
        config.level_filter()?,
        &config.log_file,
    );
    let exporter = MarkdownExporter::new(&config.selectors)?;

    match cli.command {
        Command::Download { page, out } => {
            let output_dir = out.unwrap_or_else(|| config.output_dir.clone());
            run_action(Action::Download, &page, exporter, output_dir, &config)
        }
        Command::Copy { page } => {
            let output_dir = config.output_dir.clone();
            run_action(Action::Copy, &page, exporter, output_dir, &config)
        }
        Command::Render { page, json } => render(&page, &exporter, json),
    }
}

/// Drive one Download/Copy through the core until it stops producing effects.
fn run_action(
    action: Action,
    args: &PageArgs,
    exporter: MarkdownExporter,
    output_dir: std::path::PathBuf,
    config: &AppConfig,
) -> anyhow::Result<ExitCode> {
    let page = load_page(&args.page, &args.url)?;
    let runner = EffectRunner::new(exporter, page, output_dir, config.clipboard_command.clone());

    let mut state = AppState::new();
    let mut inbox = VecDeque::from([Msg::ActionRequested {
        action,
        page_url: args.url.clone(),
    }]);

    while let Some(msg) = inbox.pop_front() {
        let (next, effects) = update(state, msg);
        state = next;
        if state.consume_dirty() {
            show(&state.view());
        }
        inbox.extend(effects.into_iter().map(|effect| runner.run(effect)));
    }

    let failed = state
        .view()
        .status
        .is_some_and(|status| status.kind == StatusKind::Error);
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn render(args: &PageArgs, exporter: &MarkdownExporter, json: bool) -> anyhow::Result<ExitCode> {
    let page = load_page(&args.page, &args.url)?;
    let output = if json {
        let response = exporter.handle_request(&page);
        if response.markdown_content.is_none() {
            transcript_warn!("nothing to render from {}", args.page.display());
        }
        response.to_json()
    } else {
        match exporter.export(&page) {
            Ok(markdown) => markdown,
            Err(err) => {
                transcript_warn!("nothing to render from {}: {}", args.page.display(), err);
                eprintln!("[error] Failed to get Markdown content.");
                return Ok(ExitCode::FAILURE);
            }
        }
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}").context("failed to write to stdout")?;
    transcript_info!("rendered {} bytes", output.len());
    Ok(ExitCode::SUCCESS)
}

fn show(view: &AppViewModel) {
    if let Some(line) = ui::render::render(view) {
        eprintln!("{line}");
    }
}
