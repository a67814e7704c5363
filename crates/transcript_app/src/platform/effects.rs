use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{bail, Context};
use chrono::Local;
use transcript_core::{Action, Effect, Msg};
use transcript_engine::{decode_html, download_filename, MarkdownExporter, MarkdownSaver, PageSnapshot};
use transcript_logging::{transcript_error, transcript_info};

/// Read a saved page from disk, decoding whatever charset it was saved in.
pub(crate) fn load_page(path: &Path, page_url: &str) -> anyhow::Result<PageSnapshot> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let decoded =
        decode_html(&bytes, None).with_context(|| format!("failed to decode {}", path.display()))?;
    transcript_info!(
        "loaded {} ({} bytes, {})",
        path.display(),
        bytes.len(),
        decoded.encoding_label
    );
    Ok(PageSnapshot::parse(&decoded.html, page_url))
}

/// Executes core effects against one loaded page and answers with the
/// message the core expects next.
pub(crate) struct EffectRunner {
    exporter: MarkdownExporter,
    page: PageSnapshot,
    output_dir: PathBuf,
    clipboard_command: Vec<String>,
}

impl EffectRunner {
    pub fn new(
        exporter: MarkdownExporter,
        page: PageSnapshot,
        output_dir: PathBuf,
        clipboard_command: Vec<String>,
    ) -> Self {
        Self {
            exporter,
            page,
            output_dir,
            clipboard_command,
        }
    }

    pub fn run(&self, effect: Effect) -> Msg {
        match effect {
            Effect::RequestMarkdown => {
                let response = self.exporter.handle_request(&self.page);
                Msg::MarkdownReceived(response.markdown_content)
            }
            Effect::SaveMarkdown { content } => {
                let result = self.save(&content).map_err(|err| {
                    transcript_error!("Download failed: {:#}", err);
                    format!("{err:#}")
                });
                Msg::TransferFinished {
                    action: Action::Download,
                    result,
                }
            }
            Effect::CopyToClipboard { content } => {
                let result = copy_to_clipboard(&self.clipboard_command, &content)
                    .map(|()| String::new())
                    .map_err(|err| {
                        transcript_error!("Copy failed: {:#}", err);
                        format!("{err:#}")
                    });
                Msg::TransferFinished {
                    action: Action::Copy,
                    result,
                }
            }
        }
    }

    /// Returns the name the file was actually saved under.
    fn save(&self, content: &str) -> anyhow::Result<String> {
        let filename = download_filename(content, Local::now().naive_local());
        let saved = MarkdownSaver::new(self.output_dir.clone()).save(&filename, content)?;
        transcript_info!("saved transcript to {}", saved.display());
        Ok(saved
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or(filename))
    }
}

pub(crate) fn copy_to_clipboard(command: &[String], content: &str) -> anyhow::Result<()> {
    let Some((program, args)) = command.split_first() else {
        bail!("no clipboard command configured");
    };
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to start {program}"))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(content.as_bytes())
            .with_context(|| format!("failed to write to {program}"))?;
    }
    let status = child.wait().with_context(|| format!("failed to wait for {program}"))?;
    if !status.success() {
        bail!("{program} exited with {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use transcript_engine::PageSelectors;

    const URL: &str = "https://gemini.google.com/share/abc123";
    const PAGE: &str = r#"<html><body><h1>Borrow checker</h1>
        <share-turn-viewer>
          <user-query><div class="query-text">Why?</div></user-query>
          <response-container><div class="markdown markdown-main-panel"><p>Because.</p></div></response-container>
        </share-turn-viewer></body></html>"#;

    fn runner(page: &str, output_dir: &Path, clipboard: &[&str]) -> EffectRunner {
        EffectRunner::new(
            MarkdownExporter::new(&PageSelectors::default()).unwrap(),
            PageSnapshot::parse(page, URL),
            output_dir.to_path_buf(),
            clipboard.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn request_answers_with_rendered_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let msg = runner(PAGE, dir.path(), &[]).run(Effect::RequestMarkdown);
        match msg {
            Msg::MarkdownReceived(Some(markdown)) => {
                assert!(markdown.starts_with("# Borrow_checker\n"));
                assert!(markdown.ends_with("## Gemini\nBecause."));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn request_on_empty_page_answers_none() {
        let dir = tempfile::tempdir().unwrap();
        let msg = runner("<html><body></body></html>", dir.path(), &[]).run(Effect::RequestMarkdown);
        assert_eq!(msg, Msg::MarkdownReceived(None));
    }

    #[test]
    fn save_writes_timestamped_file_and_reports_its_name() {
        let dir = tempfile::tempdir().unwrap();
        let content = "# Borrow checker\n\nbody";
        let msg = runner(PAGE, dir.path(), &[]).run(Effect::SaveMarkdown {
            content: content.to_string(),
        });
        let name = match msg {
            Msg::TransferFinished {
                action: Action::Download,
                result: Ok(name),
            } => name,
            other => panic!("unexpected {other:?}"),
        };
        assert!(name.starts_with("GeminiChatRecord-"));
        assert!(name.ends_with("-Borrow_checker.md"));
        assert_eq!(fs::read_to_string(dir.path().join(&name)).unwrap(), content);
    }

    #[test]
    fn empty_clipboard_command_fails_the_copy() {
        let dir = tempfile::tempdir().unwrap();
        let msg = runner(PAGE, dir.path(), &[]).run(Effect::CopyToClipboard {
            content: "x".into(),
        });
        assert!(matches!(
            msg,
            Msg::TransferFinished {
                action: Action::Copy,
                result: Err(_)
            }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn clipboard_command_receives_markdown_on_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let sink = dir.path().join("clipboard.txt");
        let script = format!("cat > '{}'", sink.display());
        copy_to_clipboard(&["sh".into(), "-c".into(), script], "## User\nhi").unwrap();
        assert_eq!(fs::read_to_string(sink).unwrap(), "## User\nhi");
    }

    #[cfg(unix)]
    #[test]
    fn failing_clipboard_command_is_an_error() {
        assert!(copy_to_clipboard(&["false".into()], "x").is_err());
        assert!(copy_to_clipboard(&["definitely-not-a-clipboard-tool".into()], "x").is_err());
    }
}
