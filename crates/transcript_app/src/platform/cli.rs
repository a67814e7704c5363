use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "gemini-transcript",
    version,
    about = "Export a saved Gemini share page as a Markdown transcript"
)]
pub(crate) struct Cli {
    /// RON settings file. Defaults to ./transcript.ron when it exists.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Save the transcript as a timestamped .md file.
    Download {
        #[command(flatten)]
        page: PageArgs,
        /// Directory for the saved file; overrides `output_dir` from the config.
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
    /// Put the transcript on the system clipboard.
    Copy {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Print the transcript to stdout.
    Render {
        #[command(flatten)]
        page: PageArgs,
        /// Print the `{"markdownContent": ...}` response instead of raw Markdown.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Args)]
pub(crate) struct PageArgs {
    /// Saved HTML of the share page.
    #[arg(long, value_name = "HTML_FILE")]
    pub page: PathBuf,
    /// Address the page was opened at.
    #[arg(long)]
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_accepts_output_override() {
        let cli = Cli::try_parse_from([
            "gemini-transcript",
            "download",
            "--page",
            "chat.html",
            "--url",
            "https://gemini.google.com/share/abc",
            "--out",
            "notes",
        ])
        .unwrap();
        match cli.command {
            Command::Download { page, out } => {
                assert_eq!(page.page, PathBuf::from("chat.html"));
                assert_eq!(out, Some(PathBuf::from("notes")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from([
            "gemini-transcript",
            "render",
            "--page",
            "chat.html",
            "--url",
            "https://gemini.google.com/share/abc",
            "--json",
            "--config",
            "alt.ron",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("alt.ron")));
        assert!(matches!(cli.command, Command::Render { json: true, .. }));
    }

    #[test]
    fn page_and_url_are_required() {
        assert!(Cli::try_parse_from(["gemini-transcript", "copy", "--page", "x.html"]).is_err());
    }
}
