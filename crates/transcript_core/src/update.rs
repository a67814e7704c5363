use crate::view_model::StatusLine;
use crate::{is_share_page, Action, AppState, Effect, Msg};

pub const NOT_A_SHARE_PAGE: &str = "Please open a Gemini share page.";
pub const MARKDOWN_UNAVAILABLE: &str = "Failed to get Markdown content.";
pub const COPIED: &str = "Markdown copied to clipboard.";
pub const COPY_FAILED: &str = "Copy failed, please try again.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ActionRequested { action, page_url } => {
            if state.pending().is_some() {
                return (state, Vec::new());
            }
            if !is_share_page(&page_url) {
                state.set_status(StatusLine::info(NOT_A_SHARE_PAGE));
                return (state, Vec::new());
            }
            state.begin(action);
            vec![Effect::RequestMarkdown]
        }
        Msg::MarkdownReceived(content) => {
            let Some(action) = state.pending() else {
                return (state, Vec::new());
            };
            match content.filter(|c| !c.trim().is_empty()) {
                Some(content) => match action {
                    Action::Download => vec![Effect::SaveMarkdown { content }],
                    Action::Copy => vec![Effect::CopyToClipboard { content }],
                },
                None => {
                    state.finish(StatusLine::error(MARKDOWN_UNAVAILABLE));
                    Vec::new()
                }
            }
        }
        Msg::TransferFinished { action, result } => {
            if state.pending() != Some(action) {
                return (state, Vec::new());
            }
            let status = match (action, result) {
                (Action::Download, Ok(name)) => {
                    StatusLine::success(format!("Markdown file downloaded: {name}"))
                }
                (Action::Download, Err(reason)) => {
                    StatusLine::error(format!("Download failed: {reason}"))
                }
                (Action::Copy, Ok(_)) => StatusLine::success(COPIED),
                (Action::Copy, Err(_)) => StatusLine::error(COPY_FAILED),
            };
            state.finish(status);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
