use transcript_core::{AppViewModel, StatusKind, StatusLine};

/// Text printed to stderr for the current view, if it has anything to say.
pub(crate) fn render(view: &AppViewModel) -> Option<String> {
    if view.busy {
        return None;
    }
    view.status.as_ref().map(format_status)
}

fn format_status(status: &StatusLine) -> String {
    let tag = match status.kind {
        StatusKind::Success => "ok",
        StatusKind::Error => "error",
        StatusKind::Info => "info",
    };
    format!("[{tag}] {}", status.text)
}
