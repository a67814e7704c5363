use crate::Action;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User pressed Download or Copy while `page_url` was open.
    ActionRequested { action: Action, page_url: String },
    /// Extraction finished; `None` means no Markdown could be produced.
    MarkdownReceived(Option<String>),
    /// The save or clipboard write finished. `Ok` carries a detail for the
    /// status line (the saved file name for downloads), `Err` the reason.
    TransferFinished {
        action: Action,
        result: Result<String, String>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
