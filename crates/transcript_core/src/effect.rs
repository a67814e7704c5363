/// Side effects the host shell must carry out after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the extractor on the current page and answer with `Msg::MarkdownReceived`.
    RequestMarkdown,
    /// Save the Markdown as a file and answer with `Msg::TransferFinished`.
    SaveMarkdown { content: String },
    /// Put the Markdown on the clipboard and answer with `Msg::TransferFinished`.
    CopyToClipboard { content: String },
}
