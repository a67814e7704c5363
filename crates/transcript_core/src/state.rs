use crate::view_model::{AppViewModel, StatusLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Download,
    Copy,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pending: Option<Action>,
    status: Option<StatusLine>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            status: self.status.clone(),
            busy: self.pending.is_some(),
        }
    }

    pub fn pending(&self) -> Option<Action> {
        self.pending
    }

    /// Returns whether the view changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn begin(&mut self, action: Action) {
        self.pending = Some(action);
        self.status = None;
        self.dirty = true;
    }

    pub(crate) fn finish(&mut self, status: StatusLine) {
        self.pending = None;
        self.set_status(status);
    }

    pub(crate) fn set_status(&mut self, status: StatusLine) {
        self.status = Some(status);
        self.dirty = true;
    }
}
