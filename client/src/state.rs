//! Album state and its transitions
//!
//! [`AlbumState`] is never mutated in place by callers: every change goes
//! through [`reduce`] with a named [`Action`]. Selection mode is not stored;
//! it is whether the selection is non-empty.

use std::collections::BTreeSet;

use common_types::ImageRecord;

/// Progress reached once every file has been compressed
pub const PROGRESS_COMPRESSED: u8 = 50;
/// Progress reached once the upload response arrived
pub const PROGRESS_RESPONDED: u8 = 90;
/// Progress reached once the list has been refreshed
pub const PROGRESS_DONE: u8 = 100;

/// Everything the album view shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumState {
    /// Last fetched collection, newest first
    pub images: Vec<ImageRecord>,
    /// Initial fetch has not completed yet
    pub loading: bool,
    /// A manual refresh is in flight
    pub refreshing: bool,
    /// Urls of selected images
    pub selection: BTreeSet<String>,
    /// An upload is in flight
    pub uploading: bool,
    /// 0..=100 while uploading, 0 otherwise
    pub upload_progress: u8,
    /// A delete is in flight
    pub deleting: bool,
    /// Url shown full size
    pub preview: Option<String>,
    /// Message the user has to acknowledge
    pub notice: Option<String>,
}

impl Default for AlbumState {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            loading: true,
            refreshing: false,
            selection: BTreeSet::new(),
            uploading: false,
            upload_progress: 0,
            deleting: false,
            preview: None,
            notice: None,
        }
    }
}

impl AlbumState {
    /// Whether clicks select instead of preview
    #[must_use]
    pub fn select_mode(&self) -> bool {
        !self.selection.is_empty()
    }

    #[must_use]
    pub fn is_selected(&self, url: &str) -> bool {
        self.selection.contains(url)
    }

    fn set_progress(&mut self, progress: u8) {
        if self.uploading {
            self.upload_progress = self.upload_progress.max(progress.min(PROGRESS_DONE));
        }
    }
}

/// Named state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A list request was sent; `manual` for user-triggered refreshes
    FetchStarted { manual: bool },
    FetchSucceeded(Vec<ImageRecord>),
    FetchFailed(String),
    UploadStarted,
    /// Raw progress report, ignored if lower than the current value
    UploadProgress(u8),
    /// `done` of `total` chosen files have been compressed
    UploadCompressed { done: usize, total: usize },
    UploadResponded,
    UploadSucceeded,
    UploadFailed(String),
    /// Upload settled either way
    UploadFinished,
    /// Plain click on an image
    Click(String),
    ToggleSelect(String),
    /// Sustained press on an image
    LongPress(String),
    CancelSelection,
    /// Explicit "view" request
    Preview(String),
    /// Click on the preview overlay background
    DismissPreview,
    DeleteStarted,
    DeleteSucceeded,
    DeleteFailed(String),
    AcknowledgeNotice,
}

/// Applies one action, returning the next state
#[must_use]
pub fn reduce(mut state: AlbumState, action: Action) -> AlbumState {
    match action {
        Action::FetchStarted { manual } => {
            if manual {
                state.refreshing = true;
            }
        }
        Action::FetchSucceeded(images) => {
            state.loading = false;
            state.refreshing = false;
            state
                .selection
                .retain(|url| images.iter().any(|image| &image.url == url));
            if let Some(url) = &state.preview {
                if !images.iter().any(|image| &image.url == url) {
                    state.preview = None;
                }
            }
            state.images = images;
        }
        Action::FetchFailed(_) => {
            state.loading = false;
            state.refreshing = false;
        }
        Action::UploadStarted => {
            if !state.uploading {
                state.uploading = true;
                state.upload_progress = 0;
            }
        }
        Action::UploadProgress(progress) => state.set_progress(progress),
        Action::UploadCompressed { done, total } => {
            if total > 0 {
                let scaled = done.min(total) * usize::from(PROGRESS_COMPRESSED);
                let rounded = (scaled + total / 2) / total;
                state.set_progress(u8::try_from(rounded).unwrap_or(PROGRESS_COMPRESSED));
            }
        }
        Action::UploadResponded => state.set_progress(PROGRESS_RESPONDED),
        Action::UploadSucceeded => state.set_progress(PROGRESS_DONE),
        Action::UploadFailed(message) => state.notice = Some(message),
        Action::UploadFinished => {
            state.uploading = false;
            state.upload_progress = 0;
        }
        Action::Click(url) => {
            if state.select_mode() {
                toggle(&mut state.selection, url);
            } else {
                state.preview = Some(url);
            }
        }
        Action::ToggleSelect(url) => toggle(&mut state.selection, url),
        Action::LongPress(url) => {
            if !state.select_mode() {
                state.selection = BTreeSet::from([url]);
            }
        }
        Action::CancelSelection => state.selection.clear(),
        Action::Preview(url) => {
            if !state.select_mode() {
                state.preview = Some(url);
            }
        }
        Action::DismissPreview => state.preview = None,
        Action::DeleteStarted => {
            if !state.deleting {
                state.deleting = true;
            }
        }
        Action::DeleteSucceeded => {
            state.deleting = false;
            state.selection.clear();
        }
        Action::DeleteFailed(message) => {
            state.deleting = false;
            state.notice = Some(message);
        }
        Action::AcknowledgeNotice => state.notice = None,
    }
    state
}

fn toggle(selection: &mut BTreeSet<String>, url: String) {
    if !selection.remove(&url) {
        selection.insert(url);
    }
}

/// Confirmation question shown before deleting `count` images
#[must_use]
pub fn delete_prompt(count: usize) -> String {
    if count == 1 {
        "Delete this photo?".to_string()
    } else {
        format!("Delete these {count} photos?")
    }
}
