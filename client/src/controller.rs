//! Drives the album state machine against the API
//!
//! The controller owns the only [`AlbumState`]. Every change goes through
//! [`reduce`] and the resulting snapshot is published on a `watch` channel,
//! so any number of views can follow along.

use std::time::Instant;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::compression::compress;
use crate::file::UploadFile;
use crate::gateway::GatewayClient;
use crate::gesture::PressGesture;
use crate::state::{delete_prompt, reduce, Action, AlbumState};

const NO_IMAGES: &str = "No files selected";
const UPLOAD_FAILED: &str = "Upload failed";
const UPLOAD_UNREACHABLE: &str = "Upload failed, please try again";
const DELETE_FAILED: &str = "Delete failed";
const DELETE_UNREACHABLE: &str = "Delete failed, please try again";

/// Asks the user to confirm a destructive action
pub trait Confirm {
    /// Returns `true` to proceed
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub struct AlbumController {
    gateway: GatewayClient,
    state: AlbumState,
    updates: watch::Sender<AlbumState>,
    press: Option<PressGesture>,
}

impl AlbumController {
    #[must_use]
    pub fn new(gateway: GatewayClient) -> Self {
        let state = AlbumState::default();
        let (updates, _) = watch::channel(state.clone());
        Self {
            gateway,
            state,
            updates,
            press: None,
        }
    }

    /// Receives every snapshot published from now on
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AlbumState> {
        self.updates.subscribe()
    }

    #[must_use]
    pub const fn state(&self) -> &AlbumState {
        &self.state
    }

    fn dispatch(&mut self, action: Action) {
        self.state = reduce(std::mem::take(&mut self.state), action);
        self.updates.send_replace(self.state.clone());
    }

    /// Initial load
    pub async fn mount(&mut self) {
        self.refresh(false).await;
    }

    /// Re-fetches the list; `manual` for user-triggered refreshes
    pub async fn refresh(&mut self, manual: bool) {
        self.dispatch(Action::FetchStarted { manual });
        match self.gateway.list().await {
            Ok(images) => self.dispatch(Action::FetchSucceeded(images)),
            Err(e) => {
                warn!(error = %e, "failed to fetch image list");
                self.dispatch(Action::FetchFailed(e.to_string()));
            }
        }
    }

    /// Compresses and uploads the chosen files, then refreshes the list
    ///
    /// Non-image files are left out of the request; when nothing is left no
    /// request is sent. Does nothing while another upload is running or when
    /// no file was chosen.
    pub async fn upload(&mut self, files: Vec<UploadFile>) {
        if files.is_empty() || self.state.uploading {
            return;
        }
        self.dispatch(Action::UploadStarted);

        let total = files.len();
        let mut prepared = Vec::with_capacity(total);
        for (index, file) in files.into_iter().enumerate() {
            if file.is_image() {
                prepared.push(compress(file).await);
            } else {
                info!(
                    name = %file.name,
                    content_type = %file.content_type,
                    "skipping non-image file"
                );
            }
            // skipped files count as processed
            self.dispatch(Action::UploadCompressed {
                done: index + 1,
                total,
            });
        }

        if prepared.is_empty() {
            self.dispatch(Action::UploadFailed(NO_IMAGES.to_string()));
            self.dispatch(Action::UploadFinished);
            return;
        }

        match self.gateway.upload(prepared).await {
            Ok(response) => {
                self.dispatch(Action::UploadResponded);
                info!(count = response.count, skipped = response.skipped, "upload finished");
                self.dispatch(Action::UploadSucceeded);
                self.refresh(false).await;
            }
            Err(e) => {
                warn!(error = %e, "upload failed");
                let notice = if e.is_server() {
                    self.dispatch(Action::UploadResponded);
                    e.notice(UPLOAD_FAILED)
                } else {
                    e.notice(UPLOAD_UNREACHABLE)
                };
                self.dispatch(Action::UploadFailed(notice));
            }
        }

        self.dispatch(Action::UploadFinished);
    }

    /// Deletes `urls` after confirmation, then refreshes the list
    ///
    /// Returns whether a delete request was sent. Declining, an empty list
    /// or a delete already in flight leave everything untouched.
    pub async fn delete(
        &mut self,
        urls: Vec<String>,
        confirm: &mut (impl Confirm + Send),
    ) -> bool {
        if urls.is_empty() || self.state.deleting {
            return false;
        }
        if !confirm.confirm(&delete_prompt(urls.len())) {
            return false;
        }

        self.dispatch(Action::DeleteStarted);
        match self.gateway.delete(&urls).await {
            Ok(response) => {
                info!(deleted = response.deleted, "delete finished");
                self.dispatch(Action::DeleteSucceeded);
                self.refresh(false).await;
            }
            Err(e) => {
                warn!(error = %e, "delete failed");
                let fallback = if e.is_server() {
                    DELETE_FAILED
                } else {
                    DELETE_UNREACHABLE
                };
                self.dispatch(Action::DeleteFailed(e.notice(fallback)));
            }
        }
        true
    }

    /// Deletes the current selection
    pub async fn delete_selection(&mut self, confirm: &mut (impl Confirm + Send)) -> bool {
        let urls = self.state.selection.iter().cloned().collect();
        self.delete(urls, confirm).await
    }

    /// Plain click: previews, or toggles while selecting
    pub fn click(&mut self, url: impl Into<String>) {
        self.dispatch(Action::Click(url.into()));
    }

    pub fn toggle_select(&mut self, url: impl Into<String>) {
        self.dispatch(Action::ToggleSelect(url.into()));
    }

    pub fn preview(&mut self, url: impl Into<String>) {
        self.dispatch(Action::Preview(url.into()));
    }

    pub fn dismiss_preview(&mut self) {
        self.dispatch(Action::DismissPreview);
    }

    pub fn long_press(&mut self, url: impl Into<String>) {
        self.dispatch(Action::LongPress(url.into()));
    }

    pub fn cancel_selection(&mut self) {
        self.dispatch(Action::CancelSelection);
    }

    pub fn acknowledge_notice(&mut self) {
        self.dispatch(Action::AcknowledgeNotice);
    }

    /// Pointer went down on an image
    pub fn press_start(&mut self, url: impl Into<String>, at: Instant) {
        self.press = Some(PressGesture::start(url.into(), at));
    }

    /// Timer tick while the pointer is down
    pub fn press_poll(&mut self, now: Instant) {
        let fired = self
            .press
            .as_mut()
            .and_then(|press| press.poll(now))
            .map(str::to_string);
        if let Some(url) = fired {
            self.long_press(url);
        }
    }

    /// Pointer went up: a long press selects, a short one is a click
    pub fn press_end(&mut self, now: Instant) {
        let Some(press) = self.press.take() else {
            return;
        };
        if press.is_long(now) {
            if let Some(url) = press.release(now) {
                self.long_press(url);
            }
        } else {
            self.click(press.url().to_string());
        }
    }
}
