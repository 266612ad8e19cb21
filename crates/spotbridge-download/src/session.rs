//! Download session ownership.
//!
//! The host owns a `DownloadSession` and passes it by reference to start
//! and cancel calls. A session runs at most one download at a time; the
//! slot is released when the `ActiveDownload` guard drops.

use std::sync::{Mutex, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::debug;

use spotbridge_core::DownloadError;

/// Single-download session state.
#[derive(Debug, Default)]
pub struct DownloadSession {
    active: Mutex<Option<CancellationToken>>,
}

impl DownloadSession {
    /// Create an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the session for a new download.
    ///
    /// Returns `DownloadError::AlreadyActive` while another download holds it.
    pub fn begin(&self) -> Result<ActiveDownload<'_>, DownloadError> {
        let mut slot = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return Err(DownloadError::AlreadyActive);
        }
        let token = CancellationToken::new();
        *slot = Some(token.clone());
        debug!("download session claimed");
        Ok(ActiveDownload {
            session: self,
            token,
        })
    }

    /// Signal the active download to stop.
    ///
    /// Returns `false` when nothing is running.
    pub fn cancel(&self) -> bool {
        let slot = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Whether a download currently holds the session.
    pub fn is_active(&self) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn release(&self) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        debug!("download session released");
    }
}

/// Guard for the download currently holding a session.
#[derive(Debug)]
pub struct ActiveDownload<'a> {
    session: &'a DownloadSession,
    token: CancellationToken,
}

impl ActiveDownload<'_> {
    /// Token cancelled by `DownloadSession::cancel`.
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for ActiveDownload<'_> {
    fn drop(&mut self) {
        self.session.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_without_download() {
        let session = DownloadSession::new();
        assert!(!session.is_active());
        assert!(!session.cancel());
    }

    #[test]
    fn test_single_active_download() {
        let session = DownloadSession::new();
        let active = session.begin().unwrap();
        assert!(session.is_active());
        assert_eq!(session.begin().unwrap_err(), DownloadError::AlreadyActive);
        drop(active);
        assert!(!session.is_active());
        assert!(session.begin().is_ok());
    }

    #[test]
    fn test_cancel_reaches_token() {
        let session = DownloadSession::new();
        let active = session.begin().unwrap();
        assert!(!active.is_cancelled());
        assert!(session.cancel());
        assert!(active.is_cancelled());
        assert!(active.token().is_cancelled());
    }

    #[test]
    fn test_new_download_starts_uncancelled() {
        let session = DownloadSession::new();
        {
            let _active = session.begin().unwrap();
            session.cancel();
        }
        let active = session.begin().unwrap();
        assert!(!active.is_cancelled());
    }

    #[test]
    fn test_cancel_from_another_thread_wakes_waiter() {
        let session = DownloadSession::new();
        let active = session.begin().unwrap();

        std::thread::scope(|scope| {
            scope.spawn(|| assert!(session.cancel()));
        });
        tokio_test::block_on(active.token().cancelled());
        assert!(active.is_cancelled());
    }
}
