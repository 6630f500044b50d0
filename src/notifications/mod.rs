//! Notification feed backing the `/api/notifications` handlers.
//!
//! The feed is re-read on every request. Callers never see an error: anything
//! that goes wrong is logged and turned into an empty list.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    #[error("no notification source configured")]
    Unconfigured,
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default)]
pub struct NotificationFeed {
    source: Option<PathBuf>,
}

impl NotificationFeed {
    pub fn new(source: Option<PathBuf>) -> Self {
        Self { source }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self::new(Some(path.as_ref().to_path_buf()))
    }

    pub async fn load(&self) -> Result<Vec<Notification>, FeedError> {
        let path = self.source.as_ref().ok_or(FeedError::Unconfigured)?;
        let raw = tokio::fs::read(path)
            .await
            .map_err(|source| FeedError::Io { path: path.clone(), source })?;
        serde_json::from_slice(&raw).map_err(|source| FeedError::Parse { path: path.clone(), source })
    }

    /// Every notification, or an empty list on failure.
    pub async fn all(&self) -> Vec<Notification> {
        match self.load().await {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(error = %err, "notification feed unavailable");
                Vec::new()
            }
        }
    }

    /// Unread notifications, or an empty list on failure.
    pub async fn unread(&self) -> Vec<Notification> {
        let mut items = self.all().await;
        items.retain(|n| !n.read);
        items
    }
}
