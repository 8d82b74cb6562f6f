//! Operational notifications for the bot operator.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use serenity::all::{CreateMessage, UserId};
use serenity::async_trait;
use serenity::http::Http;
use tokio::io::AsyncWriteExt;

/// Sink for operational notifications.
///
/// Notifying is best-effort: implementations log their own failures and never
/// return an error to the caller.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str);
}

/// Notifies the configured admin by direct message and appends every message to
/// a local error log.
pub struct AdminNotifier {
    http: Arc<Http>,
    admin_user_id: Option<UserId>,
    error_log: PathBuf,
}

impl AdminNotifier {
    /// Creates a new AdminNotifier.
    ///
    /// # Arguments
    /// - `http` - Discord HTTP client used for the direct message
    /// - `admin_user_id` - Recipient of direct messages; logging only when `None`
    /// - `error_log` - File every notification is appended to
    pub fn new(http: Arc<Http>, admin_user_id: Option<UserId>, error_log: PathBuf) -> Self {
        Self {
            http,
            admin_user_id,
            error_log,
        }
    }

    async fn send_direct_message(&self, admin: UserId, message: &str) {
        let content = format!("⚠️ **Bot Error:**\n```\n{}\n```", message);

        if let Err(e) = admin
            .direct_message(self.http.as_ref(), CreateMessage::new().content(content))
            .await
        {
            tracing::error!("Failed to send notification to admin {}: {}", admin, e);
        }
    }
}

#[async_trait]
impl Notifier for AdminNotifier {
    async fn notify(&self, message: &str) {
        tracing::warn!("{}", message);

        if let Some(admin) = self.admin_user_id {
            self.send_direct_message(admin, message).await;
        }

        if let Err(e) = append_error_log(&self.error_log, message).await {
            tracing::error!(
                "Failed to write error log {}: {}",
                self.error_log.display(),
                e
            );
        }
    }
}

/// Appends one timestamped line to the error log, creating the file and its
/// parent directories when missing.
pub async fn append_error_log(path: &Path, message: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;

    let line = format!("{} - {}\n", Utc::now().to_rfc3339(), message);
    file.write_all(line.as_bytes()).await?;
    file.flush().await?;

    Ok(())
}
