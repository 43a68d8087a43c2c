//! Outbound side of the messaging platform: everything the league core asks the platform to do.
//!
//! The Discord implementation lives in the `bot` binary; tests plug in a recording fake.

use crate::models::{ChannelId, MessageId, UserId};
use async_trait::async_trait;
use thiserror::Error;

/// Custom id of the join button attached to every announcement.
pub const JOIN_BUTTON_ID: &str = "league-join";

/// Prefix of the display-name modal custom id; the announcement id follows the colon.
pub const JOIN_MODAL_PREFIX: &str = "league-join:";

/// Custom id of the text input inside the display-name modal.
pub const DISPLAY_NAME_INPUT_ID: &str = "display_name";

/// An outbound platform call that did not go through.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{action} failed: {reason}")]
pub struct PlatformError {
    pub action: &'static str,
    pub reason: String,
}

impl PlatformError {
    pub fn new(action: &'static str, reason: impl ToString) -> Self {
        Self {
            action,
            reason: reason.to_string(),
        }
    }
}

/// Handle needed to answer an interaction (slash command, button press or modal submit).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InteractionRef {
    pub id: u64,
    pub token: String,
}

impl InteractionRef {
    pub fn new(id: u64, token: impl Into<String>) -> Self {
        Self {
            id,
            token: token.into(),
        }
    }
}

/// Custom id for the display-name modal opened from the given announcement.
pub fn join_modal_id(announcement: MessageId) -> String {
    format!("{JOIN_MODAL_PREFIX}{announcement}")
}

/// Announcement id carried by a display-name modal custom id.
pub fn parse_join_modal_id(custom_id: &str) -> Option<MessageId> {
    custom_id.strip_prefix(JOIN_MODAL_PREFIX)?.parse().ok()
}

#[async_trait]
pub trait Platform: Send + Sync {
    /// Create a private thread under `parent`; returns the new thread's channel id.
    async fn create_private_thread(
        &self,
        parent: ChannelId,
        name: &str,
    ) -> Result<ChannelId, PlatformError>;

    async fn add_thread_member(&self, thread: ChannelId, user: UserId) -> Result<(), PlatformError>;

    async fn send_message(
        &self,
        channel: ChannelId,
        content: &str,
    ) -> Result<MessageId, PlatformError>;

    /// Send `content` with the join button attached.
    async fn send_join_announcement(
        &self,
        channel: ChannelId,
        content: &str,
    ) -> Result<MessageId, PlatformError>;

    async fn respond(
        &self,
        interaction: &InteractionRef,
        content: &str,
        ephemeral: bool,
    ) -> Result<(), PlatformError>;

    /// Answer the interaction with the display-name modal for `announcement`.
    async fn prompt_display_name(
        &self,
        interaction: &InteractionRef,
        announcement: MessageId,
    ) -> Result<(), PlatformError>;
}
