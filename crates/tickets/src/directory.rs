//! The channel-directory seam: the abstract capability the engine calls to
//! create channels, deliver messages, and query role membership. Each chat
//! platform provides a concrete implementation.

use {anyhow::Result, async_trait::async_trait};

use crate::overwrites::Overwrite;

/// Opaque handle to a channel owned by the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHandle {
    pub id: String,
}

impl ChannelHandle {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Inline mention of this channel.
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<#{}>", self.id)
    }
}

/// Reference to a message previously sent through the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef {
    pub channel_id: String,
    pub message_id: String,
}

/// One option in a selection menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOptionSpec {
    pub label: String,
    pub value: String,
}

/// A selection menu attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectMenuSpec {
    pub custom_id: String,
    pub placeholder: String,
    pub options: Vec<SelectOptionSpec>,
}

/// Content the engine hands to the directory for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub content: String,
    pub menu: Option<SelectMenuSpec>,
}

impl OutgoingMessage {
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            menu: None,
        }
    }
}

/// Everything needed to create one channel.
#[derive(Debug, Clone)]
pub struct CreateChannelSpec {
    pub name: String,
    /// Parent category, when the community organizes channels into one.
    pub parent_id: Option<String>,
    pub topic: String,
    pub overwrites: Vec<Overwrite>,
}

/// Abstract channel-platform capability.
///
/// Implementations own the network round-trips; the engine owns ordering
/// and error classification.
#[async_trait]
pub trait ChannelDirectory: Send + Sync {
    /// Create a channel with the given permission overwrites.
    async fn create_channel(&self, spec: CreateChannelSpec) -> Result<ChannelHandle>;

    /// Deliver a message to a channel.
    async fn send_message(
        &self,
        channel: &ChannelHandle,
        message: &OutgoingMessage,
    ) -> Result<MessageRef>;

    /// Resolve a message reference, failing when the target no longer exists.
    async fn fetch_message(&self, message: &MessageRef) -> Result<()>;

    /// Replace the content of an existing message.
    async fn edit_message(&self, message: &MessageRef, content: &OutgoingMessage) -> Result<()>;

    /// Rename a channel.
    async fn rename_channel(&self, channel: &ChannelHandle, new_name: &str) -> Result<()>;

    /// Whether a community member holds a role.
    async fn has_role(&self, member_id: &str, role_id: &str) -> Result<bool>;
}
