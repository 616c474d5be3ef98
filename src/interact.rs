//! Chat-front abstraction.
//!
//! Games never talk to a chat platform directly. They receive an
//! [`Invocation`], ask it who is acting and in which channel, and hand back
//! [`ReplyPayload`] values for the front end to render. Slash commands,
//! prefixed messages, and button interactions all satisfy the same trait.

use async_trait::async_trait;
use thiserror::Error;

use crate::ledger::{ChannelKey, UserId};

/// Errors surfaced by the chat front when delivering a reply.
#[derive(Debug, Error)]
pub enum InteractError {
    #[error("Reply delivery failed: {0}")]
    Delivery(String),

    #[error("Invocation channel is gone")]
    ChannelClosed,
}

pub type InteractResult<T> = Result<T, InteractError>;

/// One incoming command or interaction, whatever its transport.
#[async_trait]
pub trait Invocation: Send + Sync {
    /// The user who triggered this invocation.
    fn acting_user(&self) -> UserId;

    /// The channel the invocation arrived in; sessions key on this.
    fn channel_key(&self) -> ChannelKey;

    /// Deliver a rendered reply back to the channel.
    async fn reply(&self, payload: ReplyPayload) -> InteractResult<()>;
}

/// Render-ready reply: a title, body text, and optional labelled fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyPayload {
    pub title: String,
    pub description: String,
    pub fields: Vec<(String, String)>,
}

impl ReplyPayload {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }
}

/// Standard mention markup for a user id.
pub fn mention(user_id: UserId) -> String {
    format!("<@{user_id}>")
}

/// Test invocation that records every reply it receives.
#[derive(Debug)]
pub struct RecordingInvocation {
    user_id: UserId,
    channel: ChannelKey,
    replies: std::sync::Mutex<Vec<ReplyPayload>>,
}

impl RecordingInvocation {
    pub fn new(user_id: UserId, channel: ChannelKey) -> Self {
        Self {
            user_id,
            channel,
            replies: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn replies(&self) -> Vec<ReplyPayload> {
        self.replies
            .lock()
            .map(|replies| replies.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Invocation for RecordingInvocation {
    fn acting_user(&self) -> UserId {
        self.user_id
    }

    fn channel_key(&self) -> ChannelKey {
        self.channel
    }

    async fn reply(&self, payload: ReplyPayload) -> InteractResult<()> {
        self.replies
            .lock()
            .map_err(|_| InteractError::ChannelClosed)?
            .push(payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recording_invocation_captures_replies() {
        let invocation = RecordingInvocation::new(7, 99);
        assert_eq!(invocation.acting_user(), 7);
        assert_eq!(invocation.channel_key(), 99);

        invocation
            .reply(ReplyPayload::new("Hit", "You drew a card").with_field("Total", "18"))
            .await
            .unwrap();

        let replies = invocation.replies();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].title, "Hit");
        assert_eq!(replies[0].fields[0].1, "18");
    }

    #[test]
    fn mention_markup() {
        assert_eq!(mention(1234), "<@1234>");
    }
}
