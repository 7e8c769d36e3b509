//! Interaction responses and permission bits.

use serde::{Deserialize, Serialize};

/// How the platform should treat an interaction response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ResponseType {
    Pong,
    ChannelMessageWithSource,
    DeferredChannelMessageWithSource,
    DeferredUpdateMessage,
    UpdateMessage,
}

impl From<ResponseType> for u8 {
    fn from(kind: ResponseType) -> Self {
        match kind {
            ResponseType::Pong => 1,
            ResponseType::ChannelMessageWithSource => 4,
            ResponseType::DeferredChannelMessageWithSource => 5,
            ResponseType::DeferredUpdateMessage => 6,
            ResponseType::UpdateMessage => 7,
        }
    }
}

impl TryFrom<u8> for ResponseType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => Self::Pong,
            4 => Self::ChannelMessageWithSource,
            5 => Self::DeferredChannelMessageWithSource,
            6 => Self::DeferredUpdateMessage,
            7 => Self::UpdateMessage,
            other => return Err(format!("unsupported response type: {other}")),
        })
    }
}

/// Message flag marking a response as visible to the invoker only.
pub const EPHEMERAL: u64 = 1 << 6;

/// A response to an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: ResponseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResponseData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

impl InteractionResponse {
    /// Replies with a channel message.
    pub fn message(content: impl Into<String>) -> Self {
        Self {
            kind: ResponseType::ChannelMessageWithSource,
            data: Some(ResponseData {
                content: Some(content.into()),
                flags: None,
            }),
        }
    }

    /// Marks the response as visible to the invoker only.
    pub fn ephemeral(mut self) -> Self {
        let data = self.data.get_or_insert_with(ResponseData::default);
        data.flags = Some(data.flags.unwrap_or(0) | EPHEMERAL);
        self
    }

    /// Returns the message content, if any.
    pub fn content(&self) -> Option<&str> {
        self.data.as_ref()?.content.as_deref()
    }
}

/// A permission bit set, as returned for a user in a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(pub u64);

impl Permissions {
    pub const ADMINISTRATOR: Self = Self(1 << 3);
    pub const MANAGE_GUILD: Self = Self(1 << 5);

    /// Returns `true` if every bit of `other` is set.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_message_shape() {
        let value = serde_json::to_value(InteractionResponse::message("5")).unwrap();
        assert_eq!(value, json!({ "type": 4, "data": { "content": "5" } }));
    }

    #[test]
    fn test_ephemeral_sets_flag() {
        let response = InteractionResponse::message("secret").ephemeral();
        assert_eq!(response.data.unwrap().flags, Some(EPHEMERAL));
    }

    #[test]
    fn test_permissions_contains() {
        let perms = Permissions(Permissions::ADMINISTRATOR.0 | Permissions::MANAGE_GUILD.0);
        assert!(perms.contains(Permissions::ADMINISTRATOR));
        assert!(!Permissions(1).contains(Permissions::ADMINISTRATOR));
    }
}
