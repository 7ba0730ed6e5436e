//! # Matrix Service Adapter
//!
//! Implements the `ChatProvider` trait for the Matrix protocol using the `matrix_sdk`.
//! This module acts as the bridge between the generic `ChatProvider` interface used by the bot's core logic
//! and the specific implementation details of the Matrix SDK.

use crate::domain::traits::ChatProvider;
use crate::domain::types::InboundMessage;
use anyhow::Result;
use async_trait::async_trait;
use matrix_sdk::room::Room;
use matrix_sdk::ruma::EventId;
use matrix_sdk::ruma::events::relation::InReplyTo;
use matrix_sdk::ruma::events::room::message::{
    MessageType, OriginalSyncRoomMessageEvent, Relation, RoomMessageEventContent,
};
use matrix_sdk::ruma::events::{AnySyncMessageLikeEvent, AnySyncTimelineEvent, SyncMessageLikeEvent};
use std::convert::TryFrom;

#[derive(Clone)]
pub struct MatrixService {
    room: Room,
}

impl MatrixService {
    pub fn new(room: Room) -> Self {
        Self { room }
    }

    /// Converts a text message event into the transport-neutral `InboundMessage`,
    /// fetching the body of the replied-to event when there is one.
    pub async fn inbound(&self, event: &OriginalSyncRoomMessageEvent) -> Option<InboundMessage> {
        let MessageType::Text(text) = &event.content.msgtype else {
            return None;
        };

        let mut message = InboundMessage::new(event.sender.as_str(), strip_reply_fallback(&text.body));
        if let Some(Relation::Reply { in_reply_to }) = &event.content.relates_to {
            match self.fetch_body(&in_reply_to.event_id).await {
                Ok(Some(body)) => {
                    message = message.replying_to(in_reply_to.event_id.as_str(), body);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!("Error fetching replied message {}: {}", in_reply_to.event_id, e);
                }
            }
        }
        Some(message)
    }

    /// Body of a room message event, `None` for any other event type.
    async fn fetch_body(&self, event_id: &EventId) -> Result<Option<String>> {
        let event = self.room.event(event_id, None).await?;
        let body = match event.raw().deserialize()? {
            AnySyncTimelineEvent::MessageLike(AnySyncMessageLikeEvent::RoomMessage(
                SyncMessageLikeEvent::Original(original),
            )) => Some(strip_reply_fallback(original.content.body())),
            _ => None,
        };
        Ok(body)
    }

    async fn internal_reply(&self, event_id: &str, content: &str) -> Result<String> {
        let event_id = <&EventId>::try_from(event_id)?;
        let mut content = RoomMessageEventContent::text_markdown(content);
        content.relates_to = Some(Relation::Reply {
            in_reply_to: InReplyTo::new(event_id.to_owned()),
        });
        let response = self.room.send(content).await?;
        Ok(response.event_id.to_string())
    }
}

/// Drops the quoted `> ` block clients prepend to replies, keeping the new text.
pub fn strip_reply_fallback(body: &str) -> String {
    if !body.starts_with("> ") {
        return body.to_string();
    }
    body.lines()
        .skip_while(|line| line.starts_with('>'))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[async_trait]
impl ChatProvider for MatrixService {
    fn room_id(&self) -> String {
        self.room.room_id().as_str().to_string()
    }

    async fn send_message(&self, content: &str) -> Result<String, String> {
        tracing::info!("Bot sending message to {}: {}", self.room_id(), content);
        self.room
            .send(RoomMessageEventContent::text_markdown(content))
            .await
            .map(|resp| resp.event_id.to_string())
            .map_err(|e| e.to_string())
    }

    async fn send_reply(&self, in_reply_to: &str, content: &str) -> Result<String, String> {
        tracing::info!("Bot replying to {} in {}: {}", in_reply_to, self.room_id(), content);
        self.internal_reply(in_reply_to, content)
            .await
            .map_err(|e| e.to_string())
    }

    async fn typing(&self, active: bool) -> Result<(), String> {
        self.room
            .typing_notice(active)
            .await
            .map_err(|e| e.to_string())
    }
}
