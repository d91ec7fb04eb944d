pub mod message_creator;
pub mod message_parser;
pub mod stdio_transport;
pub mod transport;
pub mod types;

use anyhow::Context;

use crate::booster::reader::MessageDecoder;
use crate::lsp::message_creator::MessageCreator;
use crate::lsp::transport::LspTransport;
use crate::lsp::types::{Message, Notification, Request};

/// Client side of one server connection: owns the transport, the payload
/// decoder installed for it, and the handshake message construction.
pub struct LspClient {
    transport: Box<dyn LspTransport>,
    decoder: Box<dyn MessageDecoder>,
    message_creator: MessageCreator,
    workspace: String,
}

impl LspClient {
    pub fn new(
        transport: Box<dyn LspTransport>,
        decoder: Box<dyn MessageDecoder>,
        workspace: String,
    ) -> Self {
        LspClient {
            transport,
            decoder,
            message_creator: MessageCreator::new(),
            workspace,
        }
    }

    /// Swap the payload decoder. This is the runtime attach/detach point
    /// for the boost read override; the baseline decoder restores the
    /// plain behavior without disturbing the transport.
    pub fn set_decoder(&mut self, decoder: Box<dyn MessageDecoder>) {
        self.decoder = decoder;
    }

    pub async fn send_request(&mut self, request: &Request) -> anyhow::Result<i32> {
        let body = serde_json::to_string(request)?;
        self.transport.send(&body).await?;
        Ok(request.id)
    }

    pub async fn send_notification(&mut self, notification: &Notification) -> anyhow::Result<()> {
        let body = serde_json::to_string(notification)?;
        self.transport.send(&body).await
    }

    /// Read and decode exactly one inbound message.
    pub async fn receive_message(&mut self) -> anyhow::Result<Message> {
        let payload = self.transport.read().await?;
        self.decoder.decode(self.transport.channel(), &payload)
    }

    /// Read until the response (or error response) for `id` arrives.
    /// Server notifications received in between are logged and dropped.
    pub async fn receive_response(&mut self, id: i32) -> anyhow::Result<Message> {
        loop {
            match self.receive_message().await? {
                Message::Response(response) if response.id == id => {
                    return Ok(Message::Response(response));
                }
                Message::Error(error) if error.id == id => {
                    return Ok(Message::Error(error));
                }
                Message::Notification(notification) => {
                    tracing::debug!(
                        method = %notification.method,
                        waiting_for = id,
                        "notification while waiting for response"
                    );
                }
                other => {
                    tracing::debug!(message = ?other, waiting_for = id, "unmatched response");
                }
            }
        }
    }

    pub async fn initialize(&mut self) -> anyhow::Result<()> {
        let request = self.message_creator.initialize(&self.workspace)?;
        let id = self.send_request(&request).await?;
        match self.receive_response(id).await? {
            Message::Response(_) => {}
            Message::Error(error) => {
                anyhow::bail!("initialize rejected: {:?}", error.error)
            }
            Message::Notification(notification) => {
                anyhow::bail!("unexpected message during initialize: {:?}", notification)
            }
        }

        let initialized = self.message_creator.initialized_notification()?;
        self.send_notification(&initialized)
            .await
            .context("failed to send initialized")
    }

    pub async fn shutdown(&mut self) -> anyhow::Result<()> {
        let request = self.message_creator.shutdown()?;
        let id = self.send_request(&request).await?;
        let _response = self.receive_response(id).await?;

        let exit = self.message_creator.exit_notification()?;
        self.send_notification(&exit).await
    }
}
