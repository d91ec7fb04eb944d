//! LSP transport abstraction (framed Content-Length messages).
use crate::booster::channel::ChannelState;
use async_trait::async_trait;

/// Minimal async trait for LSP transport.
/// - `send` takes a JSON body (not including LSP headers), frames it
///   (Content-Length) and sends it.
/// - `read` returns the raw payload bytes of one framed message (header
///   stripped). Bytes, not a string: boosted payloads are not UTF-8 JSON.
///
/// Every transport owns the boost state of its stream and, when it spawned
/// a subprocess itself, the argv that subprocess was actually started
/// with. Both feed the boost feature's seams.
#[async_trait]
pub trait LspTransport: Send + Sync {
    async fn send(&mut self, json_body: &str) -> anyhow::Result<()>;
    async fn read(&mut self) -> anyhow::Result<Vec<u8>>;

    fn channel(&self) -> &ChannelState;
    fn channel_mut(&mut self) -> &mut ChannelState;

    /// The actual spawn argv, when this transport knows it. Transports
    /// that did not spawn anything (sockets, in-memory test streams)
    /// report `None` and classification is skipped.
    fn spawned_command(&self) -> Option<&[String]> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::LspTransport;
    use crate::booster::channel::ChannelState;
    use async_trait::async_trait;
    use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt, DuplexStream};

    struct InMemoryTransport {
        stream: DuplexStream,
        channel: ChannelState,
    }

    impl InMemoryTransport {
        fn new(stream: DuplexStream) -> Self {
            Self {
                stream,
                channel: ChannelState::new(),
            }
        }
    }

    #[async_trait]
    impl LspTransport for InMemoryTransport {
        async fn send(&mut self, json_body: &str) -> anyhow::Result<()> {
            let framed = format!("Content-Length: {}\r\n\r\n{}", json_body.len(), json_body);
            self.stream.write_all(framed.as_bytes()).await?;
            self.stream.flush().await?;
            Ok(())
        }

        async fn read(&mut self) -> anyhow::Result<Vec<u8>> {
            crate::lsp::stdio_transport::read_message_from(&mut self.stream).await
        }

        fn channel(&self) -> &ChannelState {
            &self.channel
        }

        fn channel_mut(&mut self) -> &mut ChannelState {
            &mut self.channel
        }
    }

    #[tokio::test]
    async fn test_inmemory_read_body() {
        let (a, mut b) = duplex(1024);
        let mut transport = InMemoryTransport::new(a);

        let handle = tokio::spawn(async move {
            let json = r#"{"jsonrpc":"2.0","id":1,"result":{"ok":true}}"#;
            let framed = format!("Content-Length: {}\r\n\r\n{}", json.len(), json);
            b.write_all(framed.as_bytes()).await.unwrap();
            b.flush().await.unwrap();
        });

        let body = transport.read().await.expect("read failed");
        assert!(String::from_utf8(body).unwrap().contains("\"result\""));

        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_inmemory_send_framing() {
        let (a, mut b) = duplex(1024);
        let mut transport = InMemoryTransport::new(a);

        let reader = tokio::spawn(async move {
            let mut header_buf: Vec<u8> = Vec::new();
            loop {
                let mut byte = [0u8; 1];
                b.read_exact(&mut byte).await.unwrap();
                header_buf.push(byte[0]);
                if header_buf.ends_with(b"\r\n\r\n") {
                    break;
                }
            }
            let header = String::from_utf8(header_buf).unwrap();
            let mut content_length = 0usize;
            for line in header.lines() {
                if line.to_lowercase().starts_with("content-length:") {
                    content_length = line.split(':').nth(1).unwrap().trim().parse().unwrap();
                }
            }
            let mut body = vec![0u8; content_length];
            b.read_exact(&mut body).await.unwrap();
            String::from_utf8(body).unwrap()
        });

        transport
            .send("{\"jsonrpc\":\"2.0\",\"method\":\"test\",\"params\":{}}")
            .await
            .expect("send failed");

        let received = reader.await.expect("reader task failed");
        assert!(received.contains("\"method\":\"test\""));
    }

    #[tokio::test]
    async fn test_default_spawned_command_is_unavailable() {
        let (a, _b) = duplex(16);
        let transport = InMemoryTransport::new(a);
        assert!(transport.spawned_command().is_none());
        assert!(!transport.channel().is_boosted());
    }
}
