// low-level stdio transport: subprocess spawn, framing (Content-Length)
// and raw payload read/write
use crate::booster::channel::ChannelState;
use crate::lsp::transport::LspTransport;
use anyhow::{anyhow, Context};
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

pub struct StdioTransport {
    writer: ChildStdin,
    reader: BufReader<ChildStdout>,
    channel: ChannelState,
    spawned: Vec<String>,
    _child: Option<Child>, // keep the child handle so the pipes stay open
}

#[async_trait::async_trait]
impl LspTransport for StdioTransport {
    async fn send(&mut self, json_body: &str) -> anyhow::Result<()> {
        let length = json_body.len();
        let header = format!("Content-Length: {}\r\n\r\n", length);
        self.writer.write_all(header.as_bytes()).await?;
        self.writer.write_all(json_body.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn read(&mut self) -> anyhow::Result<Vec<u8>> {
        read_message_from(&mut self.reader).await
    }

    fn channel(&self) -> &ChannelState {
        &self.channel
    }

    fn channel_mut(&mut self) -> &mut ChannelState {
        &mut self.channel
    }

    fn spawned_command(&self) -> Option<&[String]> {
        Some(&self.spawned)
    }
}

impl StdioTransport {
    /// Spawn the launch vector (program + arguments, possibly wrapped by
    /// the booster) and connect to its stdio. Stderr passes through so
    /// server diagnostics stay visible.
    pub fn spawn(command: &[String]) -> anyhow::Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| anyhow!("empty launch vector"))?;

        let mut cmd = Command::new(program);
        for a in args {
            cmd.arg(a);
        }

        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let writer = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("failed to take child stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("failed to take child stdout"))?;

        Ok(StdioTransport {
            writer,
            reader: BufReader::new(stdout),
            channel: ChannelState::new(),
            spawned: command.to_vec(),
            _child: Some(child),
        })
    }
}

/// Read a single LSP message from an async reader (Content-Length
/// framing), returning the raw payload bytes. The payload is returned
/// unparsed: on a boosted channel it may be binary, not JSON.
pub(crate) async fn read_message_from<R>(reader: &mut R) -> anyhow::Result<Vec<u8>>
where
    R: AsyncRead + Unpin + Send,
{
    let mut header_buffer = Vec::new();

    loop {
        let mut byte = [0u8; 1];
        reader.read_exact(&mut byte).await?;
        header_buffer.push(byte[0]);
        if header_buffer.ends_with(b"\r\n\r\n") {
            break;
        }
    }

    let header_str = String::from_utf8(header_buffer)?;
    let content_length = get_content_length_from(&header_str)?;
    let mut payload_buffer = vec![0u8; content_length];
    reader.read_exact(&mut payload_buffer).await?;

    Ok(payload_buffer)
}

/// Extract Content-Length from header string. Case-insensitive search.
pub(crate) fn get_content_length_from(header: &str) -> anyhow::Result<usize> {
    for line in header.lines() {
        if line.to_lowercase().starts_with("content-length:") {
            if let Some(v) = line.split(':').nth(1) {
                let parsed = v.trim().parse::<usize>()?;
                return Ok(parsed);
            }
        }
    }
    Err(anyhow!("Content-Length header not found"))
}
