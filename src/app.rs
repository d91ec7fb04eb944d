use anyhow::Context;
use tokio::time::{timeout, Duration};

use crate::booster::{command, BoostFeature};
use crate::cli::Config;
use crate::lsp::stdio_transport::StdioTransport;
use crate::lsp::types::Message;
use crate::lsp::LspClient;

/// How long to keep draining server notifications after the handshake
/// before shutting the session down.
const DRAIN_WINDOW: Duration = Duration::from_secs(5);

pub async fn run(config: Config) -> anyhow::Result<()> {
    let mut feature = BoostFeature::new(config.options);
    if config.boost {
        // activation failure is user-visible but never fatal to the
        // launch; the session continues unboosted
        if let Err(err) = feature.activate() {
            tracing::warn!(error = %err, "continuing without boost");
        }
    }

    let remote = command::remote_workspace(&config.workspace);
    let launch = feature.launch_command(&config.server_command, remote);
    tracing::debug!(command = %launch.join(" "), "launching server");

    let mut transport =
        StdioTransport::spawn(&launch).context("failed to launch the language server")?;
    feature.observe_connection(&mut transport);

    let mut client = LspClient::new(
        Box::new(transport),
        feature.decoder(),
        config.workspace.clone(),
    );

    let session = async {
        client
            .initialize()
            .await
            .context("initialize handshake failed")?;
        tracing::info!(workspace = %config.workspace, "server initialized");

        drain_notifications(&mut client, DRAIN_WINDOW).await?;
        Ok::<(), anyhow::Error>(())
    }
    .await;

    if let Err(err) = client.shutdown().await {
        tracing::warn!(error = %err, "shutdown sequence failed");
    }
    feature.deactivate();

    session
}

/// Log inbound notifications until the server goes quiet. A read error
/// here is a transport failure and surfaces; the quiet timeout is the
/// normal exit.
async fn drain_notifications(client: &mut LspClient, window: Duration) -> anyhow::Result<()> {
    loop {
        match timeout(window, client.receive_message()).await {
            Ok(Ok(Message::Notification(notification))) => {
                tracing::info!(method = %notification.method, "server notification");
            }
            Ok(Ok(message)) => {
                tracing::debug!(message = ?message, "unsolicited message");
            }
            Ok(Err(err)) => return Err(err).context("reading server messages failed"),
            Err(_elapsed) => return Ok(()),
        }
    }
}
