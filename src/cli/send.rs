//! `switchboard send`

use crate::server::config::AppConfig;
use anyhow::{Context, Result};
use switchboard_channels::{
    Attachment, ChannelKind, ChannelRegistry, OutgoingMessage, ReqwestTransport, Urn,
};
use tracing::info;
use uuid::Uuid;

/// Destination identity for `address` on a channel of `kind`
pub fn recipient(kind: ChannelKind, address: &str) -> switchboard_channels::Result<Urn> {
    match kind {
        ChannelKind::WhatsApp => Urn::whatsapp(address),
        ChannelKind::Rbm => Urn::rbm(address),
    }
}

/// Send one message and print the outcome as JSON
pub async fn run(
    config: &AppConfig,
    channel_uuid: Uuid,
    to: &str,
    text: String,
    attachment: Option<&str>,
) -> Result<()> {
    let channel = config
        .channel(channel_uuid)
        .with_context(|| format!("channel {channel_uuid} is not configured"))?;

    let registry = ChannelRegistry::with_defaults();
    let handler = registry
        .get(channel.kind)
        .with_context(|| format!("no handler for channel kind {}", channel.kind))?;

    let mut msg = OutgoingMessage::text(recipient(channel.kind, to)?, text);
    if let Some(raw) = attachment {
        msg = msg.with_attachment(raw.parse::<Attachment>()?);
    }

    let transport = ReqwestTransport::new()?;
    let outcome = handler.send(channel, &msg, &transport).await?;
    info!(msg_id = %outcome.msg_id, status = ?outcome.status, "send finished");

    println!(
        "{}",
        serde_json::to_string_pretty(&outcome).context("Failed to serialize send outcome")?
    );
    Ok(())
}
