//! Message decoding over one framed payload: plain JSON baseline, plus the
//! dual-format path consulted on boosted channels.
//!
//! The framing layer hands over one complete payload per read, so the
//! format peek looks at the first byte of a fully buffered slice and a
//! failed binary attempt costs nothing: the plain-JSON fallback re-parses
//! the identical bytes. A payload neither format can decode is a fatal
//! read error for the connection; swallowing it would desynchronize every
//! message after it.

use anyhow::anyhow;

use crate::booster::channel::ChannelState;
use crate::booster::codec::{BinaryDecoder, FORMAT_SENTINEL};
use crate::lsp::message_parser::{parse_message_from_slice, parse_message_from_value};
use crate::lsp::types::Message;

/// Pluggable "decode one payload" seam. The client owns one of these as a
/// boxed trait object and can swap it at runtime, which is how the boost
/// feature attaches and detaches its read override.
pub trait MessageDecoder: Send + Sync {
    fn decode(&self, channel: &ChannelState, payload: &[u8]) -> anyhow::Result<Message>;
}

/// Baseline decoder: the unmodified plain-JSON path.
pub struct PlainDecoder;

impl MessageDecoder for PlainDecoder {
    fn decode(&self, _channel: &ChannelState, payload: &[u8]) -> anyhow::Result<Message> {
        parse_message_from_slice(payload)
    }
}

/// Boost-aware decoder. On an unboosted channel this is the baseline path
/// unchanged; on a boosted channel the first payload byte picks the format.
pub struct DualFormatDecoder {
    codec: BinaryDecoder,
}

impl Default for DualFormatDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl DualFormatDecoder {
    pub fn new() -> Self {
        DualFormatDecoder {
            codec: BinaryDecoder::new(),
        }
    }
}

impl MessageDecoder for DualFormatDecoder {
    fn decode(&self, channel: &ChannelState, payload: &[u8]) -> anyhow::Result<Message> {
        if !channel.is_boosted() {
            return parse_message_from_slice(payload);
        }

        if payload.first() != Some(&FORMAT_SENTINEL) {
            // boosted servers still emit plain JSON payloads interleaved
            // with binary ones
            return parse_message_from_slice(payload);
        }

        let framing_failure = match self.codec.decode_value(&payload[1..]) {
            Ok(value) => match parse_message_from_value(value) {
                Ok(message) => return Ok(message),
                Err(err) => {
                    tracing::debug!(error = %err, "binary payload is not a message, retrying as json");
                    err
                }
            },
            Err(err) => {
                tracing::debug!(error = %err, "binary decode failed, retrying as json");
                anyhow!(err)
            }
        };

        // Same input position: the whole payload, sentinel included. If
        // this also fails the stream is corrupt and the error must surface.
        parse_message_from_slice(payload).map_err(|json_err| {
            anyhow!(framing_failure)
                .context(json_err)
                .context("payload on boosted channel decodes as neither binary nor json")
        })
    }
}
