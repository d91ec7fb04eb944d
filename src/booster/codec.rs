//! Decoder for the booster's compact payload encoding.
//!
//! A boosted payload is the sentinel byte `#` followed by exactly one
//! value. Values are tagged: `s`/`y` are length-prefixed string/symbol
//! bytes, `i`/`d` are fixed-width little-endian scalars, `a`/`m` are
//! counted containers. Lengths and counts are u32 little-endian. The
//! protocol atoms travel as symbols: `t` is JSON true, `nil` is JSON null,
//! and the false token the booster was launched with (`--false-token`)
//! is JSON false. The crate never encodes this format; the booster does.

use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::booster::command::FALSE_TOKEN;

/// First byte of a binary-encoded payload on a boosted channel.
pub const FORMAT_SENTINEL: u8 = b'#';

const TAG_STRING: u8 = b's';
const TAG_SYMBOL: u8 = b'y';
const TAG_INT: u8 = b'i';
const TAG_FLOAT: u8 = b'd';
const TAG_ARRAY: u8 = b'a';
const TAG_MAP: u8 = b'm';

const TRUE_SYMBOL: &str = "t";
const NULL_SYMBOL: &str = "nil";

/// Containers nested deeper than this are rejected; no real JSON-RPC
/// message comes close and a corrupt count must not recurse unbounded.
const MAX_DEPTH: usize = 64;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload truncated at offset {0}")]
    Truncated(usize),
    #[error("unknown value tag 0x{tag:02x} at offset {offset}")]
    UnknownTag { tag: u8, offset: usize },
    #[error("{kind} at offset {offset} is not valid utf-8")]
    InvalidUtf8 { kind: &'static str, offset: usize },
    #[error("map key at offset {0} is not a string or symbol")]
    InvalidKey(usize),
    #[error("non-finite float at offset {0}")]
    NonFiniteFloat(usize),
    #[error("nesting too deep at offset {0}")]
    TooDeep(usize),
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),
}

struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.buf.len())
            .ok_or(DecodeError::Truncated(self.pos))?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn tag(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn text(&mut self, kind: &'static str) -> Result<String, DecodeError> {
        let len = self.u32()? as usize;
        let offset = self.pos;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| DecodeError::InvalidUtf8 { kind, offset })
    }
}

/// Decodes compact binary payloads into `serde_json::Value`.
pub struct BinaryDecoder {
    false_token: String,
}

impl Default for BinaryDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryDecoder {
    pub fn new() -> Self {
        Self::with_false_token(FALSE_TOKEN)
    }

    pub fn with_false_token(token: &str) -> Self {
        BinaryDecoder {
            false_token: token.to_string(),
        }
    }

    /// Decode the bytes following the `#` sentinel as one complete value.
    ///
    /// The payload slice is fully buffered by the framing layer, so a
    /// failed decode consumes nothing the caller can observe. Trailing
    /// bytes after the value mean the payload was not one message and are
    /// rejected rather than silently ignored.
    pub fn decode_value(&self, payload: &[u8]) -> Result<Value, DecodeError> {
        let mut cursor = Cursor { buf: payload, pos: 0 };
        let value = self.value(&mut cursor, 0)?;
        let rest = payload.len() - cursor.pos;
        if rest != 0 {
            return Err(DecodeError::TrailingBytes(rest));
        }
        Ok(value)
    }

    fn value(&self, cursor: &mut Cursor<'_>, depth: usize) -> Result<Value, DecodeError> {
        if depth > MAX_DEPTH {
            return Err(DecodeError::TooDeep(cursor.pos));
        }
        let offset = cursor.pos;
        match cursor.tag()? {
            TAG_STRING => Ok(Value::String(cursor.text("string")?)),
            TAG_SYMBOL => Ok(self.symbol(cursor.text("symbol")?)),
            TAG_INT => {
                let bytes = cursor.take(8)?;
                let mut raw = [0u8; 8];
                raw.copy_from_slice(bytes);
                Ok(Value::Number(Number::from(i64::from_le_bytes(raw))))
            }
            TAG_FLOAT => {
                let bytes = cursor.take(8)?;
                let mut raw = [0u8; 8];
                raw.copy_from_slice(bytes);
                let float = f64::from_le_bytes(raw);
                Number::from_f64(float)
                    .map(Value::Number)
                    .ok_or(DecodeError::NonFiniteFloat(offset))
            }
            TAG_ARRAY => {
                let count = cursor.u32()? as usize;
                let mut items = Vec::new();
                for _ in 0..count {
                    items.push(self.value(cursor, depth + 1)?);
                }
                Ok(Value::Array(items))
            }
            TAG_MAP => {
                let count = cursor.u32()? as usize;
                let mut map = Map::new();
                for _ in 0..count {
                    let key_offset = cursor.pos;
                    let key = match cursor.tag()? {
                        // keys are raw text even when the symbol happens to
                        // collide with a protocol atom
                        TAG_STRING | TAG_SYMBOL => cursor.text("map key")?,
                        _ => return Err(DecodeError::InvalidKey(key_offset)),
                    };
                    let value = self.value(cursor, depth + 1)?;
                    map.insert(key, value);
                }
                Ok(Value::Object(map))
            }
            tag => Err(DecodeError::UnknownTag { tag, offset }),
        }
    }

    fn symbol(&self, name: String) -> Value {
        if name == TRUE_SYMBOL {
            Value::Bool(true)
        } else if name == NULL_SYMBOL {
            Value::Null
        } else if name == self.false_token {
            Value::Bool(false)
        } else {
            Value::String(name)
        }
    }
}
