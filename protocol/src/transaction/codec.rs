//! Canonical binary codec primitives.
//!
//! Every integer on the wire is big-endian. Reads are bounds-checked before
//! they touch the buffer, so a truncated or lying input produces a
//! [`DecodeError`] and never a panic.

use bytes::{Buf, BufMut};
use thiserror::Error;

/// Structural decode failures. Any of these is fatal to the buffer: the
/// caller discards it, there is nothing to retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer cannot hold even the fixed part of the layout.
    #[error("buffer too short: need at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },

    /// A field runs past the end of the buffer.
    #[error("truncated {field}: need {needed} bytes, {remaining} remaining")]
    Truncated {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },

    /// The type tag does not name a known transaction variant.
    #[error("unknown transaction type tag {0}")]
    UnknownType(u32),

    /// A length prefix is negative.
    #[error("negative length prefix for {field}: {value}")]
    NegativeLength { field: &'static str, value: i32 },
}

/// Bounds-checked cursor over an encoded transaction.
pub(crate) struct WireReader<'a> {
    buf: &'a [u8],
}

impl<'a> WireReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Bytes not yet consumed.
    pub(crate) fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn need(&self, field: &'static str, needed: usize) -> Result<(), DecodeError> {
        if self.buf.remaining() < needed {
            return Err(DecodeError::Truncated {
                field,
                needed,
                remaining: self.buf.remaining(),
            });
        }
        Ok(())
    }

    pub(crate) fn read_u32(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        self.need(field, 4)?;
        Ok(self.buf.get_u32())
    }

    pub(crate) fn read_i32(&mut self, field: &'static str) -> Result<i32, DecodeError> {
        self.need(field, 4)?;
        Ok(self.buf.get_i32())
    }

    pub(crate) fn read_i64(&mut self, field: &'static str) -> Result<i64, DecodeError> {
        self.need(field, 8)?;
        Ok(self.buf.get_i64())
    }

    pub(crate) fn read_array<const N: usize>(
        &mut self,
        field: &'static str,
    ) -> Result<[u8; N], DecodeError> {
        self.need(field, N)?;
        let mut out = [0u8; N];
        self.buf.copy_to_slice(&mut out);
        Ok(out)
    }

    pub(crate) fn read_vec(&mut self, field: &'static str, len: usize) -> Result<Vec<u8>, DecodeError> {
        self.need(field, len)?;
        let mut out = vec![0u8; len];
        self.buf.copy_to_slice(&mut out);
        Ok(out)
    }

    /// Read a signed 32-bit length prefix, rejecting negative values.
    pub(crate) fn read_length(&mut self, field: &'static str) -> Result<usize, DecodeError> {
        let value = self.read_i32(field)?;
        usize::try_from(value).map_err(|_| DecodeError::NegativeLength { field, value })
    }
}

/// Write the type tag, padded to [`TYPE_LENGTH`](crate::config::TYPE_LENGTH).
pub(crate) fn put_type_tag(buf: &mut Vec<u8>, tag: u32) {
    buf.put_u32(tag);
}

/// Write a length-prefixed byte field.
///
/// Payload sizes are bounded far below `i32::MAX` by validation; a larger
/// input saturates the prefix, which then fails to decode instead of
/// silently wrapping.
pub(crate) fn put_length_prefixed(buf: &mut Vec<u8>, data: &[u8]) {
    buf.put_i32(i32::try_from(data.len()).unwrap_or(i32::MAX));
    buf.put_slice(data);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_reads_big_endian() {
        let bytes = [0x00, 0x00, 0x00, 0x0A, 0xFF, 0xFF, 0xFF, 0xFF];
        let mut reader = WireReader::new(&bytes);
        assert_eq!(reader.read_u32("tag").unwrap(), 10);
        assert_eq!(reader.read_i32("value").unwrap(), -1);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn reader_reports_truncation_without_consuming() {
        let bytes = [1, 2, 3];
        let mut reader = WireReader::new(&bytes);
        assert_eq!(
            reader.read_i64("timestamp"),
            Err(DecodeError::Truncated {
                field: "timestamp",
                needed: 8,
                remaining: 3
            })
        );
        assert_eq!(reader.remaining(), 3);
        assert_eq!(reader.read_array::<3>("rest").unwrap(), [1, 2, 3]);
    }

    #[test]
    fn negative_length_prefix_rejected() {
        let mut buf = Vec::new();
        buf.put_i32(-5);
        let mut reader = WireReader::new(&buf);
        assert_eq!(
            reader.read_length("data"),
            Err(DecodeError::NegativeLength {
                field: "data",
                value: -5
            })
        );
    }

    #[test]
    fn length_prefixed_roundtrip() {
        let mut buf = Vec::new();
        put_length_prefixed(&mut buf, b"abc");
        assert_eq!(buf, [0, 0, 0, 3, b'a', b'b', b'c']);

        let mut reader = WireReader::new(&buf);
        let len = reader.read_length("data").unwrap();
        assert_eq!(reader.read_vec("data", len).unwrap(), b"abc");
    }

    #[test]
    fn type_tag_is_four_bytes() {
        let mut buf = Vec::new();
        put_type_tag(&mut buf, 10);
        assert_eq!(buf, [0, 0, 0, 10]);
    }
}
