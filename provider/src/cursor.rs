//! Byte cursor shared by the TZif and POSIX TZ readers.

use crate::{TzdbError, TzdbResult};

/// Helper to read data from a byte slice.
pub(crate) struct Cursor<'a> {
    /// Slice representing the remaining data to be read.
    remaining: &'a [u8],
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { remaining: bytes }
    }

    pub(crate) fn read_exact(&mut self, len: usize) -> TzdbResult<&'a [u8]> {
        if self.remaining.len() < len {
            return Err(TzdbError::invalid_format("unexpected end of data"));
        }
        let (data, remaining) = self.remaining.split_at(len);
        self.remaining = remaining;
        Ok(data)
    }

    pub(crate) fn read_u8(&mut self) -> TzdbResult<u8> {
        Ok(self.read_exact(1)?[0])
    }

    pub(crate) fn read_be_i32(&mut self) -> TzdbResult<i32> {
        let bytes = self.read_exact(4)?;
        // read_exact checked the length.
        Ok(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub(crate) fn read_be_u32(&mut self) -> TzdbResult<u32> {
        let bytes = self.read_exact(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub(crate) fn read_be_i64(&mut self) -> TzdbResult<i64> {
        let bytes = self.read_exact(8)?;
        Ok(i64::from_be_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }

    pub(crate) fn read_le_i32(&mut self) -> TzdbResult<i32> {
        let bytes = self.read_exact(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub(crate) fn read_le_u16(&mut self) -> TzdbResult<u16> {
        let bytes = self.read_exact(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Consumes bytes until `byte` is found, returning the consumed prefix.
    /// The terminator itself is left in place.
    pub(crate) fn read_until(&mut self, byte: u8) -> &'a [u8] {
        let index = self
            .remaining
            .iter()
            .position(|b| *b == byte)
            .unwrap_or(self.remaining.len());
        let (data, remaining) = self.remaining.split_at(index);
        self.remaining = remaining;
        data
    }

    pub(crate) fn read_while(&mut self, pred: impl Fn(&u8) -> bool) -> &'a [u8] {
        let index = self
            .remaining
            .iter()
            .position(|b| !pred(b))
            .unwrap_or(self.remaining.len());
        let (data, remaining) = self.remaining.split_at(index);
        self.remaining = remaining;
        data
    }

    pub(crate) fn read_tag(&mut self, bytes: &[u8]) -> TzdbResult<()> {
        let data = self.read_exact(bytes.len())?;
        if data != bytes {
            return Err(TzdbError::invalid_format("unexpected bytes read"));
        }
        Ok(())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.remaining.first().copied()
    }
}
