use byteorder::{BigEndian, ByteOrder};
use thiserror::Error;

type Endian = BigEndian;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    U8,
    U16,
    U32,
}
impl Width {
    pub const fn bytes(self) -> usize {
        match self {
            Width::U8 => 1,
            Width::U16 => 2,
            Width::U32 => 4,
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Needed {needed} byte(s) at offset {offset}, found {remaining}")]
pub struct EndOfInput {
    pub offset: usize,
    pub needed: usize,
    pub remaining: usize,
}

/// Sequential big-endian reader over a borrowed buffer.
///
/// A read either consumes exactly the bytes it decodes or fails with
/// [`EndOfInput`] and leaves the offset where it was.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn has_remaining(&self, width: Width) -> bool {
        self.remaining() >= width.bytes()
    }

    pub fn read(&mut self, width: Width) -> Result<u32, EndOfInput> {
        Ok(match width {
            Width::U8 => self.read_u8()? as u32,
            Width::U16 => self.read_u16()? as u32,
            Width::U32 => self.read_u32()?,
        })
    }

    pub fn read_u8(&mut self) -> Result<u8, EndOfInput> {
        Ok(self.take(Width::U8.bytes())?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, EndOfInput> {
        Ok(Endian::read_u16(self.take(Width::U16.bytes())?))
    }

    pub fn read_u32(&mut self) -> Result<u32, EndOfInput> {
        Ok(Endian::read_u32(self.take(Width::U32.bytes())?))
    }

    /// Consumes the next `len` bytes verbatim.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8], EndOfInput> {
        let remaining = self.remaining();
        if remaining < len {
            return Err(EndOfInput {
                offset: self.pos,
                needed: len,
                remaining,
            });
        }

        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Steps back over the last value of `width`.
    ///
    /// # Panics
    ///
    /// Panics if that would move before the start of the buffer.
    pub fn rewind(&mut self, width: Width) {
        assert!(
            self.pos >= width.bytes(),
            "cannot rewind {} byte(s) from offset {}",
            width.bytes(),
            self.pos
        );
        self.pos -= width.bytes();
    }
}
