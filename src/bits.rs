//! Bit-level I/O for the payload section.
//!
//! Bits are packed most-significant first. The writer counts every bit it
//! emits so the padding in the final byte can be computed from the total
//! alone; the reader replays that layout, discarding the padding bits of
//! the last byte.

use std::io::{self, Read, Write};

use bitstream_io::{BigEndian, BitWrite, BitWriter as RawBitWriter};

/// Number of zero bits needed to complete the last byte after `total_bits`.
pub fn padding_for(total_bits: u64) -> u8 {
    ((8 - total_bits % 8) % 8) as u8
}

/// Packs single bits into bytes on an underlying writer.
pub struct BitWriter<W: Write> {
    inner: RawBitWriter<W, BigEndian>,
    total_bits: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: RawBitWriter::endian(writer, BigEndian),
            total_bits: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.inner.write_bit(bit)?;
        self.total_bits += 1;
        Ok(())
    }

    pub fn write_code(&mut self, code: &[bool]) -> io::Result<()> {
        for &bit in code {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Bits emitted so far, including ones still buffered.
    pub fn total_bits(&self) -> u64 {
        self.total_bits
    }

    /// Bits waiting for their byte to fill up (0 to 7).
    pub fn pending_bits(&self) -> u8 {
        (self.total_bits % 8) as u8
    }

    /// Zero-pads and flushes a partial final byte.
    ///
    /// Returns the underlying writer together with the number of padding bits used.
    pub fn finish(mut self) -> io::Result<(W, u8)> {
        let padding = padding_for(self.total_bits);
        self.inner.byte_align()?;
        Ok((self.inner.into_writer(), padding))
    }
}

/// Replays bits written by [`BitWriter`], most-significant bit first.
///
/// The reader always holds one byte of lookahead so that, while draining the
/// current byte, it already knows whether that byte is the last one and how
/// many of its low bits are padding.
pub struct BitReader<R: Read> {
    inner: R,
    padding_bits: u8,
    current: u8,
    lookahead: Option<u8>,
    remaining: u8,
    primed: bool,
    bytes_read: u64,
}

impl<R: Read> BitReader<R> {
    /// `padding_bits` must be in `0..=7`.
    pub fn new(reader: R, padding_bits: u8) -> Self {
        debug_assert!(padding_bits < 8);
        Self {
            inner: reader,
            padding_bits,
            current: 0,
            lookahead: None,
            remaining: 0,
            primed: false,
            bytes_read: 0,
        }
    }

    /// Next significant bit, or `None` once the payload is exhausted.
    pub fn read_bit(&mut self) -> io::Result<Option<bool>> {
        if self.remaining == 0 && !self.advance()? {
            return Ok(None);
        }
        self.remaining -= 1;
        let shift = 7 - self.consumed_in_current();
        Ok(Some((self.current >> shift) & 1 == 1))
    }

    /// Payload bytes pulled from the underlying reader so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    fn consumed_in_current(&self) -> u8 {
        let significant = if self.lookahead.is_some() {
            8
        } else {
            8 - self.padding_bits
        };
        significant - self.remaining - 1
    }

    /// Moves the lookahead byte into `current`. Returns `false` at end of payload.
    fn advance(&mut self) -> io::Result<bool> {
        if !self.primed {
            self.lookahead = self.read_byte()?;
            self.primed = true;
        }
        let Some(byte) = self.lookahead.take() else {
            return Ok(false);
        };
        self.current = byte;
        self.lookahead = self.read_byte()?;
        self.remaining = if self.lookahead.is_some() {
            8
        } else {
            8 - self.padding_bits
        };
        Ok(true)
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.bytes_read += 1;
                    return Ok(Some(buf[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
