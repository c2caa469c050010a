// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Counting byte sink/source wrappers used by every codec.
//!
//! Both wrappers track how many bytes went through them. `Source` turns an
//! `UnexpectedEof` from the transport into [`DecodeError::Truncated`] so that
//! running out of data is reported as bad input, while every other I/O error
//! passes through untouched.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use uuid::Uuid;

use super::varint::{self, MAX_VARINT_LEN};
use crate::error::{DecodeError, ProtocolError, ProtocolResult};

/// Generate little-endian write methods for fixed-width integers.
macro_rules! impl_write_le {
    ($name:ident, $type:ty, $write:ident, $size:expr) => {
        pub fn $name(&mut self, value: $type) -> ProtocolResult<()> {
            self.inner.$write::<LittleEndian>(value)?;
            self.position += $size;
            Ok(())
        }
    };
}

/// Generate little-endian read methods for fixed-width integers.
///
/// The offset reported on truncation is the one at which the read began.
macro_rules! impl_read_le {
    ($name:ident, $type:ty, $read:ident, $size:expr) => {
        pub fn $name(&mut self) -> ProtocolResult<$type> {
            let offset = self.position;
            let value = self
                .inner
                .$read::<LittleEndian>()
                .map_err(|e| eof_as_truncated(e, offset))?;
            self.position += $size;
            Ok(value)
        }
    };
}

fn eof_as_truncated(err: io::Error, offset: u64) -> ProtocolError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        DecodeError::Truncated { offset }.into()
    } else {
        ProtocolError::Io(err)
    }
}

/// Write half: wraps any `io::Write` and counts bytes written.
pub struct Sink<'a> {
    inner: &'a mut dyn Write,
    position: u64,
}

impl<'a> Sink<'a> {
    pub fn new(inner: &'a mut dyn Write) -> Self {
        Self { inner, position: 0 }
    }

    /// Bytes written so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn write_u8(&mut self, value: u8) -> ProtocolResult<()> {
        self.inner.write_u8(value)?;
        self.position += 1;
        Ok(())
    }

    impl_write_le!(write_u16_le, u16, write_u16, 2);
    impl_write_le!(write_u32_le, u32, write_u32, 4);
    impl_write_le!(write_u64_le, u64, write_u64, 8);
    impl_write_le!(write_i32_le, i32, write_i32, 4);

    pub fn write_bool(&mut self, value: bool) -> ProtocolResult<()> {
        self.write_u8(u8::from(value))
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> ProtocolResult<()> {
        self.inner.write_all(data)?;
        self.position += data.len() as u64;
        Ok(())
    }

    pub fn write_varint(&mut self, value: u64) -> ProtocolResult<()> {
        let (buf, len) = varint::encode_varint_array(value);
        self.write_bytes(&buf[..len])
    }

    pub fn write_uuid(&mut self, id: &Uuid) -> ProtocolResult<()> {
        self.write_bytes(id.as_bytes())
    }
}

/// Read half: wraps any `io::Read` and counts bytes consumed.
pub struct Source<'a> {
    inner: &'a mut dyn Read,
    position: u64,
}

impl<'a> Source<'a> {
    pub fn new(inner: &'a mut dyn Read) -> Self {
        Self { inner, position: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn read_u8(&mut self) -> ProtocolResult<u8> {
        let offset = self.position;
        let value = self
            .inner
            .read_u8()
            .map_err(|e| eof_as_truncated(e, offset))?;
        self.position += 1;
        Ok(value)
    }

    impl_read_le!(read_u16_le, u16, read_u16, 2);
    impl_read_le!(read_u32_le, u32, read_u32, 4);
    impl_read_le!(read_u64_le, u64, read_u64, 8);
    impl_read_le!(read_i32_le, i32, read_i32, 4);

    pub fn read_bool(&mut self) -> ProtocolResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_exact(&mut self, buf: &mut [u8]) -> ProtocolResult<()> {
        let offset = self.position;
        self.inner
            .read_exact(buf)
            .map_err(|e| eof_as_truncated(e, offset))?;
        self.position += buf.len() as u64;
        Ok(())
    }

    /// Read `len` bytes into a buffer that grows with the data actually
    /// present, so a lying length prefix costs no up-front allocation.
    pub fn read_vec(&mut self, len: u64) -> ProtocolResult<Vec<u8>> {
        let offset = self.position;
        let mut buf = Vec::new();
        let read = (&mut *self.inner).take(len).read_to_end(&mut buf)? as u64;
        self.position += read;
        if read < len {
            return Err(DecodeError::Truncated { offset }.into());
        }
        Ok(buf)
    }

    pub fn read_array<const N: usize>(&mut self) -> ProtocolResult<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    pub fn read_uuid(&mut self) -> ProtocolResult<Uuid> {
        Ok(Uuid::from_bytes(self.read_array::<16>()?))
    }

    /// Read a ULEB128 varint one byte at a time.
    pub fn read_varint(&mut self) -> ProtocolResult<u64> {
        let mut buf = [0u8; MAX_VARINT_LEN];
        for i in 0..MAX_VARINT_LEN {
            buf[i] = self.read_u8()?;
            if !varint::has_continuation(buf[i]) {
                let (value, _) = varint::decode_varint(&buf[..=i])
                    .map_err(|_| DecodeError::VarintOverflow)?;
                return Ok(value);
            }
        }
        Err(DecodeError::VarintOverflow.into())
    }

    pub fn read_varint_u32(&mut self) -> ProtocolResult<u32> {
        let value = self.read_varint()?;
        u32::try_from(value).map_err(|_| DecodeError::VarintOverflow.into())
    }

    /// Consume a varint without accumulating its value.
    pub fn skip_varint(&mut self) -> ProtocolResult<()> {
        for _ in 0..MAX_VARINT_LEN {
            if !varint::has_continuation(self.read_u8()?) {
                return Ok(());
            }
        }
        Err(DecodeError::VarintOverflow.into())
    }

    /// Discard `len` bytes without buffering them.
    pub fn skip_bytes(&mut self, len: u64) -> ProtocolResult<()> {
        let offset = self.position;
        let copied = io::copy(&mut (&mut *self.inner).take(len), &mut io::sink())?;
        self.position += copied;
        if copied < len {
            return Err(DecodeError::Truncated { offset }.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_U16: u16 = 0xCDEF;
    const TEST_U32: u32 = 0x1234_5678;
    const TEST_U64: u64 = 0x1122_3344_5566_7788;

    #[test]
    fn test_sink_source_roundtrip_across_numeric_types() {
        let mut buf = Vec::new();
        let mut sink = Sink::new(&mut buf);
        sink.write_u8(0xAB).expect("write u8");
        sink.write_u16_le(TEST_U16).expect("write u16");
        sink.write_u32_le(TEST_U32).expect("write u32");
        sink.write_u64_le(TEST_U64).expect("write u64");
        sink.write_i32_le(-42).expect("write i32");
        sink.write_bool(true).expect("write bool");
        sink.write_varint(300).expect("write varint");
        assert_eq!(sink.position(), 1 + 2 + 4 + 8 + 4 + 1 + 2);

        let mut bytes = buf.as_slice();
        let mut source = Source::new(&mut bytes);
        assert_eq!(source.read_u8().expect("read u8"), 0xAB);
        assert_eq!(source.read_u16_le().expect("read u16"), TEST_U16);
        assert_eq!(source.read_u32_le().expect("read u32"), TEST_U32);
        assert_eq!(source.read_u64_le().expect("read u64"), TEST_U64);
        assert_eq!(source.read_i32_le().expect("read i32"), -42);
        assert!(source.read_bool().expect("read bool"));
        assert_eq!(source.read_varint().expect("read varint"), 300);
        assert_eq!(source.position(), buf.len() as u64);
    }

    #[test]
    fn test_little_endian_layout() {
        let mut buf = Vec::new();
        Sink::new(&mut buf).write_u32_le(TEST_U32).expect("write");
        assert_eq!(buf, vec![0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_truncated_read_reports_offset() {
        let data = [0x01u8, 0x02, 0x03];
        let mut bytes = &data[..];
        let mut source = Source::new(&mut bytes);
        source.read_u16_le().expect("read u16");

        match source.read_u32_le() {
            Err(ProtocolError::Decode(DecodeError::Truncated { offset })) => assert_eq!(offset, 2),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_read_vec_takes_only_what_is_there() {
        let data = [9u8, 8, 7, 6];
        let mut bytes = &data[..];
        let mut source = Source::new(&mut bytes);
        assert_eq!(source.read_vec(2).expect("read two"), vec![9, 8]);
        assert_eq!(source.position(), 2);

        let err = source.read_vec(u64::from(u32::MAX)).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::Decode(DecodeError::Truncated { offset: 2 })
        ));
        assert_eq!(source.position(), 4);
    }

    #[test]
    fn test_skip_bytes_past_end_is_truncated() {
        let data = [0u8; 4];
        let mut bytes = &data[..];
        let mut source = Source::new(&mut bytes);
        source.skip_bytes(3).expect("skip within bounds");
        assert_eq!(source.position(), 3);

        let err = source.skip_bytes(2).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::Decode(DecodeError::Truncated { offset: 3 })
        ));
    }

    #[test]
    fn test_skip_varint_matches_read_varint() {
        let mut buf = Vec::new();
        let mut sink = Sink::new(&mut buf);
        for value in [0u64, 127, 128, 16_384, u64::MAX] {
            sink.write_varint(value).expect("write varint");
        }

        let mut bytes = buf.as_slice();
        let mut reader = Source::new(&mut bytes);
        let mut consumed = Vec::new();
        for _ in 0..5 {
            reader.read_varint().expect("read varint");
            consumed.push(reader.position());
        }

        let mut bytes = buf.as_slice();
        let mut skipper = Source::new(&mut bytes);
        for expected in consumed {
            skipper.skip_varint().expect("skip varint");
            assert_eq!(skipper.position(), expected);
        }
    }

    #[test]
    fn test_overlong_varint_rejected() {
        let data = [0x80u8; 11];
        let mut bytes = &data[..];
        let mut source = Source::new(&mut bytes);
        assert!(matches!(
            source.read_varint(),
            Err(ProtocolError::Decode(DecodeError::VarintOverflow))
        ));

        let mut bytes = &data[..];
        let mut source = Source::new(&mut bytes);
        assert!(matches!(
            source.skip_varint(),
            Err(ProtocolError::Decode(DecodeError::VarintOverflow))
        ));
    }

    #[test]
    fn test_varint_u32_overflow() {
        let mut buf = Vec::new();
        Sink::new(&mut buf)
            .write_varint(u64::from(u32::MAX) + 1)
            .expect("write varint");
        let mut bytes = buf.as_slice();
        let mut source = Source::new(&mut bytes);
        assert!(matches!(
            source.read_varint_u32(),
            Err(ProtocolError::Decode(DecodeError::VarintOverflow))
        ));
    }

    #[test]
    fn test_uuid_roundtrip() {
        let id = Uuid::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef);
        let mut buf = Vec::new();
        Sink::new(&mut buf).write_uuid(&id).expect("write uuid");
        assert_eq!(buf.len(), 16);
        assert_eq!(buf[0], 0x01);

        let mut bytes = buf.as_slice();
        assert_eq!(Source::new(&mut bytes).read_uuid().expect("read uuid"), id);
    }
}
