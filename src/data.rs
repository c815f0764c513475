use std::fmt;

use serde::Serialize;

use crate::channel::FsfChannel;
use crate::cursor::ByteCursor;
use crate::error::{Error, Result};

/// On-disk sample encoding of a waveform, all little endian.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

/// Datatype tags written by FSF producers. These follow numpy dtype names,
/// with native or explicit little-endian byte order.
///
/// |  type  | width | tags |
/// |--------|-------|------|
/// |  I8    |   1   | `int8` `i1` `b` |
/// |  U8    |   1   | `uint8` `u1` `B` |
/// |  I16   |   2   | `int16` `i2` `h` `short` |
/// |  U16   |   2   | `uint16` `u2` `H` `ushort` |
/// |  I32   |   4   | `int32` `i4` `i` `intc` |
/// |  U32   |   4   | `uint32` `u4` `I` `uintc` |
/// |  I64   |   8   | `int64` `i8` `q` `int` `long` `longlong` |
/// |  U64   |   8   | `uint64` `u8` `Q` `uint` `ulong` `ulonglong` |
/// |  F32   |   4   | `float32` `f4` `f` `single` |
/// |  F64   |   8   | `float64` `f8` `d` `float` `double` |
///
/// `int`, `long`, `uint` and `ulong` take their 64-bit Linux/macOS width;
/// numpy on Windows makes them 32 bit.
///
/// Short `i`/`u`/`f` codes also accept a `<`, `=` or (single byte) `|` prefix.
const DATATYPE_TAGS: &[(&str, SampleType)] = &[
    ("int8", SampleType::I8),
    ("i1", SampleType::I8),
    ("<i1", SampleType::I8),
    ("|i1", SampleType::I8),
    ("=i1", SampleType::I8),
    ("b", SampleType::I8),
    ("uint8", SampleType::U8),
    ("u1", SampleType::U8),
    ("<u1", SampleType::U8),
    ("|u1", SampleType::U8),
    ("=u1", SampleType::U8),
    ("B", SampleType::U8),
    ("int16", SampleType::I16),
    ("i2", SampleType::I16),
    ("<i2", SampleType::I16),
    ("=i2", SampleType::I16),
    ("h", SampleType::I16),
    ("short", SampleType::I16),
    ("uint16", SampleType::U16),
    ("u2", SampleType::U16),
    ("<u2", SampleType::U16),
    ("=u2", SampleType::U16),
    ("H", SampleType::U16),
    ("ushort", SampleType::U16),
    ("int32", SampleType::I32),
    ("i4", SampleType::I32),
    ("<i4", SampleType::I32),
    ("=i4", SampleType::I32),
    ("i", SampleType::I32),
    ("intc", SampleType::I32),
    ("uint32", SampleType::U32),
    ("u4", SampleType::U32),
    ("<u4", SampleType::U32),
    ("=u4", SampleType::U32),
    ("I", SampleType::U32),
    ("uintc", SampleType::U32),
    ("int64", SampleType::I64),
    ("i8", SampleType::I64),
    ("<i8", SampleType::I64),
    ("=i8", SampleType::I64),
    ("q", SampleType::I64),
    ("int", SampleType::I64),
    ("long", SampleType::I64),
    ("longlong", SampleType::I64),
    ("uint64", SampleType::U64),
    ("u8", SampleType::U64),
    ("<u8", SampleType::U64),
    ("=u8", SampleType::U64),
    ("Q", SampleType::U64),
    ("uint", SampleType::U64),
    ("ulong", SampleType::U64),
    ("ulonglong", SampleType::U64),
    ("float32", SampleType::F32),
    ("f4", SampleType::F32),
    ("<f4", SampleType::F32),
    ("=f4", SampleType::F32),
    ("f", SampleType::F32),
    ("single", SampleType::F32),
    ("float64", SampleType::F64),
    ("f8", SampleType::F64),
    ("<f8", SampleType::F64),
    ("=f8", SampleType::F64),
    ("d", SampleType::F64),
    ("float", SampleType::F64),
    ("double", SampleType::F64),
];

impl SampleType {
    /// Look up a datatype tag. Surrounding whitespace and NUL padding is ignored.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim_matches(|c: char| c == '\0' || c.is_ascii_whitespace());
        DATATYPE_TAGS
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|&(_, typ)| typ)
    }

    /// Bytes per sample.
    pub fn width(&self) -> usize {
        match self {
            SampleType::I8 | SampleType::U8 => 1,
            SampleType::I16 | SampleType::U16 => 2,
            SampleType::I32 | SampleType::U32 | SampleType::F32 => 4,
            SampleType::I64 | SampleType::U64 | SampleType::F64 => 8,
        }
    }

    pub fn is_signed(&self) -> bool {
        !matches!(
            self,
            SampleType::U8 | SampleType::U16 | SampleType::U32 | SampleType::U64
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, SampleType::F32 | SampleType::F64)
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleType::I8 => write!(f, "I8"),
            SampleType::U8 => write!(f, "U8"),
            SampleType::I16 => write!(f, "I16"),
            SampleType::U16 => write!(f, "U16"),
            SampleType::I32 => write!(f, "I32"),
            SampleType::U32 => write!(f, "U32"),
            SampleType::I64 => write!(f, "I64"),
            SampleType::U64 => write!(f, "U64"),
            SampleType::F32 => write!(f, "F32"),
            SampleType::F64 => write!(f, "F64"),
        }
    }
}

/// Decoded samples of one channel.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum Waveform {
    I8(Vec<i8>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    I64(Vec<i64>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

macro_rules! decode_data {
    ($data: expr, $typ: ident, $len: expr) => {
        $data
            .chunks_exact($len)
            .map(|b| {
                let mut byte = [0; $len];
                byte.copy_from_slice(b);
                <$typ>::from_le_bytes(byte)
            })
            .collect()
    };
}

macro_rules! each_variant {
    ($self: expr, $v: ident => $body: expr) => {
        match $self {
            Waveform::I8($v) => $body,
            Waveform::U8($v) => $body,
            Waveform::I16($v) => $body,
            Waveform::U16($v) => $body,
            Waveform::I32($v) => $body,
            Waveform::U32($v) => $body,
            Waveform::I64($v) => $body,
            Waveform::U64($v) => $body,
            Waveform::F32($v) => $body,
            Waveform::F64($v) => $body,
        }
    };
}

impl Waveform {
    /// Interpret `raw` (exactly `n * typ.width()` bytes) as samples of `typ`.
    pub(crate) fn from_raw(typ: SampleType, raw: &[u8]) -> Self {
        match typ {
            SampleType::I8 => Waveform::I8(decode_data!(raw, i8, 1)),
            SampleType::U8 => Waveform::U8(raw.to_vec()),
            SampleType::I16 => Waveform::I16(decode_data!(raw, i16, 2)),
            SampleType::U16 => Waveform::U16(decode_data!(raw, u16, 2)),
            SampleType::I32 => Waveform::I32(decode_data!(raw, i32, 4)),
            SampleType::U32 => Waveform::U32(decode_data!(raw, u32, 4)),
            SampleType::I64 => Waveform::I64(decode_data!(raw, i64, 8)),
            SampleType::U64 => Waveform::U64(decode_data!(raw, u64, 8)),
            SampleType::F32 => Waveform::F32(decode_data!(raw, f32, 4)),
            SampleType::F64 => Waveform::F64(decode_data!(raw, f64, 8)),
        }
    }

    pub(crate) fn decode(cur: &mut ByteCursor, index: usize, channel: &FsfChannel) -> Result<Self> {
        let typ = SampleType::from_tag(&channel.datatype).ok_or_else(|| Error::UnknownDatatype {
            channel: index,
            tag: channel.datatype.clone(),
        })?;
        let offset = cur.position();
        let nbytes = channel
            .length
            .checked_mul(typ.width())
            .ok_or(Error::TruncatedInput {
                offset,
                needed: usize::MAX,
                remaining: cur.remaining(),
            })?;
        let raw = cur.read_fixed(nbytes)?;
        log::trace!(
            "waveform {}: {} x {} at {}",
            index,
            channel.length,
            typ,
            offset
        );
        Ok(Self::from_raw(typ, raw))
    }

    pub fn sample_type(&self) -> SampleType {
        match self {
            Waveform::I8(_) => SampleType::I8,
            Waveform::U8(_) => SampleType::U8,
            Waveform::I16(_) => SampleType::I16,
            Waveform::U16(_) => SampleType::U16,
            Waveform::I32(_) => SampleType::I32,
            Waveform::U32(_) => SampleType::U32,
            Waveform::I64(_) => SampleType::I64,
            Waveform::U64(_) => SampleType::U64,
            Waveform::F32(_) => SampleType::F32,
            Waveform::F64(_) => SampleType::F64,
        }
    }

    pub fn len(&self) -> usize {
        each_variant!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Samples widened to `f64`, for plotting. 64-bit integers beyond 2^53 lose precision.
    pub fn to_f64(&self) -> Vec<f64> {
        each_variant!(self, v => v.iter().map(|&s| s as f64).collect())
    }
}
