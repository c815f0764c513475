use crate::error::{Error, Result};

/// Forward-only read head over an in-memory FSF buffer.
///
/// Every read either consumes exactly the bytes it needs or fails with
/// [`Error::TruncatedInput`] without moving.
pub(crate) struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

macro_rules! read_le {
    ($self: expr, $typ: ident, $len: expr) => {{
        let mut bytes = [0; $len];
        bytes.copy_from_slice($self.read_fixed($len)?);
        <$typ>::from_le_bytes(bytes)
    }};
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn read_fixed(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(Error::TruncatedInput {
                offset: self.pos,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_fixed(n).map(|_| ())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(read_le!(self, i32, 4))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(read_le!(self, f64, 8))
    }

    pub fn read_f64_triple(&mut self) -> Result<(f64, f64, f64)> {
        Ok((self.read_f64()?, self.read_f64()?, self.read_f64()?))
    }

    /// int32 byte length followed by that many UTF-8 bytes.
    pub fn read_string(&mut self, field: &'static str) -> Result<String> {
        let len = self.read_i32()?;
        if len < 0 {
            return Err(Error::MalformedLength { field, value: len });
        }
        let bytes = self.read_fixed(len as usize)?;
        let text = std::str::from_utf8(bytes)
            .map_err(|source| Error::InvalidEncoding { field, source })?;
        Ok(text.to_string())
    }

    pub fn read_i32_array<const N: usize>(&mut self) -> Result<[i32; N]> {
        let raw = self.read_fixed(N * 4)?;
        let mut out = [0i32; N];
        for (v, b) in out.iter_mut().zip(raw.chunks_exact(4)) {
            *v = i32::from_le_bytes([b[0], b[1], b[2], b[3]]);
        }
        Ok(out)
    }

    pub fn read_f64_array<const N: usize>(&mut self) -> Result<[f64; N]> {
        let raw = self.read_fixed(N * 8)?;
        let mut out = [0f64; N];
        for (v, b) in out.iter_mut().zip(raw.chunks_exact(8)) {
            let mut bytes = [0; 8];
            bytes.copy_from_slice(b);
            *v = f64::from_le_bytes(bytes);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fixed_width_reads() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(-7i32).to_le_bytes());
        bytes.extend_from_slice(&1.5f64.to_le_bytes());
        let mut cur = ByteCursor::new(&bytes);
        assert_eq!(cur.read_i32().unwrap(), -7);
        assert_eq!(cur.read_f64().unwrap(), 1.5);
        assert_eq!(cur.remaining(), 0);
        assert_eq!(cur.position(), 12);
    }

    #[test]
    fn truncated_read_does_not_advance() {
        let bytes = [1u8, 2, 3];
        let mut cur = ByteCursor::new(&bytes);
        match cur.read_i32() {
            Err(Error::TruncatedInput {
                offset: 0,
                needed: 4,
                remaining: 3,
            }) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(cur.position(), 0);
        assert_eq!(cur.read_fixed(3).unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn length_prefixed_string() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&4i32.to_le_bytes());
        bytes.extend_from_slice("STA1".as_bytes());
        bytes.extend_from_slice(&0i32.to_le_bytes());
        let mut cur = ByteCursor::new(&bytes);
        assert_eq!(cur.read_string("name").unwrap(), "STA1");
        assert_eq!(cur.read_string("component").unwrap(), "");
    }

    #[test]
    fn negative_string_length() {
        let bytes = (-1i32).to_le_bytes();
        let mut cur = ByteCursor::new(&bytes);
        assert!(matches!(
            cur.read_string("name"),
            Err(Error::MalformedLength {
                field: "name",
                value: -1
            })
        ));
    }

    #[test]
    fn invalid_utf8() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&2i32.to_le_bytes());
        bytes.extend_from_slice(&[0xC3, 0x28]);
        let mut cur = ByteCursor::new(&bytes);
        assert!(matches!(
            cur.read_string("filename"),
            Err(Error::InvalidEncoding {
                field: "filename",
                ..
            })
        ));
    }

    #[test]
    fn fixed_arrays() {
        let mut bytes = Vec::new();
        for i in 0..3i32 {
            bytes.extend_from_slice(&(i * 10).to_le_bytes());
        }
        for i in 0..2 {
            bytes.extend_from_slice(&(i as f64 + 0.25).to_le_bytes());
        }
        let mut cur = ByteCursor::new(&bytes);
        assert_eq!(cur.read_i32_array::<3>().unwrap(), [0, 10, 20]);
        assert_eq!(cur.read_f64_array::<2>().unwrap(), [0.25, 1.25]);
        assert!(cur.read_i32_array::<1>().is_err());
    }
}
