use std::io::BufRead;
use std::marker::PhantomData;

use byteorder::ByteOrder;

use crate::{PlyError, ScalarType};

/// Binary element data, fully materialized, read front to back.
pub struct BinValReader<'a, E: ByteOrder> {
    data: &'a [u8],
    pos: usize,
    _endian: PhantomData<E>,
}

impl<'a, E: ByteOrder> BinValReader<'a, E> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            _endian: PhantomData,
        }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8], PlyError> {
        let available = self.remaining();
        if available < needed {
            return Err(PlyError::TruncatedBinaryData {
                offset: self.pos,
                needed,
                available,
            });
        }
        let bytes = &self.data[self.pos..self.pos + needed];
        self.pos += needed;
        Ok(bytes)
    }
}

/// ASCII element data, one record per line.
pub struct AsciiValReader<R: BufRead> {
    reader: R,
    buf: String,
    tokens: Vec<String>,
    token_index: usize,
    line: usize,
}

impl<R: BufRead> AsciiValReader<R> {
    /// `first_line` is the 1-based line number of the first data line, used
    /// in error messages.
    pub fn new(reader: R, first_line: usize) -> Self {
        Self {
            reader,
            buf: String::new(),
            tokens: Vec::new(),
            token_index: 0,
            line: first_line.saturating_sub(1),
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    fn next_token(&mut self) -> Result<&str, PlyError> {
        let index = self.token_index;
        if index >= self.tokens.len() {
            return Err(PlyError::UnexpectedEndOfRow { line: self.line });
        }
        self.token_index += 1;
        Ok(&self.tokens[index])
    }
}

/// Source of scalar values for one element block.
pub trait ScalarReader {
    /// Advance to the next record. `false` means the input is exhausted.
    fn begin_row(&mut self) -> Result<bool, PlyError>;

    /// Whether the current record has values left. Binary records always do;
    /// ASCII lines may be shorter than the declared schema.
    fn row_has_values(&self) -> bool {
        true
    }

    /// Read one scalar, widened to `f32` without any normalization.
    fn read_scalar(&mut self, ty: ScalarType) -> Result<f32, PlyError>;

    /// Read one integer, for list counts and indices.
    fn read_int(&mut self, ty: ScalarType) -> Result<i64, PlyError>;

    /// Step over a value whose type is not known.
    fn skip_unknown(&mut self) -> Result<(), PlyError>;
}

impl<E: ByteOrder> ScalarReader for BinValReader<'_, E> {
    fn begin_row(&mut self) -> Result<bool, PlyError> {
        Ok(self.remaining() > 0)
    }

    fn read_scalar(&mut self, ty: ScalarType) -> Result<f32, PlyError> {
        let bytes = self.take(ty.size_bytes())?;
        Ok(match ty {
            ScalarType::Char => bytes[0] as i8 as f32,
            ScalarType::UChar => bytes[0] as f32,
            ScalarType::Short => E::read_i16(bytes) as f32,
            ScalarType::UShort => E::read_u16(bytes) as f32,
            ScalarType::Int => E::read_i32(bytes) as f32,
            ScalarType::UInt => E::read_u32(bytes) as f32,
            ScalarType::Float => E::read_f32(bytes),
            ScalarType::Double => E::read_f64(bytes) as f32,
        })
    }

    fn read_int(&mut self, ty: ScalarType) -> Result<i64, PlyError> {
        let bytes = self.take(ty.size_bytes())?;
        Ok(match ty {
            ScalarType::Char => bytes[0] as i8 as i64,
            ScalarType::UChar => bytes[0] as i64,
            ScalarType::Short => E::read_i16(bytes) as i64,
            ScalarType::UShort => E::read_u16(bytes) as i64,
            ScalarType::Int => E::read_i32(bytes) as i64,
            ScalarType::UInt => E::read_u32(bytes) as i64,
            ScalarType::Float => E::read_f32(bytes) as i64,
            ScalarType::Double => E::read_f64(bytes) as i64,
        })
    }

    fn skip_unknown(&mut self) -> Result<(), PlyError> {
        Err(PlyError::InvalidHeader(
            "Property of unknown width in binary data".to_string(),
        ))
    }
}

impl<R: BufRead> ScalarReader for AsciiValReader<R> {
    fn begin_row(&mut self) -> Result<bool, PlyError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(false);
            }
            self.line += 1;

            let trimmed = self.buf.trim();
            if trimmed.is_empty() {
                continue;
            }

            self.tokens.clear();
            self.tokens
                .extend(trimmed.split_whitespace().map(str::to_string));
            self.token_index = 0;
            return Ok(true);
        }
    }

    fn row_has_values(&self) -> bool {
        self.token_index < self.tokens.len()
    }

    fn read_scalar(&mut self, _ty: ScalarType) -> Result<f32, PlyError> {
        let line = self.line;
        let token = self.next_token()?;
        token.parse::<f32>().map_err(|_| PlyError::MalformedAsciiToken {
            token: token.to_string(),
            line,
        })
    }

    fn read_int(&mut self, _ty: ScalarType) -> Result<i64, PlyError> {
        let line = self.line;
        let token = self.next_token()?;
        token.parse::<i64>().map_err(|_| PlyError::MalformedAsciiToken {
            token: token.to_string(),
            line,
        })
    }

    fn skip_unknown(&mut self) -> Result<(), PlyError> {
        self.next_token().map(|_| ())
    }
}
