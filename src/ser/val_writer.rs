use std::io::Write;
use std::marker::PhantomData;

use byteorder::ByteOrder;
use byteorder::WriteBytesExt;

use crate::PlyError;

pub struct BinValWriter<W: Write, E: ByteOrder> {
    writer: W,
    _endian: PhantomData<E>,
}

impl<W: Write, E: ByteOrder> BinValWriter<W, E> {
    pub(crate) fn new(writer: W) -> Self {
        Self {
            writer,
            _endian: PhantomData,
        }
    }
}

pub struct AsciiValWriter<W: Write> {
    writer: W,
    row_started: bool,
}

impl<W: Write> AsciiValWriter<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self {
            writer,
            row_started: false,
        }
    }

    fn separator(&mut self) -> Result<(), PlyError> {
        if self.row_started {
            write!(self.writer, " ")?;
        }
        self.row_started = true;
        Ok(())
    }
}

/// Sink for the scalar types the geometry writer emits.
pub trait ScalarWriter {
    fn write_u8(&mut self, val: u8) -> Result<(), PlyError>;
    fn write_i32(&mut self, val: i32) -> Result<(), PlyError>;
    fn write_f32(&mut self, val: f32) -> Result<(), PlyError>;

    fn write_row_end(&mut self) -> Result<(), PlyError>;
}

impl<W: Write, E: ByteOrder> ScalarWriter for BinValWriter<W, E> {
    fn write_u8(&mut self, val: u8) -> Result<(), PlyError> {
        Ok(self.writer.write_u8(val)?)
    }

    fn write_i32(&mut self, val: i32) -> Result<(), PlyError> {
        Ok(self.writer.write_i32::<E>(val)?)
    }

    fn write_f32(&mut self, val: f32) -> Result<(), PlyError> {
        Ok(self.writer.write_f32::<E>(val)?)
    }

    fn write_row_end(&mut self) -> Result<(), PlyError> {
        Ok(())
    }
}

impl<W: Write> ScalarWriter for AsciiValWriter<W> {
    fn write_u8(&mut self, val: u8) -> Result<(), PlyError> {
        self.separator()?;
        write!(self.writer, "{val}")?;
        Ok(())
    }

    fn write_i32(&mut self, val: i32) -> Result<(), PlyError> {
        self.separator()?;
        write!(self.writer, "{val}")?;
        Ok(())
    }

    fn write_f32(&mut self, val: f32) -> Result<(), PlyError> {
        self.separator()?;
        // Display prints the shortest text that parses back to the same f32.
        write!(self.writer, "{val}")?;
        Ok(())
    }

    fn write_row_end(&mut self) -> Result<(), PlyError> {
        writeln!(self.writer)?;
        self.row_started = false;
        Ok(())
    }
}
