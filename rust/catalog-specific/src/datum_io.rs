//! Plain record bodies on a byte stream, without message framing.

use std::{
    io::{BufRead, Read, Write},
    marker::PhantomData,
};

use catalog_common::{Result, error::Error, try_or_ret_some_err};

use crate::{options::DecodeOptions, record::SpecificRecord, resolving::ResolvingDecoder};

/// Writes the body of `datum` to `writer`.
pub fn write_datum<T: SpecificRecord, W: Write>(datum: &T, mut writer: W) -> Result<()> {
    datum.custom_encode(&mut writer)?;
    writer.flush().map_err(|e| Error::io("datum", e))
}

/// Reads one record body from `reader`. The reader is left positioned right
/// after the body.
pub fn read_datum<T: SpecificRecord, R: Read>(mut reader: R, options: DecodeOptions) -> Result<T> {
    let mut input = ResolvingDecoder::new(&mut reader, options);
    let mut datum = T::default();
    datum.custom_decode(&mut input)?;
    Ok(datum)
}

/// Iterates over back-to-back record bodies until the stream ends.
///
/// The stream must end on a record boundary; a truncated trailing record is
/// reported as an error.
pub struct DatumReader<T, R> {
    reader: R,
    options: DecodeOptions,
    _marker: PhantomData<fn() -> T>,
}

impl<T: SpecificRecord, R: BufRead> DatumReader<T, R> {
    pub fn new(reader: R, options: DecodeOptions) -> Self {
        DatumReader {
            reader,
            options,
            _marker: PhantomData,
        }
    }
}

impl<T: SpecificRecord, R: BufRead> Iterator for DatumReader<T, R> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let at_end = try_or_ret_some_err!(
            self.reader
                .fill_buf()
                .map(|buf| buf.is_empty())
                .map_err(|e| Error::io("datum stream", e))
        );
        if at_end {
            return None;
        }
        let mut input = ResolvingDecoder::new(&mut self.reader, self.options);
        let mut datum = T::default();
        try_or_ret_some_err!(datum.custom_decode(&mut input));
        Some(Ok(datum))
    }
}
