//! Single-object message encoding.
//!
//! Layout:
//! ```text
//! ┌────────────┬──────────────────────────────┬─────────────────┐
//! │ C3 01      │ writer schema fingerprint    │ record body     │
//! │ (2 bytes)  │ (8 bytes, little-endian)     │ (binary datum)  │
//! └────────────┴──────────────────────────────┴─────────────────┘
//! ```
//!
//! The fingerprint is the 64-bit Rabin fingerprint of the writer schema's
//! canonical form. A reader decodes the body directly when the fingerprint is
//! its own, and otherwise resolves the writer schema through known schemas or
//! a [`SchemaStore`].

use std::{
    io::{Read, Write},
    marker::PhantomData,
    sync::{Arc, Mutex, PoisonError},
};

use apache_avro::{GenericSingleObjectWriter, Schema};
use catalog_common::{Result, error::Error};

use crate::{
    options::DecodeOptions,
    record::SpecificRecord,
    resolving::ResolvingDecoder,
    store::{FINGERPRINT_SIZE, SchemaCache, SchemaStore, fingerprint64},
};

/// Magic and format version preceding the fingerprint.
pub const V1_HEADER: [u8; 2] = [0xC3, 0x01];

/// Total size of the message header.
pub const HEADER_SIZE: usize = V1_HEADER.len() + FINGERPRINT_SIZE;

/// Parses a message header and returns the writer schema fingerprint.
///
/// # Errors
///
/// Returns `BadHeader` if fewer than [`HEADER_SIZE`] bytes are available or the
/// magic bytes are not recognized.
pub fn read_message_header<R: Read + ?Sized>(reader: &mut R) -> Result<u64> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::bad_header("Not enough header bytes")
        } else {
            Error::io("message header", e)
        }
    })?;
    if header[..V1_HEADER.len()] != V1_HEADER {
        return Err(Error::bad_header(format!(
            "Unrecognized header bytes: 0x{:02X} 0x{:02X}",
            header[0], header[1]
        )));
    }
    let mut fingerprint = [0u8; FINGERPRINT_SIZE];
    fingerprint.copy_from_slice(&header[V1_HEADER.len()..]);
    Ok(u64::from_le_bytes(fingerprint))
}

/// Encodes records of type `T` as single-object messages.
///
/// Safe to share between threads; concurrent encodes take turns on the
/// underlying writer.
pub struct BinaryMessageEncoder<T> {
    schema: &'static Schema,
    fingerprint: u64,
    writer: Mutex<GenericSingleObjectWriter>,
    _marker: PhantomData<fn(&T)>,
}

impl<T: SpecificRecord> BinaryMessageEncoder<T> {
    /// # Errors
    ///
    /// Fails if `T`'s schema cannot be resolved into a writer.
    pub fn new() -> Result<Self> {
        let schema = T::class_schema();
        Ok(BinaryMessageEncoder {
            schema,
            fingerprint: fingerprint64(schema),
            writer: Mutex::new(single_object_writer(schema)?),
            _marker: PhantomData,
        })
    }

    /// Fingerprint written into every message header.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Encodes `datum` into a new buffer.
    pub fn encode(&self, datum: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(HEADER_SIZE + 8);
        self.encode_to(datum, &mut buf)?;
        Ok(buf)
    }

    /// Writes the message for `datum` to `out`.
    pub fn encode_to<W: Write>(&self, datum: &T, out: &mut W) -> Result<()> {
        let value = datum.to_value()?;
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writer.write_value(value, out) {
            // The writer refuses further messages while a failed body is buffered.
            *writer = single_object_writer(self.schema)?;
            return Err(Error::avro("single-object message", e));
        }
        Ok(())
    }
}

fn single_object_writer(schema: &Schema) -> Result<GenericSingleObjectWriter> {
    GenericSingleObjectWriter::new_with_capacity(schema, HEADER_SIZE + 8)
        .map_err(|e| Error::avro("single-object writer", e))
}

/// Decodes single-object messages into records of type `T`.
pub struct BinaryMessageDecoder<T> {
    reader_schema: &'static Schema,
    reader_fingerprint: u64,
    known: SchemaCache,
    resolver: Option<Arc<dyn SchemaStore>>,
    options: DecodeOptions,
    _marker: PhantomData<fn() -> T>,
}

impl<T: SpecificRecord> BinaryMessageDecoder<T> {
    /// Creates a decoder that accepts messages written with `T`'s own schema.
    pub fn new() -> Self {
        let reader_schema = T::class_schema();
        BinaryMessageDecoder {
            reader_schema,
            reader_fingerprint: fingerprint64(reader_schema),
            known: SchemaCache::new(),
            resolver: None,
            options: DecodeOptions::default(),
            _marker: PhantomData,
        }
    }

    /// Creates a decoder that falls back to `resolver` for fingerprints it
    /// does not know.
    pub fn with_resolver(resolver: Arc<dyn SchemaStore>) -> Self {
        let mut decoder = Self::new();
        decoder.resolver = Some(resolver);
        decoder
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Registers a writer schema whose messages this decoder can read.
    pub fn add_schema(&self, writer_schema: Schema) {
        self.known.add_schema(writer_schema);
    }

    pub fn decode(&self, buf: &[u8]) -> Result<T> {
        self.decode_into(buf, T::default())
    }

    /// Decodes `buf`, reusing `reuse` as the target record. Bytes after the
    /// record body are ignored.
    pub fn decode_into(&self, mut buf: &[u8], mut reuse: T) -> Result<T> {
        let fingerprint = read_message_header(&mut buf)?;
        let writer_schema = self.writer_schema(fingerprint)?;

        let mut input = match &writer_schema {
            None => ResolvingDecoder::new(&mut buf, self.options),
            Some(writer) => {
                ResolvingDecoder::resolve(&mut buf, writer, self.reader_schema, self.options)?
            }
        };
        reuse.custom_decode(&mut input)?;
        Ok(reuse)
    }

    /// Finds the writer schema for `fingerprint`. `None` means the reader's own
    /// schema.
    fn writer_schema(&self, fingerprint: u64) -> Result<Option<Schema>> {
        if fingerprint == self.reader_fingerprint {
            return Ok(None);
        }
        let found = self.known.find_by_fingerprint(fingerprint).or_else(|| {
            self.resolver
                .as_ref()
                .and_then(|resolver| resolver.find_by_fingerprint(fingerprint))
        });
        match found {
            Some(schema) => {
                log::debug!("resolving message written with schema {fingerprint:#018x}");
                Ok(Some(schema))
            }
            None => Err(Error::missing_schema(fingerprint)),
        }
    }
}

impl<T: SpecificRecord> Default for BinaryMessageDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}
