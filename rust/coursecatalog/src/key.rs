//! The course catalog message key.

use std::{
    io::{Read, Write},
    sync::{Arc, LazyLock},
};

use apache_avro::{
    Schema,
    schema::{RecordField, RecordSchema},
    types::Value,
};
use catalog_common::Result;
use catalog_specific::{
    BinaryMessageDecoder, BinaryMessageEncoder, DecodeOptions, RecordBuilderBase, ResolvingDecoder,
    SchemaStore, SpecificRecord,
    nullable::{nullable_int_from_value, nullable_int_value, read_nullable_int, write_nullable_int},
    read_datum,
    record::{corrupt_field_order, invalid_index, record_schema},
    write_datum,
};
use serde::{Deserialize, Serialize};

/// JSON text of the `Key` schema.
pub const SCHEMA_JSON: &str = r#"{"type":"record","name":"Key","namespace":"inc.evil.coursecatalog","fields":[{"name":"id","type":["null","int"],"default":null}],"connect.name":"inc.evil.coursecatalog.Key"}"#;

const ID_POS: usize = 0;

static SCHEMA: LazyLock<Schema> =
    LazyLock::new(|| Schema::parse_str(SCHEMA_JSON).expect("valid Key schema"));

static ENCODER: LazyLock<BinaryMessageEncoder<Key>> =
    LazyLock::new(|| BinaryMessageEncoder::new().expect("Key schema resolves"));

static DECODER: LazyLock<BinaryMessageDecoder<Key>> = LazyLock::new(BinaryMessageDecoder::new);

fn key_record_schema() -> &'static RecordSchema {
    record_schema(&SCHEMA).expect("Key schema is a record")
}

fn id_field() -> &'static RecordField {
    &key_record_schema().fields[ID_POS]
}

/// Message key of the course catalog: an optional course id.
///
/// `Key::default()` holds no id. The schema default is only applied by
/// [`KeyBuilder::build`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    id: Option<i32>,
}

impl Key {
    pub fn new(id: Option<i32>) -> Key {
        Key { id }
    }

    /// The shared single-object encoder for `Key`.
    pub fn encoder() -> &'static BinaryMessageEncoder<Key> {
        &ENCODER
    }

    /// The shared single-object decoder for `Key`. It only accepts messages
    /// written with this schema.
    pub fn decoder() -> &'static BinaryMessageDecoder<Key> {
        &DECODER
    }

    /// Creates a decoder that looks up foreign writer schemas in `resolver`.
    pub fn create_decoder(resolver: Arc<dyn SchemaStore>) -> BinaryMessageDecoder<Key> {
        BinaryMessageDecoder::with_resolver(resolver)
    }

    /// Serializes this key as a single-object message.
    pub fn to_byte_buffer(&self) -> Result<Vec<u8>> {
        ENCODER.encode(self)
    }

    /// Deserializes a key from a single-object message.
    pub fn from_byte_buffer(buf: &[u8]) -> Result<Key> {
        DECODER.decode(buf)
    }

    /// Writes the plain record body, without message framing.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        write_datum(self, writer)
    }

    /// Reads a plain record body.
    pub fn read_from<R: Read>(reader: R) -> Result<Key> {
        read_datum(reader, DecodeOptions::default())
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn set_id(&mut self, value: Option<i32>) {
        self.id = value;
    }

    pub fn new_builder() -> KeyBuilder {
        KeyBuilder::new()
    }

    /// Creates a builder holding the same values and set-flags as `other`.
    pub fn new_builder_from(other: &KeyBuilder) -> KeyBuilder {
        other.clone()
    }
}

impl SpecificRecord for Key {
    fn class_schema() -> &'static Schema {
        &SCHEMA
    }

    fn get(&self, pos: usize) -> Result<Value> {
        match pos {
            ID_POS => Ok(nullable_int_value(self.id)),
            _ => Err(invalid_index(pos)),
        }
    }

    fn put(&mut self, pos: usize, value: Value) -> Result<()> {
        match pos {
            ID_POS => self.id = nullable_int_from_value(value)?,
            _ => return Err(invalid_index(pos)),
        }
        Ok(())
    }

    fn custom_encode(&self, out: &mut dyn Write) -> Result<()> {
        write_nullable_int(&id_field().schema, self.id, out)
    }

    fn custom_decode(&mut self, input: &mut ResolvingDecoder<'_>) -> Result<()> {
        let policy = input.union_tag_policy();
        match input.read_field_order_if_diff() {
            None => self.id = read_nullable_int(input, policy)?,
            Some(field_order) => {
                for field in &field_order {
                    match field.pos() {
                        ID_POS => self.id = read_nullable_int(input, policy)?,
                        pos => return Err(corrupt_field_order(pos)),
                    }
                }
            }
        }
        Ok(())
    }
}

impl From<Option<i32>> for Key {
    fn from(id: Option<i32>) -> Self {
        Key { id }
    }
}

/// Builder for [`Key`] that tracks, per field, whether a value was assigned.
#[derive(Debug, Clone)]
pub struct KeyBuilder {
    base: RecordBuilderBase,
    id: Option<i32>,
}

impl KeyBuilder {
    fn new() -> KeyBuilder {
        KeyBuilder {
            base: RecordBuilderBase::new(key_record_schema()),
            id: None,
        }
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    /// Assigns the id. Marks the field as set, also for `None`.
    pub fn set_id(&mut self, value: Option<i32>) -> Result<&mut Self> {
        self.base.validate(id_field(), &nullable_int_value(value))?;
        self.base.mark_set(ID_POS, true)?;
        self.id = value;
        Ok(self)
    }

    /// Checks whether the id has been assigned.
    pub fn has_id(&self) -> bool {
        self.base.is_set(ID_POS)
    }

    /// Clears the id and its set-flag.
    pub fn clear_id(&mut self) -> Result<&mut Self> {
        self.base.mark_set(ID_POS, false)?;
        self.id = None;
        Ok(self)
    }

    /// Finishes the key. An id that was never assigned takes the schema
    /// default.
    pub fn build(&self) -> Result<Key> {
        let id = self
            .base
            .value_or_default(ID_POS, nullable_int_value(self.id))?;
        Ok(Key {
            id: nullable_int_from_value(id)?,
        })
    }
}

impl Default for KeyBuilder {
    fn default() -> Self {
        KeyBuilder::new()
    }
}

impl From<&Key> for KeyBuilder {
    fn from(other: &Key) -> Self {
        let mut builder = KeyBuilder::new();
        if RecordBuilderBase::is_valid_value(id_field(), &nullable_int_value(other.id))
            && builder.base.mark_set(ID_POS, true).is_ok()
        {
            builder.id = other.id;
        }
        builder
    }
}
