use std::io::Write;

use apache_avro::{
    Schema,
    schema::{RecordSchema, SchemaKind},
    types::Value,
};
use catalog_common::{Result, error::Error};

use crate::resolving::ResolvingDecoder;

/// A concrete record type generated from a fixed record schema.
///
/// Implementors encode and decode themselves directly (`custom_encode` /
/// `custom_decode`) and expose positional field access for generic tooling.
pub trait SpecificRecord: Default {
    /// The schema the record type was generated from.
    fn class_schema() -> &'static Schema;

    /// Returns the value of the field at `pos`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a position outside of the record.
    fn get(&self, pos: usize) -> Result<Value>;

    /// Assigns the field at `pos`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a position outside of the record or a value
    /// of the wrong type.
    fn put(&mut self, pos: usize, value: Value) -> Result<()>;

    /// Writes the record body.
    fn custom_encode(&self, out: &mut dyn Write) -> Result<()>;

    /// Reads the record body, honoring the decoder's field-reordering
    /// directive when present.
    fn custom_decode(&mut self, input: &mut ResolvingDecoder<'_>) -> Result<()>;

    /// The record as a generic value, fields in schema order.
    fn to_value(&self) -> Result<Value> {
        let fields = record_schema(Self::class_schema())?
            .fields
            .iter()
            .map(|field| Ok((field.name.clone(), self.get(field.position)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Record(fields))
    }
}

/// Returns the record definition inside `schema`.
///
/// # Errors
///
/// Returns `SchemaMismatch` for any other kind of schema.
pub fn record_schema(schema: &Schema) -> Result<&RecordSchema> {
    match schema {
        Schema::Record(record) => Ok(record),
        other => Err(Error::schema_mismatch(format!(
            "expected a record schema, found {:?}",
            SchemaKind::from(other)
        ))),
    }
}

/// Error for a positional access outside of the record's fields.
#[cold]
pub fn invalid_index(pos: usize) -> Error {
    Error::invalid_arg("field", format!("Invalid index: {pos}"))
}

/// Error for a field-reordering directive naming a position the record does
/// not have.
#[cold]
pub fn corrupt_field_order(pos: usize) -> Error {
    log::debug!("field-reordering directive references unknown position {pos}");
    Error::corrupt_stream("Corrupt ResolvingDecoder.")
}
