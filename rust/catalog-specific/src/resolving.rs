//! Reconciliation of a writer's record layout with the reader's.
//!
//! Data written with the reader's own schema is read straight from the stream.
//! Data written with another schema of the same record is decoded with the
//! writer schema, resolved against the reader schema by the Avro schema
//! resolution rules (defaults for missing fields, writer-only fields dropped,
//! numeric promotion) and handed to the record in the reader's layout.
//!
//! A decoder may also carry a field-reordering directive: the reader positions
//! in the order their data appears in the stream.

use std::io::{Cursor, Read};

use apache_avro::{Schema, from_avro_datum, to_avro_datum};
use catalog_common::{Result, error::Error};

use crate::{
    options::{DecodeOptions, UnionTagPolicy},
    record::record_schema,
};

/// One entry of a field-reordering directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pos: usize,
    name: String,
}

impl ResolvedField {
    pub fn new(pos: usize, name: impl Into<String>) -> ResolvedField {
        ResolvedField {
            pos,
            name: name.into(),
        }
    }

    /// Position of the field in the reader's record.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

enum Input<'a> {
    Stream(&'a mut dyn Read),
    /// A body already resolved into the reader's layout.
    Resolved(Cursor<Vec<u8>>),
}

/// A record body reader that carries the resolution between the writer's and
/// the reader's record schema.
pub struct ResolvingDecoder<'a> {
    input: Input<'a>,
    field_order: Option<Vec<ResolvedField>>,
    options: DecodeOptions,
}

impl<'a> ResolvingDecoder<'a> {
    /// Creates a decoder for data written with the reader's own schema.
    pub fn new(input: &'a mut dyn Read, options: DecodeOptions) -> Self {
        ResolvingDecoder {
            input: Input::Stream(input),
            field_order: None,
            options,
        }
    }

    /// Creates a decoder with an explicit field-reordering directive.
    pub fn with_field_order(
        input: &'a mut dyn Read,
        field_order: Vec<ResolvedField>,
        options: DecodeOptions,
    ) -> Self {
        ResolvingDecoder {
            input: Input::Stream(input),
            field_order: Some(field_order),
            options,
        }
    }

    /// Creates a decoder for one record body written with `writer`, to be read
    /// as `reader`. The writer's body is consumed from `input` right away.
    ///
    /// # Errors
    ///
    /// Returns `SchemaMismatch` when the schemas are not records with the same
    /// name or when the writer's data cannot be resolved to the reader schema,
    /// and an Avro error when the body does not decode with `writer`.
    pub fn resolve(
        mut input: &'a mut dyn Read,
        writer: &Schema,
        reader: &Schema,
        options: DecodeOptions,
    ) -> Result<Self> {
        let w = record_schema(writer)?;
        let r = record_schema(reader)?;
        if w.name.name != r.name.name {
            return Err(Error::schema_mismatch(format!(
                "writer record {} does not match reader record {}",
                w.name, r.name
            )));
        }

        let datum = from_avro_datum(writer, &mut input, None)
            .map_err(|e| Error::avro("writer datum", e))?;
        let resolved = datum
            .resolve(reader)
            .map_err(|e| Error::schema_mismatch(e.to_string()))?;
        let body = to_avro_datum(reader, resolved).map_err(|e| Error::avro("resolved datum", e))?;
        log::debug!(
            "resolved {} body from {} writer fields to {} reader fields",
            r.name,
            w.fields.len(),
            r.fields.len()
        );

        Ok(ResolvingDecoder {
            input: Input::Resolved(Cursor::new(body)),
            field_order: None,
            options,
        })
    }

    /// Returns the field-reordering directive, if the stream's layout differs
    /// from the reader's. The directive is handed out once per record.
    pub fn read_field_order_if_diff(&mut self) -> Option<Vec<ResolvedField>> {
        self.field_order.take()
    }

    pub fn union_tag_policy(&self) -> UnionTagPolicy {
        self.options.union_tags
    }
}

impl Read for ResolvingDecoder<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.input {
            Input::Stream(input) => input.read(buf),
            Input::Resolved(body) => body.read(buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use catalog_common::error::ErrorKind;

    use super::*;

    fn schema(text: &str) -> Schema {
        Schema::parse_str(text).unwrap()
    }

    const READER: &str = r#"{"type":"record","name":"Key","fields":[{"name":"id","type":["null","int"],"default":null},{"name":"rev","type":"long","default":7}]}"#;

    fn resolved_body(writer: &str, mut body: &[u8]) -> Result<Vec<u8>> {
        let mut dec = ResolvingDecoder::resolve(
            &mut body,
            &schema(writer),
            &schema(READER),
            DecodeOptions::default(),
        )?;
        assert!(dec.read_field_order_if_diff().is_none());
        let mut out = Vec::new();
        dec.read_to_end(&mut out)?;
        Ok(out)
    }

    #[test]
    fn test_own_schema_reads_stream() {
        let mut body = &[0x02, 0x54][..];
        let mut dec = ResolvingDecoder::new(&mut body, DecodeOptions::strict());
        assert!(dec.read_field_order_if_diff().is_none());
        assert_eq!(dec.union_tag_policy(), UnionTagPolicy::Strict);
        let mut out = Vec::new();
        dec.read_to_end(&mut out).unwrap();
        assert_eq!(out, [0x02, 0x54]);
    }

    #[test]
    fn test_directive_is_handed_out_once() {
        let mut body = &[][..];
        let mut dec = ResolvingDecoder::with_field_order(
            &mut body,
            vec![ResolvedField::new(1, "rev"), ResolvedField::new(0, "id")],
            DecodeOptions::default(),
        );
        let order = dec.read_field_order_if_diff().unwrap();
        assert_eq!(order.iter().map(ResolvedField::pos).collect::<Vec<_>>(), [1, 0]);
        assert_eq!(order[0].name(), "rev");
        assert!(dec.read_field_order_if_diff().is_none());
    }

    #[test]
    fn test_permuted_fields_arrive_in_reader_order() {
        let writer = r#"{"type":"record","name":"Key","fields":[{"name":"rev","type":"long"},{"name":"id","type":["null","int"]}]}"#;
        assert_eq!(
            resolved_body(writer, &[0x04, 0x02, 0x54]).unwrap(),
            [0x02, 0x54, 0x04]
        );
    }

    #[test]
    fn test_missing_writer_field_uses_default() {
        let writer = r#"{"type":"record","name":"Key","fields":[{"name":"id","type":["null","int"]}]}"#;
        assert_eq!(resolved_body(writer, &[0x00]).unwrap(), [0x00, 0x0e]);
    }

    #[test]
    fn test_writer_only_field_is_dropped() {
        let writer = r#"{"type":"record","name":"Key","fields":[{"name":"extra","type":"int"},{"name":"id","type":["null","int"]},{"name":"rev","type":"long"}]}"#;
        assert_eq!(
            resolved_body(writer, &[0x02, 0x02, 0x54, 0x06]).unwrap(),
            [0x02, 0x54, 0x06]
        );
    }

    #[test]
    fn test_unresolvable_schemas() {
        let cases: [(&str, &[u8]); 3] = [
            (r#"{"type":"record","name":"Other","fields":[]}"#, &[]),
            (
                r#"{"type":"record","name":"Key","fields":[{"name":"id","type":["null","string"]}]}"#,
                &[0x02, 0x02, 0x78],
            ),
            (r#""int""#, &[0x02]),
        ];
        for (writer, body) in cases {
            let err = resolved_body(writer, body).unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::SchemaMismatch { .. }), "{writer}");
        }
    }

    #[test]
    fn test_reader_field_without_default() {
        let reader = schema(r#"{"type":"record","name":"Key","fields":[{"name":"id","type":"int"}]}"#);
        let writer = schema(r#"{"type":"record","name":"Key","fields":[]}"#);
        let mut body = &[][..];
        let err = ResolvingDecoder::resolve(&mut body, &writer, &reader, DecodeOptions::default())
            .err()
            .unwrap();
        assert!(matches!(err.kind(), ErrorKind::SchemaMismatch { .. }));
    }

    #[test]
    fn test_truncated_writer_body() {
        let writer = r#"{"type":"record","name":"Key","fields":[{"name":"id","type":["null","int"]},{"name":"rev","type":"long"}]}"#;
        let err = resolved_body(writer, &[0x02]).unwrap_err();
        assert!(err.is_unexpected_eof());
    }
}
