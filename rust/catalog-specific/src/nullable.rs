//! Codec for optional `int` fields declared as `["null", "int"]`.
//!
//! Absence is written as union index 0 with an empty payload; presence as
//! union index 1 followed by the zig-zag varint of the value.

use std::io::{Read, Write};

use apache_avro::{Schema, from_avro_datum, to_avro_datum, types::Value};
use catalog_common::{Result, error::Error};

use crate::options::UnionTagPolicy;

const NULL_BRANCH: u32 = 0;
const INT_BRANCH: u32 = 1;

/// The generic union value of an optional `int`.
pub fn nullable_int_value(value: Option<i32>) -> Value {
    match value {
        None => Value::Union(NULL_BRANCH, Box::new(Value::Null)),
        Some(v) => Value::Union(INT_BRANCH, Box::new(Value::Int(v))),
    }
}

/// Extracts an optional `int` from a generic value, union-wrapped or bare.
///
/// # Errors
///
/// Returns `InvalidArgument` for anything but `null` or an `int`.
pub fn nullable_int_from_value(value: Value) -> Result<Option<i32>> {
    match value {
        Value::Union(_, inner) => nullable_int_from_value(*inner),
        Value::Null => Ok(None),
        Value::Int(v) => Ok(Some(v)),
        other => Err(Error::invalid_arg(
            "value",
            format!("{other:?} is neither null nor an int"),
        )),
    }
}

/// Writes `value` as a datum of `union_schema`, which must be `["null","int"]`.
pub fn write_nullable_int(
    union_schema: &Schema,
    value: Option<i32>,
    out: &mut dyn Write,
) -> Result<()> {
    let bytes = to_avro_datum(union_schema, nullable_int_value(value))
        .map_err(|e| Error::avro("optional int", e))?;
    out.write_all(&bytes).map_err(|e| Error::io("optional int", e))
}

/// Reads an optional `int`.
///
/// Index 1 is the only "present" indicator. Under
/// [`UnionTagPolicy::Permissive`] every other index reads as null; under
/// [`UnionTagPolicy::Strict`] indexes other than 0 and 1 fail with
/// `CorruptStream`.
pub fn read_nullable_int<R: Read>(input: &mut R, policy: UnionTagPolicy) -> Result<Option<i32>> {
    let index = match read_primitive(&Schema::Long, input, "union index")? {
        Value::Long(index) => index,
        other => return Err(unexpected_value("union index", &other)),
    };
    if index == i64::from(INT_BRANCH) {
        return match read_primitive(&Schema::Int, input, "int")? {
            Value::Int(v) => Ok(Some(v)),
            other => Err(unexpected_value("int", &other)),
        };
    }
    if index != i64::from(NULL_BRANCH) {
        match policy {
            UnionTagPolicy::Permissive => {
                log::trace!("union index {index} read as null");
            }
            UnionTagPolicy::Strict => {
                return Err(Error::corrupt_stream(format!(
                    "union index {index} out of range for [\"null\",\"int\"]"
                )));
            }
        }
    }
    Ok(None)
}

fn read_primitive<R: Read>(schema: &Schema, input: &mut R, context: &str) -> Result<Value> {
    from_avro_datum(schema, input, None).map_err(|e| Error::avro(context, e))
}

#[cold]
fn unexpected_value(context: &str, value: &Value) -> Error {
    Error::corrupt_stream(format!("{context} decoded as {value:?}"))
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use catalog_common::error::ErrorKind;

    use super::*;

    static UNION: LazyLock<Schema> =
        LazyLock::new(|| Schema::parse_str(r#"["null","int"]"#).unwrap());

    fn encode(value: Option<i32>) -> Vec<u8> {
        let mut out = Vec::new();
        write_nullable_int(&UNION, value, &mut out).unwrap();
        out
    }

    fn decode(bytes: &[u8], policy: UnionTagPolicy) -> Result<Option<i32>> {
        read_nullable_int(&mut &bytes[..], policy)
    }

    #[test]
    fn test_absent_is_single_tag_byte() {
        assert_eq!(encode(None), [0x00]);
    }

    #[test]
    fn test_present_is_tag_and_varint() {
        assert_eq!(encode(Some(42)), [0x02, 0x54]);
        assert_eq!(encode(Some(0)), [0x02, 0x00]);
        assert_eq!(encode(Some(-1)), [0x02, 0x01]);
        assert_eq!(
            encode(Some(i32::MIN)),
            [0x02, 0xff, 0xff, 0xff, 0xff, 0x0f]
        );
    }

    #[test]
    fn test_decode() {
        for value in [None, Some(0), Some(-1), Some(i32::MIN), Some(i32::MAX)] {
            assert_eq!(
                decode(&encode(value), UnionTagPolicy::default()).unwrap(),
                value
            );
        }
    }

    #[test]
    fn test_unknown_tag_policy() {
        // Zig-zag 2, a union index past the declared branches.
        let bytes = [0x04];
        assert_eq!(decode(&bytes, UnionTagPolicy::Permissive).unwrap(), None);
        let err = decode(&bytes, UnionTagPolicy::Strict).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::CorruptStream { .. }));

        // A negative index takes the same path.
        assert_eq!(decode(&[0x01], UnionTagPolicy::Permissive).unwrap(), None);
        assert!(decode(&[0x01], UnionTagPolicy::Strict).is_err());
    }

    #[test]
    fn test_permissive_null_consumes_only_the_tag() {
        let mut input = &[0x04, 0x02, 0x54][..];
        assert_eq!(
            read_nullable_int(&mut input, UnionTagPolicy::Permissive).unwrap(),
            None
        );
        assert_eq!(input, [0x02, 0x54]);
    }

    #[test]
    fn test_truncated_value() {
        let err = decode(&[0x02], UnionTagPolicy::default()).unwrap_err();
        assert!(err.is_unexpected_eof());
        assert!(decode(&[], UnionTagPolicy::default()).unwrap_err().is_unexpected_eof());
    }

    #[test]
    fn test_int_out_of_range() {
        // Union index 1, then the zig-zag varint of 2^31.
        let err = decode(&[0x02, 0x80, 0x80, 0x80, 0x80, 0x10], UnionTagPolicy::default())
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Avro { .. }));
    }

    #[test]
    fn test_wrong_schema_is_rejected() {
        let long = Schema::parse_str(r#""long""#).unwrap();
        let err = write_nullable_int(&long, Some(1), &mut Vec::new()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Avro { .. }));
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(
            nullable_int_from_value(nullable_int_value(Some(3))).unwrap(),
            Some(3)
        );
        assert_eq!(nullable_int_from_value(Value::Null).unwrap(), None);
        assert_eq!(nullable_int_from_value(Value::Int(-2)).unwrap(), Some(-2));
        let err = nullable_int_from_value(Value::Long(1)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
    }
}
