use apache_avro::{
    schema::{RecordField, RecordSchema},
    types::Value,
};
use catalog_common::{Result, error::Error};

use crate::record::invalid_index;

/// Bookkeeping shared by generated record builders: the record schema and a
/// flag per field telling whether the field was explicitly assigned.
///
/// The flag is tracked independently of the value, so an explicit `null`
/// counts as set, and only a clear resets it.
#[derive(Debug, Clone)]
pub struct RecordBuilderBase {
    schema: &'static RecordSchema,
    field_set_flags: Vec<bool>,
}

impl RecordBuilderBase {
    pub fn new(schema: &'static RecordSchema) -> RecordBuilderBase {
        RecordBuilderBase {
            schema,
            field_set_flags: vec![false; schema.fields.len()],
        }
    }

    pub fn fields(&self) -> &'static [RecordField] {
        &self.schema.fields
    }

    pub fn is_set(&self, pos: usize) -> bool {
        self.field_set_flags.get(pos).copied().unwrap_or(false)
    }

    /// Sets or clears the set-flag of the field at `pos`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a position outside of the record.
    pub fn mark_set(&mut self, pos: usize, set: bool) -> Result<()> {
        let flag = self
            .field_set_flags
            .get_mut(pos)
            .ok_or_else(|| invalid_index(pos))?;
        *flag = set;
        Ok(())
    }

    /// Checks that `value` may be assigned to `field`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a null value on a non-nullable field or a
    /// value of the wrong type.
    pub fn validate(&self, field: &RecordField, value: &Value) -> Result<()> {
        if !Self::is_valid_value(field, value) {
            return Err(Error::invalid_arg(
                &field.name,
                "non-nullable field cannot be set to null",
            ));
        }
        if !value.validate(&field.schema) {
            return Err(Error::invalid_arg(
                &field.name,
                format!("{value:?} does not match the field schema"),
            ));
        }
        Ok(())
    }

    /// Returns `true` if `value` can be copied into a builder for `field`,
    /// i.e. it is non-null or the field accepts null.
    pub fn is_valid_value(field: &RecordField, value: &Value) -> bool {
        !is_null(value) || field.is_nullable()
    }

    /// Returns the schema default of `field`.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` if the field declares no default.
    pub fn default_value(&self, field: &RecordField) -> Result<Value> {
        let default = field
            .default
            .as_ref()
            .ok_or_else(|| Error::missing_field(&field.name))?;
        Value::from(default.clone())
            .resolve(&field.schema)
            .map_err(|e| Error::avro(format!("default of '{}'", field.name), e))
    }

    /// Returns the value to store in a finished record for the field at
    /// `pos`: `value` when the field was set, the schema default otherwise.
    pub fn value_or_default(&self, pos: usize, value: Value) -> Result<Value> {
        if self.is_set(pos) {
            Ok(value)
        } else {
            let field = self.fields().get(pos).ok_or_else(|| invalid_index(pos))?;
            self.default_value(field)
        }
    }
}

fn is_null(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Union(_, inner) => is_null(inner),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use apache_avro::Schema;
    use catalog_common::error::ErrorKind;

    use super::*;
    use crate::record::record_schema;

    static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
        Schema::parse_str(
            r#"{"type":"record","name":"Course","fields":[
                {"name":"id","type":["null","int"],"default":null},
                {"name":"seats","type":"int"},
                {"name":"rev","type":"long","default":3}
            ]}"#,
        )
        .unwrap()
    });

    fn base() -> RecordBuilderBase {
        RecordBuilderBase::new(record_schema(&SCHEMA).unwrap())
    }

    fn null() -> Value {
        Value::Union(0, Box::new(Value::Null))
    }

    #[test]
    fn test_flags_start_unset() {
        let base = base();
        assert!((0..3).all(|pos| !base.is_set(pos)));
        assert!(!base.is_set(7));
        assert_eq!(base.fields()[2].name, "rev");
    }

    #[test]
    fn test_mark_set_out_of_range() {
        let mut base = base();
        let err = base.mark_set(3, true).unwrap_err();
        assert!(
            matches!(err.kind(), ErrorKind::InvalidArgument { message, .. } if message == "Invalid index: 3")
        );
        assert!(!base.is_set(3));
        assert!(base.value_or_default(3, Value::Null).is_err());
    }

    #[test]
    fn test_defaults() {
        let base = base();
        assert_eq!(base.value_or_default(0, Value::Int(9)).unwrap(), null());
        assert_eq!(base.value_or_default(2, Value::Long(0)).unwrap(), Value::Long(3));

        let err = base.value_or_default(1, Value::Int(0)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MissingField { field } if field == "seats"));
    }

    #[test]
    fn test_set_value_wins() {
        let mut base = base();
        base.mark_set(1, true).unwrap();
        assert_eq!(base.value_or_default(1, Value::Int(30)).unwrap(), Value::Int(30));
        base.mark_set(1, false).unwrap();
        assert!(base.value_or_default(1, Value::Int(30)).is_err());
    }

    #[test]
    fn test_validate() {
        let base = base();
        let fields = base.fields();
        assert!(base.validate(&fields[0], &null()).is_ok());
        assert!(base.validate(&fields[0], &Value::Union(1, Box::new(Value::Int(1)))).is_ok());
        assert!(base.validate(&fields[1], &Value::Null).is_err());
        assert!(base.validate(&fields[1], &Value::Long(1)).is_err());

        assert!(RecordBuilderBase::is_valid_value(&fields[0], &null()));
        assert!(!RecordBuilderBase::is_valid_value(&fields[1], &Value::Null));
    }
}
