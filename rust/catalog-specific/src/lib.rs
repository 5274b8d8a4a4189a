//! Support for concrete record types bound to a fixed Avro schema: the
//! [`SpecificRecord`](record::SpecificRecord) contract, builder bookkeeping,
//! codec helpers for optional fields, fingerprint-keyed schema stores, the
//! resolving decoder, plain datum I/O and the single-object message framing.

pub mod builder;
pub mod datum_io;
pub mod message;
pub mod nullable;
pub mod options;
pub mod record;
pub mod resolving;
pub mod store;

pub use builder::RecordBuilderBase;
pub use datum_io::{DatumReader, read_datum, write_datum};
pub use message::{BinaryMessageDecoder, BinaryMessageEncoder};
pub use options::{DecodeOptions, UnionTagPolicy};
pub use record::SpecificRecord;
pub use resolving::{ResolvedField, ResolvingDecoder};
pub use store::{SchemaCache, SchemaStore, fingerprint64};
