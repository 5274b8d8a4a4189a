//! # Course catalog wire contract
//!
//! Record types exchanged by the course catalog services, together with the
//! binary codec they are written with. Schemas, datum encoding and schema
//! resolution come from the `apache-avro` crate.
//!
//! ## Records
//!
//! * [`Key`] - the message key of the course catalog topics: a single optional
//!   `int` id, schema `inc.evil.coursecatalog.Key`.
//!
//! ## Wire forms
//!
//! * Plain body ([`Key::write_to`] / [`Key::read_from`]): union tag varint
//!   followed by the zig-zag varint of the id when present.
//! * Single-object message ([`Key::to_byte_buffer`] / [`Key::from_byte_buffer`]):
//!   `C3 01`, the 8-byte little-endian schema fingerprint, then the body.
//!
//! ## Module Organization
//!
//! * [`avro`] - the Avro library: schemas, generic values, datum codecs
//! * [`common`] - error type and result alias
//! * [`specific`] - record trait, builder bookkeeping, schema stores, the
//!   resolving decoder and message framing

pub mod key;

pub use key::{Key, KeyBuilder};

pub use apache_avro as avro;
pub use catalog_common as common;
pub use catalog_specific as specific;
