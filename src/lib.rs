//! Pluggable type conversions for schema-driven binary codecs
//!
//! # Overview
//!
//! This library sits at the boundary of a schema-driven binary serialization
//! engine (Avro-style: every slot has a base type such as `int` or `fixed`,
//! optionally refined by a logical type such as `decimal`). It lets
//! application code register conversion functions that run just before a
//! value is written to the wire, and just after a value is read off it.
//!
//! The serialization engine itself is not part of this crate. What is
//! provided is the registration/lookup machinery an engine calls into:
//!
//!   * [`EncoderTypeConverter`], keyed by the runtime type of the in-memory
//!     value *and* the composite type of the destination slot;
//!   * [`DecoderTypeConverter`], keyed by the composite type of the source
//!     slot alone;
//!   * [`compose`] / [`specific_type`], which fold a base type and a logical
//!     type into the composite tag both registries are keyed by;
//!   * [`Config`] and the process-wide [`DEFAULT_CONFIG`], with free
//!     functions such as [`register_encoder_type_conversion`] forwarding to
//!     the latter.
//!
//! Values cross the registry boundary as [`Value`], an owned type-erased box
//! that records the [`TypeToken`] of its payload when it is created.
//! Registries never inspect what a conversion function returns; a value of
//! the wrong shape surfaces later as the codec's own error.
//!
//! # Concurrency
//!
//! Registration and lookup take `&self` and are safe from any number of
//! threads without external locking. Each registration is an atomic upsert of
//! one key, and the most recent registration on a key wins. There is no
//! multi-key atomicity and no unregister operation.
//!
//! # Example
//!
//! ```
//! use tedium_conv::{register_encoder_type_conversion, default_config, TypeTag, Value};
//!
//! register_encoder_type_conversion(&0f64, TypeTag::INT, |v: Value| {
//!     Ok(Value::new(v.take::<f64>()? as i32))
//! });
//!
//! let out = default_config().convert_encoded(Value::new(27.0f64), &TypeTag::INT).unwrap();
//! assert_eq!(out.downcast_ref::<i32>(), Some(&27));
//! ```

pub mod config;
pub mod decimal;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod identity;
pub mod prelude;
pub mod schema;
pub mod tag;
pub mod testing;
pub mod value;

pub use crate::config::{
    default_config, register_decoder_type_conversion, register_encoder_type_conversion,
    register_encoder_type_conversion_for, Config, DEFAULT_CONFIG,
};
pub use crate::decimal::Decimal;
pub use crate::decoder::{DecodeSlot, DecoderTypeConverter, TypedSlot};
pub use crate::encoder::{ConversionFn, EncoderTypeConverter};
pub use crate::error::{ConversionError, ConversionResult, DecimalError};
pub use crate::identity::{identity, TypeToken};
pub use crate::schema::{Schema, SchemaNode};
pub use crate::tag::{compose, specific_type, LogicalType, TypeTag};
pub use crate::value::Value;
