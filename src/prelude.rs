//! Assorted imports for writing and registering conversion functions

pub use crate::config::{
    register_decoder_type_conversion, register_encoder_type_conversion, Config,
};
pub use crate::error::{ConversionError, ConversionResult};
pub use crate::schema::Schema;
pub use crate::tag::{specific_type, LogicalType, TypeTag};
pub use crate::value::Value;
