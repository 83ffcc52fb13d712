//! Conversion configuration and the process-wide default
//!
//! A [`Config`] pairs one [`EncoderTypeConverter`] with one
//! [`DecoderTypeConverter`], and is what an encoder or decoder instance is
//! expected to hold on to. Most programs want a single set of conversions
//! shared by every codec they create, which is what [`DEFAULT_CONFIG`] and
//! the free functions in this module provide.
//!
//! `DEFAULT_CONFIG` is created lazily on first use (using the `lazy_static`
//! crate) and lives until the process exits. Conversions cannot be
//! unregistered from it. Code that needs isolation, such as tests that would
//! otherwise leak registrations into each other, should build its own
//! `Config` and wire it explicitly, or restore prior state with the guards
//! in [`crate::testing`].

use std::any::Any;
use std::sync::Arc;

use crate::decoder::{DecodeSlot, DecoderTypeConverter};
use crate::encoder::EncoderTypeConverter;
use crate::error::ConversionResult;
use crate::schema::Schema;
use crate::tag::TypeTag;
use crate::value::Value;

/// Encode-side and decode-side conversion registries used together
#[derive(Debug, Clone, Default)]
pub struct Config {
    encoder: Arc<EncoderTypeConverter>,
    decoder: Arc<DecoderTypeConverter>,
}

impl Config {
    /// Creates a configuration with empty registries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration over existing registries, which may be shared
    /// with other configurations.
    #[must_use]
    pub fn with_converters(
        encoder: Arc<EncoderTypeConverter>,
        decoder: Arc<DecoderTypeConverter>,
    ) -> Self {
        Self { encoder, decoder }
    }

    /// Returns the encode-side registry.
    #[must_use]
    pub fn encoder_type_converter(&self) -> &Arc<EncoderTypeConverter> {
        &self.encoder
    }

    /// Returns the decode-side registry.
    #[must_use]
    pub fn decoder_type_converter(&self) -> &Arc<DecoderTypeConverter> {
        &self.decoder
    }

    /// Registers an encode-side conversion; see [`EncoderTypeConverter::register`].
    pub fn register_encoder_type_conversion<T, F>(&self, sample: &T, to: impl Into<TypeTag>, f: F)
    where
        T: Any + Send + Sync,
        F: Fn(Value) -> ConversionResult<Value> + Send + Sync + 'static,
    {
        self.encoder.register(sample, to, f)
    }

    /// Registers a decode-side conversion; see [`DecoderTypeConverter::register`].
    pub fn register_decoder_type_conversion<F>(&self, from: impl Into<TypeTag>, f: F)
    where
        F: Fn(Value) -> ConversionResult<Value> + Send + Sync + 'static,
    {
        self.decoder.register(from, f)
    }

    /// Applies the encode-side registry; see [`EncoderTypeConverter::convert`].
    pub fn convert_encoded<S: Schema + ?Sized>(&self, value: Value, schema: &S) -> ConversionResult<Value> {
        self.encoder.convert(value, schema)
    }

    /// Applies the decode-side registry; see [`DecoderTypeConverter::convert`].
    pub fn convert_decoded<S, D>(&self, schema: &S, slot: &mut D) -> ConversionResult<()>
    where
        S: Schema + ?Sized,
        D: DecodeSlot + ?Sized,
    {
        self.decoder.convert(schema, slot)
    }
}

lazy_static::lazy_static! {
    /// Process-wide configuration used when a codec is not given one explicitly
    pub static ref DEFAULT_CONFIG: Config = {
        tracing::debug!("initializing default conversion config");
        Config::new()
    };
}

/// Returns the process-wide default configuration.
#[must_use]
pub fn default_config() -> &'static Config {
    &DEFAULT_CONFIG
}

/// Registers an encode-side conversion with the default configuration.
pub fn register_encoder_type_conversion<T, F>(sample: &T, to: impl Into<TypeTag>, f: F)
where
    T: Any + Send + Sync,
    F: Fn(Value) -> ConversionResult<Value> + Send + Sync + 'static,
{
    DEFAULT_CONFIG.register_encoder_type_conversion(sample, to, f)
}

/// Registers an encode-side conversion for values of type `T` with the
/// default configuration, without a sample value.
pub fn register_encoder_type_conversion_for<T, F>(to: impl Into<TypeTag>, f: F)
where
    T: Any + Send + Sync,
    F: Fn(Value) -> ConversionResult<Value> + Send + Sync + 'static,
{
    DEFAULT_CONFIG.encoder.register_for::<T, F>(to, f)
}

/// Registers a decode-side conversion with the default configuration.
pub fn register_decoder_type_conversion<F>(from: impl Into<TypeTag>, f: F)
where
    F: Fn(Value) -> ConversionResult<Value> + Send + Sync + 'static,
{
    DEFAULT_CONFIG.register_decoder_type_conversion(from, f)
}
