//! Conversions applied just before a value is encoded
//!
//! An [`EncoderTypeConverter`] maps a pair of (payload type, destination
//! composite type) to a user-provided [`ConversionFn`]. Keying on both halves
//! lets two native shapes convert differently into the same wire type (an
//! `f32` and an `f64` both into `"int"`), and one native shape convert
//! differently depending on the wire type the schema demands (a `String` into
//! `"fixed.decimal"` versus into a plain `"string"`).
//!
//! Registration is opt-in: a value with no matching conversion is passed
//! through untouched, and that is not an error.
//!
//! ```
//! # use tedium_conv::{EncoderTypeConverter, TypeTag, Value, ConversionError};
//! let conv = EncoderTypeConverter::new();
//! conv.register(&0f32, TypeTag::INT, |v: Value| {
//!     let f = v.take::<f32>()?;
//!     if f.fract() != 0.0 {
//!         return Err(ConversionError::msg(format_args!("{f} is not an integer")));
//!     }
//!     Ok(Value::new(f as i32))
//! });
//!
//! let out = conv.convert(Value::new(27.0f32), &TypeTag::INT).unwrap();
//! assert_eq!(out.downcast_ref::<i32>(), Some(&27));
//! assert!(conv.convert(Value::new(27.1f32), &TypeTag::INT).is_err());
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use dashmap::DashMap;

use crate::error::ConversionResult;
use crate::identity::{identity, TypeToken};
use crate::schema::Schema;
use crate::tag::TypeTag;
use crate::value::Value;

/// Shared handle to a user-provided conversion function
///
/// The function's input and output types are erased; it is the function's own
/// responsibility to check that it was handed something it understands (see
/// [`Value::take`]) and to produce something the codec can write.
pub type ConversionFn = Arc<dyn Fn(Value) -> ConversionResult<Value> + Send + Sync>;

/// Conversions for one payload type, by destination composite type
type Destinations = HashMap<TypeTag, ConversionFn>;

/// Registry of conversions applied on the encode path
///
/// All methods take `&self` and may be called concurrently from any number of
/// threads. Each registration is a single atomic upsert; a `convert` racing a
/// `register` on the same key observes either the old or the new function.
///
/// Entries are grouped by payload type first, so a lookup hashes the
/// destination tag as a borrowed `str` and never clones it.
#[derive(Default)]
pub struct EncoderTypeConverter {
    fns: DashMap<TypeToken, Destinations>,
}

impl EncoderTypeConverter {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `f` for values of the same type as `sample`, bound for
    /// schema slots whose composite type is `to`.
    ///
    /// Only the type of `sample` matters. Any conversion previously registered
    /// for the same pair is replaced.
    pub fn register<T, F>(&self, sample: &T, to: impl Into<TypeTag>, f: F)
    where
        T: Any + Send + Sync,
        F: Fn(Value) -> ConversionResult<Value> + Send + Sync + 'static,
    {
        self.register_token(TypeToken::of_val(sample), to, Arc::new(f));
    }

    /// Registers `f` for values of type `T` bound for `to`, without a sample value.
    pub fn register_for<T, F>(&self, to: impl Into<TypeTag>, f: F)
    where
        T: Any + Send + Sync,
        F: Fn(Value) -> ConversionResult<Value> + Send + Sync + 'static,
    {
        self.register_token(TypeToken::of::<T>(), to, Arc::new(f));
    }

    /// Registers an already-shared conversion function under an explicit token.
    pub fn register_token(&self, from: TypeToken, to: impl Into<TypeTag>, f: ConversionFn) {
        let _ = self.replace(from, to.into(), f);
    }

    pub(crate) fn replace(&self, from: TypeToken, to: TypeTag, f: ConversionFn) -> Option<ConversionFn> {
        let mut dests = self.fns.entry(from).or_default();
        let prev = dests.insert(to.clone(), f);
        if prev.is_some() {
            tracing::trace!(from = %from, to = %to, "replaced encoder type conversion");
        }
        prev
    }

    pub(crate) fn remove(&self, from: TypeToken, to: &TypeTag) -> Option<ConversionFn> {
        let prev = self.fns.get_mut(&from)?.remove(to.as_str());
        self.fns.remove_if(&from, |_, dests| dests.is_empty());
        prev
    }

    /// Returns the conversion registered for `(from, to)`, if any.
    ///
    /// The handle is cloned out of the map, so invoking it holds no lock on
    /// the registry.
    #[must_use]
    pub fn lookup(&self, from: TypeToken, to: &TypeTag) -> Option<ConversionFn> {
        self.fns.get(&from)?.get(to.as_str()).map(Arc::clone)
    }

    /// Runs the conversion registered for `value` and the composite type of
    /// `schema`, if any.
    ///
    /// Without a matching registration, `value` is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns whatever error the conversion function returns, as-is. No check
    /// is made on the type of a successful result; a value the codec cannot
    /// write surfaces as the codec's own error.
    pub fn convert<S: Schema + ?Sized>(&self, value: Value, schema: &S) -> ConversionResult<Value> {
        match self.lookup(identity(&value), &schema.specific_type()) {
            Some(f) => f(value),
            None => Ok(value),
        }
    }

    /// Returns `true` if a conversion is registered for `(from, to)`.
    #[must_use]
    pub fn contains(&self, from: TypeToken, to: &TypeTag) -> bool {
        self.fns
            .get(&from)
            .map_or(false, |dests| dests.contains_key(to.as_str()))
    }

    /// Returns the number of registered conversions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fns.iter().map(|dests| dests.len()).sum()
    }

    /// Returns `true` if no conversion is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fns.iter().all(|dests| dests.is_empty())
    }
}

impl Debug for EncoderTypeConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncoderTypeConverter")
            .field("len", &self.len())
            .finish()
    }
}
