//! Conversions applied just after a value is decoded
//!
//! A [`DecoderTypeConverter`] maps the composite type of a schema slot to a
//! [`ConversionFn`]. Unlike the encode side there is no payload-type half to
//! the key: at lookup time the value has only just been decoded into the
//! schema's natural representation, so the schema alone decides.
//!
//! Conversion only applies to *dynamic* decode targets. A pipeline opts a
//! target in by handing the registry something whose [`DecodeSlot::as_dynamic`]
//! returns the cell holding the freshly decoded value; targets that decode
//! straight into a concrete type keep the default `None` and are never
//! touched.

use std::fmt::Debug;
use std::sync::Arc;

use dashmap::DashMap;

use crate::encoder::ConversionFn;
use crate::error::ConversionResult;
use crate::schema::Schema;
use crate::tag::TypeTag;
use crate::value::Value;

/// Capability of a decode target to have its value rewritten after decoding
pub trait DecodeSlot {
    /// Returns the dynamic cell of this slot, or `None` if the slot is bound
    /// to a concrete type and bypasses runtime conversion.
    fn as_dynamic(&mut self) -> Option<&mut Option<Value>> {
        None
    }
}

/// `Option<Value>` is the canonical dynamic slot; `None` stands for an
/// empty or cleared value.
impl DecodeSlot for Option<Value> {
    fn as_dynamic(&mut self) -> Option<&mut Option<Value>> {
        Some(self)
    }
}

impl<D: DecodeSlot + ?Sized> DecodeSlot for &mut D {
    fn as_dynamic(&mut self) -> Option<&mut Option<Value>> {
        (**self).as_dynamic()
    }
}

impl<D: DecodeSlot + ?Sized> DecodeSlot for Box<D> {
    fn as_dynamic(&mut self) -> Option<&mut Option<Value>> {
        (**self).as_dynamic()
    }
}

/// Decode target materialized directly into a `T`
///
/// Never exposes a dynamic cell, so no conversion is ever applied to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct TypedSlot<T>(pub T);

impl<T> TypedSlot<T> {
    /// Destructs a `TypedSlot<T>` and returns its contents
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> DecodeSlot for TypedSlot<T> {}

/// Registry of conversions applied on the decode path
///
/// Shares the concurrency guarantees of
/// [`EncoderTypeConverter`](crate::encoder::EncoderTypeConverter).
#[derive(Default)]
pub struct DecoderTypeConverter {
    fns: DashMap<TypeTag, ConversionFn>,
}

impl DecoderTypeConverter {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `f` for values decoded from schema slots whose composite
    /// type is `from`, replacing any previous registration.
    pub fn register<F>(&self, from: impl Into<TypeTag>, f: F)
    where
        F: Fn(Value) -> ConversionResult<Value> + Send + Sync + 'static,
    {
        self.register_fn(from, Arc::new(f));
    }

    /// Registers an already-shared conversion function.
    pub fn register_fn(&self, from: impl Into<TypeTag>, f: ConversionFn) {
        let _ = self.replace(from.into(), f);
    }

    pub(crate) fn replace(&self, from: TypeTag, f: ConversionFn) -> Option<ConversionFn> {
        let prev = self.fns.insert(from.clone(), f);
        if prev.is_some() {
            tracing::trace!(from = %from, "replaced decoder type conversion");
        }
        prev
    }

    pub(crate) fn remove(&self, from: &TypeTag) -> Option<ConversionFn> {
        self.fns.remove(from.as_str()).map(|(_, f)| f)
    }

    /// Returns the conversion registered for `from`, if any.
    #[must_use]
    pub fn lookup(&self, from: &TypeTag) -> Option<ConversionFn> {
        self.fns.get(from.as_str()).map(|f| Arc::clone(f.value()))
    }

    /// Runs the conversion registered for the composite type of `schema` on
    /// the value held in `slot`.
    ///
    /// This is a no-op when `slot` is not dynamic, when its cell is empty, or
    /// when nothing is registered for the schema's composite type.
    ///
    /// # Errors
    ///
    /// If the conversion function fails, its error is returned as-is and the
    /// slot is left empty; it never holds a partially converted value.
    pub fn convert<S, D>(&self, schema: &S, slot: &mut D) -> ConversionResult<()>
    where
        S: Schema + ?Sized,
        D: DecodeSlot + ?Sized,
    {
        let cell = match slot.as_dynamic() {
            Some(cell) => cell,
            None => return Ok(()),
        };
        let f = match self.lookup(&schema.specific_type()) {
            Some(f) => f,
            None => return Ok(()),
        };
        if let Some(val) = cell.take() {
            *cell = Some(f(val)?);
        }
        Ok(())
    }

    /// Returns `true` if a conversion is registered for `from`.
    #[must_use]
    pub fn contains(&self, from: &TypeTag) -> bool {
        self.fns.contains_key(from.as_str())
    }

    /// Returns the number of registered conversions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fns.len()
    }

    /// Returns `true` if no conversion is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fns.is_empty()
    }
}

impl Debug for DecoderTypeConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderTypeConverter")
            .field("len", &self.fns.len())
            .finish()
    }
}
