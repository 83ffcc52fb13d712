//! Scoped registrations for tests
//!
//! Registries have no unregister operation, so tests that install
//! conversions into a shared registry (most often [`DEFAULT_CONFIG`]) need
//! their own bookkeeping to avoid leaking into other tests. The guards here
//! install a conversion and, when dropped, put back whatever was registered
//! under the same key before, or remove the key if nothing was.
//!
//! Code under test that registers on its own, for instance through the free
//! functions in [`crate::config`], can be wrapped in a guard obtained with
//! `track`, which only remembers the key's current state.
//!
//! Guards restore per key only. Tests that race on the same key of a shared
//! registry still need to be serialized by the caller.
//!
//! [`DEFAULT_CONFIG`]: crate::config::DEFAULT_CONFIG

use std::any::Any;
use std::sync::Arc;

use crate::decoder::DecoderTypeConverter;
use crate::encoder::{ConversionFn, EncoderTypeConverter};
use crate::error::ConversionResult;
use crate::identity::TypeToken;
use crate::tag::TypeTag;
use crate::value::Value;

/// Encode-side registration undone on drop
#[must_use = "the conversion is unregistered as soon as the guard is dropped"]
pub struct EncoderConversionGuard<'a> {
    registry: &'a EncoderTypeConverter,
    from: TypeToken,
    to: TypeTag,
    prev: Option<ConversionFn>,
}

impl<'a> EncoderConversionGuard<'a> {
    /// Registers `f` for values of type `T` bound for `to` in `registry`.
    pub fn register<T, F>(registry: &'a EncoderTypeConverter, to: impl Into<TypeTag>, f: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(Value) -> ConversionResult<Value> + Send + Sync + 'static,
    {
        let from = TypeToken::of::<T>();
        let to = to.into();
        let prev = registry.replace(from, to.clone(), Arc::new(f));
        Self { registry, from, to, prev }
    }

    /// Remembers what is registered for values of type `T` bound for `to`,
    /// without registering anything; whatever is registered under that key
    /// in the meantime is undone on drop.
    pub fn track<T: Any + Send + Sync>(registry: &'a EncoderTypeConverter, to: impl Into<TypeTag>) -> Self {
        let from = TypeToken::of::<T>();
        let to = to.into();
        let prev = registry.lookup(from, &to);
        Self { registry, from, to, prev }
    }
}

impl Drop for EncoderConversionGuard<'_> {
    fn drop(&mut self) {
        match self.prev.take() {
            Some(f) => {
                let _ = self.registry.replace(self.from, self.to.clone(), f);
            }
            None => {
                let _ = self.registry.remove(self.from, &self.to);
            }
        }
    }
}

/// Decode-side registration undone on drop
#[must_use = "the conversion is unregistered as soon as the guard is dropped"]
pub struct DecoderConversionGuard<'a> {
    registry: &'a DecoderTypeConverter,
    from: TypeTag,
    prev: Option<ConversionFn>,
}

impl<'a> DecoderConversionGuard<'a> {
    /// Registers `f` for values decoded from `from` in `registry`.
    pub fn register<F>(registry: &'a DecoderTypeConverter, from: impl Into<TypeTag>, f: F) -> Self
    where
        F: Fn(Value) -> ConversionResult<Value> + Send + Sync + 'static,
    {
        let from = from.into();
        let prev = registry.replace(from.clone(), Arc::new(f));
        Self { registry, from, prev }
    }

    /// Remembers what is registered for `from` without registering anything.
    pub fn track(registry: &'a DecoderTypeConverter, from: impl Into<TypeTag>) -> Self {
        let from = from.into();
        let prev = registry.lookup(&from);
        Self { registry, from, prev }
    }
}

impl Drop for DecoderConversionGuard<'_> {
    fn drop(&mut self) {
        match self.prev.take() {
            Some(f) => {
                let _ = self.registry.replace(self.from.clone(), f);
            }
            None => {
                let _ = self.registry.remove(&self.from);
            }
        }
    }
}
