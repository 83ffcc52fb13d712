//! Opaque values passed through conversion functions
//!
//! The registries in this crate never know what a conversion function
//! consumes or produces. Values are exchanged as [`Value`], an owned,
//! thread-safe box around any `'static` payload that remembers the
//! [`TypeToken`] of that payload from the moment it was boxed.
//!
//! Conversion functions recover the concrete payload with [`Value::take`]
//! (which turns a mismatch into a [`ConversionError`]) or with the
//! `std`-flavoured [`Value::downcast`].

use std::any::Any;
use std::fmt::Debug;

use crate::error::{ConversionError, ConversionResult};
use crate::identity::TypeToken;

/// Owned, type-erased value with a cached [`TypeToken`]
pub struct Value {
    inner: Box<dyn Any + Send + Sync>,
    token: TypeToken,
}

impl Value {
    /// Boxes `val`, recording the token of `T`.
    ///
    /// Wrapping a `Value` inside another `Value` is permitted but almost
    /// never intended, as the token recorded would then be that of `Value`.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(val: T) -> Self {
        Self {
            inner: Box::new(val),
            token: TypeToken::of::<T>(),
        }
    }

    /// Returns the token of the payload type.
    #[inline]
    #[must_use]
    pub const fn type_token(&self) -> TypeToken {
        self.token
    }

    /// Returns the name of the payload type.
    #[inline]
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.token.type_name()
    }

    /// Returns `true` if the payload is of type `T`.
    #[inline]
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.token == TypeToken::of::<T>()
    }

    /// Returns a reference to the payload if it is of type `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Returns a mutable reference to the payload if it is of type `T`.
    #[must_use]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.inner.downcast_mut::<T>()
    }

    /// Unboxes the payload as a `T`, or hands `self` back unchanged.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let token = self.token;
        match self.inner.downcast::<T>() {
            Ok(val) => Ok(*val),
            Err(inner) => Err(Self { inner, token }),
        }
    }

    /// Unboxes the payload as a `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::UnexpectedType`] naming both types if the
    /// payload is not a `T`; the value itself is dropped.
    pub fn take<T: Any>(self) -> ConversionResult<T> {
        self.downcast::<T>().map_err(|val| ConversionError::UnexpectedType {
            expected: std::any::type_name::<T>(),
            found: val.type_name(),
        })
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Value(<{}>)", self.type_name())
    }
}

macro_rules! impl_value_from {
    ($($x:ty),+ $(,)?) => {
        $(impl From<$x> for Value {
            fn from(val: $x) -> Self {
                Value::new(val)
            }
        })+
    };
}

impl_value_from!(bool, i32, i64, u8, u32, u64, f32, f64, String, Vec<u8>, &'static str);
