//! Runtime type-identity of opaque values
//!
//! Every [`Value`] carries a [`TypeToken`] that is captured once, at
//! construction, from the static type metadata of its payload. The token is
//! what the encode-side registry uses to tell apart two values that are bound
//! for the same schema slot but have a different in-memory shape (an `f32`
//! and an `f64` both headed for an `int`, say).
//!
//! Tokens compare by [`TypeId`] alone; the type name they carry is only used
//! for diagnostics and has no bearing on equality, ordering, or hashing.

use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};

use crate::value::Value;

/// Stable, comparable identifier for the concrete type of a value
#[derive(Clone, Copy)]
pub struct TypeToken {
    id: TypeId,
    name: &'static str,
}

impl TypeToken {
    /// Returns the token for the type `T`.
    #[inline]
    #[must_use]
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Returns the token for the type of `_sample`, ignoring its contents.
    ///
    /// This is the form used when registering a conversion by example:
    /// `TypeToken::of_val(&0f32) == TypeToken::of::<f32>()`.
    #[inline]
    #[must_use]
    pub fn of_val<T: Any>(_sample: &T) -> Self {
        Self::of::<T>()
    }

    /// Returns the underlying [`TypeId`].
    #[inline]
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.id
    }

    /// Returns the name of the type this token was derived from.
    ///
    /// The exact contents are those of [`std::any::type_name`], and are
    /// not guaranteed to be stable across compiler versions.
    #[inline]
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.name
    }
}

/// Returns the [`TypeToken`] of the payload held by `value`.
#[inline]
#[must_use]
pub fn identity(value: &Value) -> TypeToken {
    value.type_token()
}

impl PartialEq for TypeToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeToken {}

impl PartialOrd for TypeToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeToken {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for TypeToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl Debug for TypeToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TypeToken({})", self.name)
    }
}

impl Display for TypeToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}
