//! Schema collaborator interface
//!
//! Schemas belong to the surrounding serialization engine; the conversion
//! layer only ever asks a schema for its base type tag and its (optional)
//! logical type. Engines expose that through the [`Schema`] trait.
//!
//! [`SchemaNode`] is a minimal concrete implementor, for engines that do not
//! carry a schema model of their own and for tests. A bare [`TypeTag`] also
//! implements `Schema`, standing for a slot with no logical type.
//!
//! Registry lookups call [`Schema::specific_type`] once per converted value.
//! The provided implementation borrows the base tag when there is no logical
//! type, but has to build a new composite tag otherwise; implementors that sit
//! on a hot path should compute the composite once and return it borrowed,
//! as `SchemaNode` does.

use std::borrow::Cow;
use std::rc::Rc;
use std::sync::Arc;

use crate::tag::{compose, LogicalType, TypeTag};

/// The subset of a schema that conversion dispatch depends on
pub trait Schema {
    /// Returns the base type tag of this schema.
    fn base_type(&self) -> &TypeTag;

    /// Returns the logical type annotation of this schema, if any.
    ///
    /// An empty logical type is treated the same as `None`.
    fn logical_type(&self) -> Option<&LogicalType> {
        None
    }

    /// Returns the composite type tag of this schema, as computed by
    /// [`compose`].
    fn specific_type(&self) -> Cow<'_, TypeTag> {
        match self.logical_type() {
            Some(lt) if !lt.is_empty() => Cow::Owned(compose(self.base_type(), Some(lt))),
            _ => Cow::Borrowed(self.base_type()),
        }
    }
}

impl Schema for TypeTag {
    fn base_type(&self) -> &TypeTag {
        self
    }
}

macro_rules! impl_schema_ptr {
    ($($ptr:ident),+) => {
        $(impl<S: Schema + ?Sized> Schema for $ptr<S> {
            fn base_type(&self) -> &TypeTag {
                (**self).base_type()
            }

            fn logical_type(&self) -> Option<&LogicalType> {
                (**self).logical_type()
            }

            fn specific_type(&self) -> Cow<'_, TypeTag> {
                (**self).specific_type()
            }
        })+
    };
}

impl_schema_ptr!(Box, Rc, Arc);

impl<S: Schema + ?Sized> Schema for &S {
    fn base_type(&self) -> &TypeTag {
        (**self).base_type()
    }

    fn logical_type(&self) -> Option<&LogicalType> {
        (**self).logical_type()
    }

    fn specific_type(&self) -> Cow<'_, TypeTag> {
        (**self).specific_type()
    }
}

/// Base type plus optional logical type, with nothing else
///
/// The composite tag is computed on construction, so looking it up never
/// allocates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaNode {
    base: TypeTag,
    logical: Option<LogicalType>,
    specific: TypeTag,
}

impl SchemaNode {
    /// Constructs a schema node with no logical type.
    #[must_use]
    pub fn new(base: impl Into<TypeTag>) -> Self {
        let base = base.into();
        Self {
            specific: base.clone(),
            base,
            logical: None,
        }
    }

    /// Constructs a schema node annotated with `logical`.
    #[must_use]
    pub fn with_logical(base: impl Into<TypeTag>, logical: impl Into<LogicalType>) -> Self {
        let base = base.into();
        let logical = logical.into();
        Self {
            specific: compose(&base, Some(&logical)),
            base,
            logical: Some(logical),
        }
    }
}

impl From<TypeTag> for SchemaNode {
    fn from(base: TypeTag) -> Self {
        Self::new(base)
    }
}

impl Schema for SchemaNode {
    fn base_type(&self) -> &TypeTag {
        &self.base
    }

    fn logical_type(&self) -> Option<&LogicalType> {
        self.logical.as_ref()
    }

    fn specific_type(&self) -> Cow<'_, TypeTag> {
        Cow::Borrowed(&self.specific)
    }
}
