//! Schema type tags and the composite-key algebra
//!
//! A schema slot is identified, for the purposes of conversion dispatch, by
//! its base type tag (`"int"`, `"fixed"`, ...) optionally refined by a
//! logical type (`"decimal"`, `"uuid"`, ...). The two are folded into a
//! single *composite* [`TypeTag`] by [`compose`]:
//!
//! ```
//! # use tedium_conv::tag::{compose, specific_type, LogicalType, TypeTag};
//! assert_eq!(compose(&TypeTag::INT, None), TypeTag::INT);
//! assert_eq!(specific_type(&TypeTag::FIXED, &LogicalType::DECIMAL), "fixed.decimal");
//! ```
//!
//! The same function is used on the encode and the decode path, so a
//! conversion registered for encoding into `"fixed.decimal"` and one
//! registered for decoding out of it are found under the same key even
//! though each side computes that key independently from its schema.
//!
//! The separator [`SEPARATOR`] does not appear in any base or logical type
//! tag defined here, which keeps composite tags distinct from base tags.

use std::borrow::{Borrow, Cow};
use std::fmt::{Debug, Display};
use std::ops::Deref;

#[cfg(feature = "serde_impls")]
use serde::{Deserialize, Serialize};

/// Character joining a base type tag to its logical type in a composite tag
pub const SEPARATOR: char = '.';

macro_rules! tag_consts {
    ($tag:ident; $($name:ident => $lit:literal),+ $(,)?) => {
        impl $tag {
            $(
                #[doc = concat!("The `", $lit, "` tag")]
                pub const $name: $tag = $tag(Cow::Borrowed($lit));
            )+
        }
    };
}

macro_rules! impl_tag {
    ($tag:ident) => {
        impl $tag {
            /// Constructs a tag from a static string without allocating.
            #[inline]
            #[must_use]
            pub const fn from_static(s: &'static str) -> Self {
                Self(Cow::Borrowed(s))
            }

            /// Returns the tag as a string slice.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns `true` if the tag is the empty string.
            #[inline]
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<&'static str> for $tag {
            fn from(s: &'static str) -> Self {
                Self(Cow::Borrowed(s))
            }
        }

        impl From<String> for $tag {
            fn from(s: String) -> Self {
                Self(Cow::Owned(s))
            }
        }

        impl From<&$tag> for $tag {
            fn from(tag: &$tag) -> Self {
                tag.clone()
            }
        }

        impl Deref for $tag {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $tag {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $tag {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $tag {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $tag {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl Display for $tag {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Debug for $tag {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({:?})", stringify!($tag), &*self.0)
            }
        }
    };
}

/// Tag of a schema's base (primitive or structural) type, or a composite of
/// a base type and a logical type.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde_impls", derive(Serialize, Deserialize), serde(transparent))]
#[repr(transparent)]
pub struct TypeTag(Cow<'static, str>);

/// Tag of a logical-type annotation refining a base type
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde_impls", derive(Serialize, Deserialize), serde(transparent))]
#[repr(transparent)]
pub struct LogicalType(Cow<'static, str>);

impl_tag!(TypeTag);
impl_tag!(LogicalType);

tag_consts! { TypeTag;
    NULL => "null",
    BOOLEAN => "boolean",
    INT => "int",
    LONG => "long",
    FLOAT => "float",
    DOUBLE => "double",
    BYTES => "bytes",
    STRING => "string",
    RECORD => "record",
    ERROR => "error",
    REF => "<ref>",
    ENUM => "enum",
    ARRAY => "array",
    MAP => "map",
    UNION => "union",
    FIXED => "fixed",
}

tag_consts! { LogicalType;
    DECIMAL => "decimal",
    UUID => "uuid",
    DATE => "date",
    TIME_MILLIS => "time-millis",
    TIME_MICROS => "time-micros",
    TIMESTAMP_MILLIS => "timestamp-millis",
    TIMESTAMP_MICROS => "timestamp-micros",
    LOCAL_TIMESTAMP_MILLIS => "local-timestamp-millis",
    LOCAL_TIMESTAMP_MICROS => "local-timestamp-micros",
    DURATION => "duration",
}

impl TypeTag {
    /// Splits a composite tag into its base and logical parts.
    ///
    /// A plain base tag yields `(base, None)`.
    #[must_use]
    pub fn split(&self) -> (&str, Option<&str>) {
        match self.0.split_once(SEPARATOR) {
            Some((base, logical)) => (base, Some(logical)),
            None => (&self.0, None),
        }
    }

    /// Returns `true` if this tag carries a logical-type suffix.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.0.contains(SEPARATOR)
    }
}

/// Combines a base type tag with an optional logical type into the composite
/// tag used as a conversion dispatch key.
///
/// If `logical` is `None` or empty, the result is `base` unchanged; otherwise
/// it is `base`, [`SEPARATOR`], `logical`.
#[must_use]
pub fn compose(base: &TypeTag, logical: Option<&LogicalType>) -> TypeTag {
    match logical {
        Some(lt) if !lt.is_empty() => {
            let mut buf = String::with_capacity(base.len() + 1 + lt.len());
            buf.push_str(base);
            buf.push(SEPARATOR);
            buf.push_str(lt);
            TypeTag(Cow::Owned(buf))
        }
        _ => base.clone(),
    }
}

/// Combines a base type with a logical type, for targeting
/// logical-type-specific slots when registering conversions.
#[must_use]
pub fn specific_type(base: &TypeTag, logical: &LogicalType) -> TypeTag {
    compose(base, Some(logical))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn compose_without_logical() {
        assert_eq!(compose(&TypeTag::INT, None), TypeTag::INT);
        assert_eq!(compose(&TypeTag::INT, Some(&LogicalType::default())), TypeTag::INT);
    }

    #[test]
    fn compose_with_logical() {
        assert_eq!(
            compose(&TypeTag::FIXED, Some(&LogicalType::DECIMAL)),
            "fixed.decimal"
        );
        assert_eq!(
            specific_type(&TypeTag::LONG, &LogicalType::TIMESTAMP_MICROS),
            "long.timestamp-micros"
        );
    }

    #[test]
    fn split_recovers_parts() {
        let tag = specific_type(&TypeTag::BYTES, &LogicalType::DECIMAL);
        assert!(tag.is_composite());
        assert_eq!(tag.split(), ("bytes", Some("decimal")));
        assert_eq!(TypeTag::STRING.split(), ("string", None));
    }

    #[test]
    fn owned_and_borrowed_agree() {
        use std::collections::HashSet;

        let owned = TypeTag::from(String::from("fixed.decimal"));
        let composed = specific_type(&TypeTag::FIXED, &LogicalType::DECIMAL);
        assert_eq!(owned, composed);

        let set: HashSet<TypeTag> = [composed].into_iter().collect();
        assert!(set.contains("fixed.decimal"));
    }

    #[test]
    fn builtin_tags_avoid_separator() {
        for tag in [
            TypeTag::NULL, TypeTag::BOOLEAN, TypeTag::INT, TypeTag::LONG, TypeTag::FLOAT,
            TypeTag::DOUBLE, TypeTag::BYTES, TypeTag::STRING, TypeTag::RECORD, TypeTag::ERROR,
            TypeTag::REF, TypeTag::ENUM, TypeTag::ARRAY, TypeTag::MAP, TypeTag::UNION,
            TypeTag::FIXED,
        ] {
            assert!(!tag.contains(SEPARATOR), "{tag:?}");
        }
        for lt in [
            LogicalType::DECIMAL, LogicalType::UUID, LogicalType::DATE,
            LogicalType::TIME_MILLIS, LogicalType::TIME_MICROS,
            LogicalType::TIMESTAMP_MILLIS, LogicalType::TIMESTAMP_MICROS,
            LogicalType::LOCAL_TIMESTAMP_MILLIS, LogicalType::LOCAL_TIMESTAMP_MICROS,
            LogicalType::DURATION,
        ] {
            assert!(!lt.contains(SEPARATOR), "{lt:?}");
        }
    }

    #[cfg(feature = "serde_impls")]
    #[test]
    fn serde_transparent() {
        let tag = specific_type(&TypeTag::FIXED, &LogicalType::DECIMAL);
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(json, "\"fixed.decimal\"");
        let back: TypeTag = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tag);
    }
}
