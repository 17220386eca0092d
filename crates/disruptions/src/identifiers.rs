//! Type-safe, cheaply cloned identifiers for disruptions and routes.
//!
//! All identifiers use Arc<str> so registry snapshots can hand them out freely.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

macro_rules! impl_identifier {
    ($name:ident) => {
        #[derive(Clone, Debug)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(s: impl AsRef<str>) -> Self {
                Self(s.as_ref().into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Derive the identifier of one part of a multi-part feature.
            pub fn part(&self, index: usize) -> Self {
                Self::new(format!("{}/{}", self.0, index))
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.hash(state);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

impl_identifier!(DisruptionIdentifier);
impl_identifier!(RouteIdentifier);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_equality() {
        let id1 = DisruptionIdentifier::new("nzta-123");
        let id2 = DisruptionIdentifier::new("nzta-123");
        let id3 = id1.clone();

        assert_eq!(id1, id2);
        assert_eq!(id1, id3);
        assert!(Arc::ptr_eq(&id1.0, &id3.0)); // Clone shares Arc
    }

    #[test]
    fn test_identifier_hash() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(DisruptionIdentifier::new("council-7"), 42);

        assert_eq!(map.get(&DisruptionIdentifier::new("council-7")), Some(&42));
    }

    #[test]
    fn test_identifier_display() {
        let id = RouteIdentifier::new("route-0");
        assert_eq!(format!("{}", id), "route-0");
    }

    #[test]
    fn test_identifier_parts() {
        let id = DisruptionIdentifier::new("sh6-slip");
        assert_eq!(id.part(0).as_str(), "sh6-slip/0");
        assert_eq!(id.part(2).as_str(), "sh6-slip/2");
    }

    #[test]
    fn test_identifier_conversions() {
        let _id1: RouteIdentifier = "route-1".into();
        let _id2: RouteIdentifier = String::from("route-2").into();
    }
}
