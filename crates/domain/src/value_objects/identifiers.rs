//! Opaque string identifiers used by the Transloc API

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// The raw identifier
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume into the raw identifier
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }
    };
}

string_identifier!(
    /// Transloc route identifier, usable as a route filter
    RouteId
);

string_identifier!(
    /// Transloc segment identifier
    SegmentId
);

string_identifier!(
    /// Transloc route type (e.g. `bus`)
    RouteType
);
