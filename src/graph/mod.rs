pub mod connection;
pub mod geometry;
pub mod node;
pub mod value;

pub use connection::*;
pub use geometry::*;
pub use node::*;
pub use value::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines an opaque, string-backed identifier allocated from a counter as `<prefix><n>`.
macro_rules! define_id {
    ($name:ident, $prefix:expr) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub(crate) fn from_counter(n: u64) -> Self {
                Self(format!("{}{}", Self::PREFIX, n))
            }

            /// The counter value this id was allocated from, if it follows the `<prefix><n>` scheme.
            pub(crate) fn sequence(&self) -> Option<u64> {
                self.0.strip_prefix(Self::PREFIX)?.parse().ok()
            }

            /// True when no counter value follows this id, so nothing could be allocated after it.
            pub(crate) fn is_last_in_sequence(&self) -> bool {
                self.sequence() == Some(u64::MAX)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(NodeId, "node_");
define_id!(ConnectionId, "conn_");
