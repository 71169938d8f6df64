//! Cascade Value Model
//!
//! Tagged property values with an explicit deep-merge policy.
//!
//! # Core Concepts
//!
//! - [`PropValue`]: a mapping (merges recursively) or a leaf (replaces)
//! - [`PropMap`]: property name to value, with [`PropMap::merged`] and
//!   [`PropMap::is_subsumed_by`]
//! - [`OpaqueValue`]: identity-compared payloads such as callbacks
//!
//! # Example
//!
//! ```
//! use cascade_value::{PropMap, PropValue};
//!
//! let inherited = PropMap::new().with("elevation", 10);
//! let layer = PropMap::new().with("style", PropMap::new().with("background", "white"));
//!
//! let composed = inherited.merged(&layer);
//! assert_eq!(composed.get("elevation"), Some(&PropValue::from(10)));
//! assert!(composed.get_path(&["style", "background"]).is_some());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod json;
mod map;
mod value;

pub use map::PropMap;
pub use value::{Callback, OpaqueValue, PropValue};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
