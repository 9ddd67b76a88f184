//! Overpass API access.
//!
//! [`OverpassSource`] runs a rendered Overpass QL script and yields the
//! returned elements. [`HttpOverpassClient`] posts the script to a public or
//! self-hosted interpreter; tests substitute [`test_support::StubOverpassSource`].

mod response;
mod source;

#[doc(hidden)]
pub mod test_support;

pub use response::decode_elements;
pub use source::{DEFAULT_OVERPASS_URL, HttpOverpassClient, OverpassSource};
