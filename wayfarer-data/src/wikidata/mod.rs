//! Wikidata image lookups over the public SPARQL endpoint.
//!
//! Only the `P18` (image) claim of an entity is consulted. The endpoint
//! returns Commons file URLs, which are upgraded to HTTPS before they reach
//! a [`wayfarer_core::Venue`].

mod source;
mod sparql;

#[doc(hidden)]
pub mod test_support;

pub use source::{DEFAULT_SPARQL_URL, HttpImageResolver, ImageResolver};
pub use sparql::{first_image, image_query};
