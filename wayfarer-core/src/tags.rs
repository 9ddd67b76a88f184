//! Tag utilities for venue normalisation.
//!
//! OSM tags are free-form, so most fields have several candidate keys. The
//! helpers here resolve them in a fixed priority order and ignore blank
//! values.

use std::collections::BTreeMap;

/// OpenStreetMap key/value tags.
pub type Tags = BTreeMap<String, String>;

/// Address parts in assembly order.
pub const ADDRESS_KEYS: [&str; 4] = [
    "addr:housenumber",
    "addr:street",
    "addr:city",
    "addr:postcode",
];

/// Website keys in priority order.
pub const WEBSITE_KEYS: [&str; 3] = ["website", "contact:website", "url"];

/// Phone keys in priority order.
pub const PHONE_KEYS: [&str; 2] = ["phone", "contact:phone"];

const COMMONS_FILE_PATH: &str = "https://commons.wikimedia.org/wiki/Special:FilePath/";
const COMMONS_FILE_PREFIX: &str = "File:";
const MAX_STARS: f32 = 7.0;

/// Return the trimmed value for `key`, treating blank values as absent.
#[must_use]
pub fn tag<'a>(tags: &'a Tags, key: &str) -> Option<&'a str> {
    tags.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

/// Return the first non-blank value among `keys`.
///
/// # Examples
/// ```
/// use wayfarer_core::{Tags, tags::{first_tag, WEBSITE_KEYS}};
///
/// let tags = Tags::from([
///     ("url".to_owned(), "https://b.example".to_owned()),
///     ("website".to_owned(), "https://a.example".to_owned()),
/// ]);
/// assert_eq!(first_tag(&tags, &WEBSITE_KEYS), Some("https://a.example"));
/// ```
#[must_use]
pub fn first_tag<'a>(tags: &'a Tags, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| tag(tags, key))
}

/// Join the `addr:*` parts with `", "`, omitting absent parts.
///
/// Returns `None` when no part is present.
///
/// # Examples
/// ```
/// use wayfarer_core::{Tags, tags::assemble_address};
///
/// let tags = Tags::from([
///     ("addr:street".to_owned(), "Rue de Rivoli".to_owned()),
///     ("addr:housenumber".to_owned(), "99".to_owned()),
///     ("addr:postcode".to_owned(), "75001".to_owned()),
/// ]);
/// assert_eq!(
///     assemble_address(&tags).as_deref(),
///     Some("99, Rue de Rivoli, 75001"),
/// );
/// ```
#[must_use]
pub fn assemble_address(tags: &Tags) -> Option<String> {
    let parts: Vec<&str> = ADDRESS_KEYS.iter().filter_map(|key| tag(tags, key)).collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Resolve an image URL carried directly on the element.
///
/// `image` wins when it is an HTTP(S) URL or a Commons `File:` reference;
/// otherwise a `wikimedia_commons` file reference is used.
#[must_use]
pub fn direct_image(tags: &Tags) -> Option<String> {
    if let Some(image) = tag(tags, "image") {
        if image.starts_with("http://") || image.starts_with("https://") {
            return Some(image.to_owned());
        }
        if let Some(url) = commons_file_url(image) {
            return Some(url);
        }
    }
    tag(tags, "wikimedia_commons").and_then(commons_file_url)
}

/// Convert a `File:Name.jpg` reference into a Commons file-path URL.
#[must_use]
pub fn commons_file_url(reference: &str) -> Option<String> {
    let name = reference.strip_prefix(COMMONS_FILE_PREFIX)?.trim();
    if name.is_empty() {
        return None;
    }
    Some(format!("{COMMONS_FILE_PATH}{}", name.replace(' ', "_")))
}

/// Return the `wikidata` tag when it is a well-formed entity id.
#[must_use]
pub fn wikidata_id(tags: &Tags) -> Option<&str> {
    tag(tags, "wikidata").filter(|id| is_wikidata_id(id))
}

/// Whether `id` looks like a Wikidata entity id (`Q` followed by digits).
///
/// # Examples
/// ```
/// use wayfarer_core::tags::is_wikidata_id;
///
/// assert!(is_wikidata_id("Q90"));
/// assert!(!is_wikidata_id("Q"));
/// assert!(!is_wikidata_id("Q1 . ?s ?p ?o"));
/// ```
#[must_use]
pub fn is_wikidata_id(id: &str) -> bool {
    id.strip_prefix('Q')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Parse a `stars` classification such as `4`, `3.5` or `3S`.
#[must_use]
pub fn parse_stars(value: &str) -> Option<f32> {
    let numeric: String = value
        .trim()
        .chars()
        .take_while(|ch| ch.is_ascii_digit() || *ch == '.')
        .collect();
    numeric
        .parse::<f32>()
        .ok()
        .filter(|stars| (0.0..=MAX_STARS).contains(stars))
}
