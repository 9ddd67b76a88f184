//! SPARQL query rendering and result parsing.

use serde::Deserialize;
use wayfarer_core::tags::is_wikidata_id;

/// Render the image query for entity `id`.
///
/// Returns `None` unless `id` looks like `Q123`, so arbitrary tag values are
/// never interpolated into a query.
///
/// # Examples
/// ```
/// use wayfarer_data::wikidata::image_query;
///
/// let query = image_query("Q243").expect("valid id");
/// assert!(query.contains("wd:Q243 wdt:P18 ?image"));
/// assert_eq!(image_query("Q243 } DROP"), None);
/// ```
#[must_use]
pub fn image_query(id: &str) -> Option<String> {
    let id = id.trim();
    is_wikidata_id(id).then(|| format!("SELECT ?image WHERE {{ wd:{id} wdt:P18 ?image . }} LIMIT 1"))
}

#[derive(Debug, Deserialize)]
pub(crate) struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    #[serde(default)]
    bindings: Vec<ImageBinding>,
}

#[derive(Debug, Deserialize)]
struct ImageBinding {
    image: Option<BindingValue>,
}

#[derive(Debug, Deserialize)]
struct BindingValue {
    value: String,
}

impl SparqlResponse {
    pub(crate) fn into_image(self) -> Option<String> {
        self.results
            .bindings
            .into_iter()
            .filter_map(|binding| binding.image)
            .map(|binding| binding.value)
            .find(|value| !value.trim().is_empty())
            .map(|value| upgrade_scheme(value.trim()))
    }
}

/// Extract the first image URL from a SPARQL JSON result document.
///
/// # Errors
///
/// Returns the parser error when `body` is not a SPARQL result document.
///
/// # Examples
/// ```
/// use wayfarer_data::wikidata::first_image;
///
/// let body = br#"{"head":{"vars":["image"]},"results":{"bindings":[
///     {"image":{"type":"uri","value":"http://commons.wikimedia.org/wiki/Special:FilePath/Louvre.jpg"}}
/// ]}}"#;
/// assert_eq!(
///     first_image(body)?.as_deref(),
///     Some("https://commons.wikimedia.org/wiki/Special:FilePath/Louvre.jpg"),
/// );
/// # Ok::<(), serde_json::Error>(())
/// ```
pub fn first_image(body: &[u8]) -> Result<Option<String>, serde_json::Error> {
    let response: SparqlResponse = serde_json::from_slice(body)?;
    Ok(response.into_image())
}

fn upgrade_scheme(url: &str) -> String {
    url.strip_prefix("http://")
        .map_or_else(|| url.to_owned(), |rest| format!("https://{rest}"))
}
