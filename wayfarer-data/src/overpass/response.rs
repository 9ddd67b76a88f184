//! Decoding of Overpass JSON documents.

use log::{debug, warn};
use serde::Deserialize;
use wayfarer_core::{ElementType, GeoPoint, OsmElement, Tags};

use crate::http::TransportError;

/// Remarks containing this marker mean the query did not complete.
const RUNTIME_ERROR_MARKER: &str = "runtime error";

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<RawElement>,
    #[serde(default)]
    remark: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawElement {
    #[serde(rename = "type")]
    element_type: String,
    id: u64,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    center: Option<RawCenter>,
    #[serde(default)]
    tags: Tags,
}

#[derive(Debug, Deserialize)]
struct RawCenter {
    lat: f64,
    lon: f64,
}

impl RawElement {
    fn into_element(self) -> Option<OsmElement> {
        let element_type = match self.element_type.as_str() {
            "node" => ElementType::Node,
            "way" => ElementType::Way,
            "relation" => ElementType::Relation,
            other => {
                debug!("skipping Overpass element {} of type {other}", self.id);
                return None;
            }
        };
        Some(OsmElement {
            element_type,
            id: self.id,
            lat: self.lat,
            lon: self.lon,
            center: self
                .center
                .and_then(|center| GeoPoint::new(center.lat, center.lon)),
            tags: self.tags,
        })
    }
}

/// Decode an Overpass JSON body into elements.
///
/// Elements of unknown type are skipped. A `remark` reporting a runtime
/// error (for example a query timeout) fails the whole response; other
/// remarks are logged.
///
/// # Errors
///
/// Returns [`TransportError::Decode`] for malformed JSON and
/// [`TransportError::Service`] when the interpreter reported a runtime error.
///
/// # Examples
/// ```
/// use wayfarer_data::overpass::decode_elements;
///
/// let mut body = br#"{"elements":[{"type":"node","id":7,"lat":1.0,"lon":2.0,"tags":{"name":"Chez Paul"}}]}"#.to_vec();
/// let elements = decode_elements(&mut body, "https://overpass.example")?;
/// assert_eq!(elements.len(), 1);
/// assert_eq!(elements[0].tags.get("name").map(String::as_str), Some("Chez Paul"));
/// # Ok::<(), wayfarer_data::http::TransportError>(())
/// ```
pub fn decode_elements(body: &mut [u8], url: &str) -> Result<Vec<OsmElement>, TransportError> {
    let response: OverpassResponse =
        simd_json::serde::from_slice(body).map_err(|err| TransportError::Decode {
            url: url.to_owned(),
            message: err.to_string(),
        })?;
    if let Some(remark) = response.remark.as_deref() {
        if remark.contains(RUNTIME_ERROR_MARKER) {
            return Err(TransportError::Service {
                url: url.to_owned(),
                message: remark.trim().to_owned(),
            });
        }
        warn!("Overpass remark: {}", remark.trim());
    }
    Ok(response
        .elements
        .into_iter()
        .filter_map(RawElement::into_element)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const URL: &str = "https://overpass.example/api/interpreter";

    fn decode(raw: &str) -> Result<Vec<OsmElement>, TransportError> {
        let mut body = raw.as_bytes().to_vec();
        decode_elements(&mut body, URL)
    }

    #[rstest]
    fn decodes_nodes_and_centres() {
        let elements = decode(
            r#"{
                "version": 0.6,
                "elements": [
                    {"type": "node", "id": 1, "lat": 48.85, "lon": 2.35, "tags": {"name": "A"}},
                    {"type": "way", "id": 2, "center": {"lat": 48.86, "lon": 2.36}, "tags": {"name": "B"}},
                    {"type": "relation", "id": 3}
                ]
            }"#,
        )
        .expect("valid document");
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0].position(), GeoPoint::new(48.85, 2.35));
        assert_eq!(elements[1].element_type, ElementType::Way);
        assert_eq!(elements[1].position(), GeoPoint::new(48.86, 2.36));
        assert!(elements[2].tags.is_empty());
        assert_eq!(elements[2].position(), None);
    }

    #[rstest]
    fn skips_unknown_element_types() {
        let elements = decode(r#"{"elements":[{"type":"area","id":9},{"type":"node","id":1}]}"#)
            .expect("valid document");
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].id, 1);
    }

    #[rstest]
    fn missing_elements_means_empty() {
        assert_eq!(decode("{}").expect("valid document"), Vec::new());
    }

    #[rstest]
    fn runtime_error_remark_fails() {
        let err = decode(
            r#"{"elements":[],"remark":"runtime error: Query timed out in \"query\" at line 3 after 26 seconds."}"#,
        )
        .expect_err("runtime error");
        assert!(matches!(err, TransportError::Service { .. }), "got {err:?}");
    }

    #[rstest]
    fn other_remarks_are_tolerated() {
        let elements =
            decode(r#"{"elements":[{"type":"node","id":4}],"remark":"note: results truncated"}"#)
                .expect("valid document");
        assert_eq!(elements.len(), 1);
    }

    #[rstest]
    fn malformed_documents_fail_to_decode() {
        let err = decode("<html>rate limited</html>").expect_err("not json");
        assert!(matches!(err, TransportError::Decode { .. }), "got {err:?}");
    }
}
