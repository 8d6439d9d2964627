//! Query specification and URL composition.

use tracing::warn;

/// Accumulates output-field selectors, filter predicates, and query parameters
/// prior to issuing a request.
///
/// Pure data assembly; no I/O happens here. Composing the final URL is a
/// deterministic function of the current state, and all values are
/// percent-encoded so a hostile value cannot alter the resource path.
#[derive(Debug, Clone, Default)]
pub struct QuerySpec {
    fields: Vec<String>,
    filters: Vec<(String, String)>,
    parameters: Vec<(String, String)>,
}

impl QuerySpec {
    /// Create an empty query specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request an output field. Fields are set-like: re-adding an existing
    /// name is a no-op, and insertion order is preserved.
    pub fn add_field(&mut self, name: &str) -> &mut Self {
        if name.is_empty() {
            warn!("ignoring empty field name");
            return self;
        }
        if !self.fields.iter().any(|f| f == name) {
            self.fields.push(name.to_string());
        }
        self
    }

    /// Add a filter predicate. At most one value per name; the last write wins.
    pub fn add_filter(&mut self, name: &str, value: &str) -> &mut Self {
        if name.is_empty() {
            warn!("ignoring filter with empty name");
            return self;
        }
        upsert(&mut self.filters, name, value);
        self
    }

    /// Add a query parameter. At most one value per name; the last write wins.
    pub fn add_parameter(&mut self, name: &str, value: &str) -> &mut Self {
        if name.is_empty() {
            warn!("ignoring parameter with empty name");
            return self;
        }
        upsert(&mut self.parameters, name, value);
        self
    }

    /// Compose the request URL for a resource under the API root.
    pub fn url_for(&self, base_url: &str, resource: &str, api_key: &str) -> String {
        self.url_at(&format!("{}/api/{}/", base_url, resource), api_key)
    }

    /// Compose the request URL against a full detail URL supplied by the
    /// upstream catalog itself (e.g. a record's `api_detail_url`).
    pub fn url_at(&self, detail_url: &str, api_key: &str) -> String {
        let mut url = format!(
            "{}?api_key={}&format=json",
            detail_url,
            urlencoding::encode(api_key)
        );

        if !self.fields.is_empty() {
            url.push_str("&field_list=");
            url.push_str(&self.fields.join(","));
        }

        if !self.filters.is_empty() {
            let filter = self
                .filters
                .iter()
                .map(|(name, value)| format!("{}:{}", name, urlencoding::encode(value)))
                .collect::<Vec<_>>()
                .join(",");
            url.push_str("&filter=");
            url.push_str(&filter);
        }

        for (name, value) in &self.parameters {
            url.push('&');
            url.push_str(&urlencoding::encode(name));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }

        url
    }
}

fn upsert(entries: &mut Vec<(String, String)>, name: &str, value: &str) {
    match entries.iter_mut().find(|(n, _)| n == name) {
        Some(entry) => entry.1 = value.to_string(),
        None => entries.push((name.to_string(), value.to_string())),
    }
}
