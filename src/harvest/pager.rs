//! The paginated harvest loop.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, trace};

use super::{pause, CancelToken, HarvestError, QuerySpec, Transport};
use crate::config::HarvestConfig;

/// One upstream page of results.
///
/// `offset` is the zero-based index of the first record in this page,
/// `page_result_count` the number of records actually returned, and
/// `total_result_count` the number matching the query across all pages.
#[derive(Debug, Deserialize)]
pub struct PageEnvelope<R> {
    #[serde(default)]
    pub offset: u64,
    #[serde(rename = "number_of_page_results", default)]
    pub page_result_count: u64,
    #[serde(rename = "number_of_total_results", default)]
    pub total_result_count: u64,
    #[serde(default = "Vec::new")]
    pub results: Vec<R>,
}

/// A single, non-paginated detail record.
#[derive(Debug, Deserialize)]
pub struct DetailEnvelope<R> {
    pub results: R,
}

/// Walk a paginated query, mapping each raw record and accumulating the
/// results in upstream order.
///
/// The first page never carries an explicit `page` parameter, preserving the
/// upstream default-first-page semantics; later pages do. A `max_records` of
/// zero means unbounded. Between pages (never after the final one) the loop
/// pauses for the configured delay; interrupting that pause aborts the whole
/// harvest with [`HarvestError::Cancelled`] and returns no partial result.
pub async fn harvest_pages<R, T, F>(
    transport: &dyn Transport,
    config: &HarvestConfig,
    resource: &str,
    mut spec: QuerySpec,
    max_records: u32,
    cancel: &CancelToken,
    mut map: F,
) -> Result<Vec<T>, HarvestError>
where
    R: DeserializeOwned,
    F: FnMut(R) -> Result<T, HarvestError>,
{
    config.validate()?;

    let delay = config.delay();
    let mut page: u32 = 0;
    let mut result: Vec<T> = Vec::new();

    loop {
        page += 1;
        if page > 1 {
            trace!("setting page: {}", page);
            spec.add_parameter("page", &page.to_string());
        }

        let url = spec.url_for(&config.base_url, resource, &config.api_key);
        debug!(
            "fetching page {} of {}: API key=****{}",
            page,
            resource,
            config.masked_api_key()
        );

        let body = transport.get_json(&url).await?;
        let envelope: PageEnvelope<R> = serde_json::from_value(body)?;
        debug!("received {} record(s)", envelope.results.len());

        let take = if max_records == 0 {
            envelope.results.len()
        } else {
            let remaining = (max_records as usize).saturating_sub(result.len());
            envelope.results.len().min(remaining)
        };

        for raw in envelope.results.into_iter().take(take) {
            result.push(map(raw)?);
        }

        let hit_cap = max_records > 0 && result.len() >= max_records as usize;
        let exhausted =
            envelope.offset + envelope.page_result_count >= envelope.total_result_count;
        // A page with no records cannot make progress; stop rather than spin.
        if hit_cap || exhausted || envelope.page_result_count == 0 {
            break;
        }

        trace!("sleeping for {:?}", delay);
        pause(delay, cancel).await?;
    }

    Ok(result)
}

/// Fetch a single detail record from a fully composed URL.
pub async fn fetch_detail<R>(
    transport: &dyn Transport,
    config: &HarvestConfig,
    url: &str,
) -> Result<R, HarvestError>
where
    R: DeserializeOwned,
{
    config.validate()?;

    debug!("fetching detail record: API key=****{}", config.masked_api_key());
    let body = transport.get_json(url).await?;
    let envelope: DetailEnvelope<R> = serde_json::from_value(body)?;

    Ok(envelope.results)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::harvest::mock::ScriptedTransport;

    fn test_config() -> HarvestConfig {
        HarvestConfig::new("OICU812")
    }

    #[derive(Debug, serde::Deserialize)]
    struct RawEntry {
        id: u64,
    }

    fn page(offset: u64, total: u64, ids: &[u64]) -> serde_json::Value {
        json!({
            "offset": offset,
            "number_of_page_results": ids.len(),
            "number_of_total_results": total,
            "results": ids.iter().map(|id| json!({ "id": id })).collect::<Vec<_>>(),
        })
    }

    async fn run(
        transport: &ScriptedTransport,
        max_records: u32,
        cancel: &CancelToken,
    ) -> Result<Vec<u64>, HarvestError> {
        harvest_pages(
            transport,
            &test_config(),
            "volumes",
            QuerySpec::new(),
            max_records,
            cancel,
            |raw: RawEntry| Ok(raw.id),
        )
        .await
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_pages_for_seven_records_in_pages_of_five() {
        let transport = ScriptedTransport::new();
        transport.push_json(page(0, 7, &[1, 2, 3, 4, 5]));
        transport.push_json(page(5, 7, &[6, 7]));

        let result = run(&transport, 0, &CancelToken::new()).await.unwrap();

        assert_eq!(result, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_page_carries_no_page_parameter() {
        let transport = ScriptedTransport::new();
        transport.push_json(page(0, 7, &[1, 2, 3, 4, 5]));
        transport.push_json(page(5, 7, &[6, 7]));

        run(&transport, 0, &CancelToken::new()).await.unwrap();

        let requests = transport.requests();
        assert!(!requests[0].contains("page="));
        assert!(requests[1].contains("&page=2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_records_caps_the_result() {
        let transport = ScriptedTransport::new();
        transport.push_json(page(0, 7, &[1, 2, 3, 4, 5]));

        let result = run(&transport, 3, &CancelToken::new()).await.unwrap();

        assert_eq!(result, vec![1, 2, 3]);
        // The cap was hit on the first page; no second fetch happens.
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cap_spanning_pages_takes_the_remainder() {
        let transport = ScriptedTransport::new();
        transport.push_json(page(0, 12, &[1, 2, 3, 4, 5]));
        transport.push_json(page(5, 12, &[6, 7, 8, 9, 10]));

        let result = run(&transport, 7, &CancelToken::new()).await.unwrap();

        assert_eq!(result, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_max_records_means_unbounded() {
        let transport = ScriptedTransport::new();
        transport.push_json(page(0, 6, &[1, 2, 3]));
        transport.push_json(page(3, 6, &[4, 5, 6]));

        let result = run(&transport, 0, &CancelToken::new()).await.unwrap();

        assert_eq!(result.len(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_total_results_terminates_after_first_page() {
        let transport = ScriptedTransport::new();
        transport.push_json(page(0, 0, &[]));

        let result = run(&transport, 0, &CancelToken::new()).await.unwrap();

        assert!(result.is_empty());
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_happens_between_pages_only() {
        let transport = ScriptedTransport::new();
        transport.push_json(page(0, 12, &[1, 2, 3, 4, 5]));
        transport.push_json(page(5, 12, &[6, 7, 8, 9, 10]));
        transport.push_json(page(10, 12, &[11, 12]));

        let started = tokio::time::Instant::now();
        run(&transport, 0, &CancelToken::new()).await.unwrap();

        // Three pages fetched, two pauses of the minimum one-second delay.
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_returns_no_partial_result() {
        let transport = ScriptedTransport::new();
        transport.push_json(page(0, 12, &[1, 2, 3, 4, 5]));
        transport.push_json(page(5, 12, &[6, 7, 8, 9, 10]));

        let cancel = CancelToken::new();
        cancel.cancel();

        let result = run(&transport, 0, &cancel).await;

        // One page was fetched, then the pause aborted; nothing is returned.
        assert!(matches!(result, Err(HarvestError::Cancelled)));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_aborts_the_harvest() {
        let transport = ScriptedTransport::new();
        transport.push_json(page(0, 12, &[1, 2, 3, 4, 5]));
        transport.push_error(HarvestError::Transport("connection reset".into()));

        let result = run(&transport, 0, &CancelToken::new()).await;

        assert!(matches!(result, Err(HarvestError::Transport(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_api_key_fails_before_any_fetch() {
        let transport = ScriptedTransport::new();
        transport.push_json(page(0, 1, &[1]));

        let result = harvest_pages(
            &transport,
            &HarvestConfig::new(""),
            "volumes",
            QuerySpec::new(),
            0,
            &CancelToken::new(),
            |raw: RawEntry| Ok(raw.id),
        )
        .await;

        assert!(matches!(result, Err(HarvestError::MissingConfiguration(_))));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_envelope_body_is_an_empty_response() {
        let transport = ScriptedTransport::new();
        transport.push_json(json!("not an envelope"));

        let result = run(&transport, 0, &CancelToken::new()).await;

        assert!(matches!(result, Err(HarvestError::EmptyResponse)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_detail_unwraps_the_envelope() {
        let transport = ScriptedTransport::new();
        transport.push_json(json!({ "results": { "id": 42 } }));

        let raw: RawEntry = fetch_detail(&transport, &test_config(), "http://example.com/api/x/")
            .await
            .unwrap();

        assert_eq!(raw.id, 42);
    }
}
