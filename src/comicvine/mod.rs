//! ComicVine client.
//!
//! Each public operation composes a [`QuerySpec`], runs it through the harvest
//! engine, and maps the raw records into the domain shapes in
//! [`crate::models`]. Paginated searches honor the configured record cap and
//! the inter-page rate-limit pause; detail fetches are single requests.

mod map;
pub mod reference;
mod wire;

pub use reference::{reference_id, supported_reference};

use std::sync::Arc;

use tracing::debug;

use crate::config::HarvestConfig;
use crate::harvest::{
    fetch_detail, harvest_pages, CancelToken, HarvestError, HttpTransport, QuerySpec, Transport,
};
use crate::models::{
    IssueDetailsMetadata, IssueMetadata, StoryDetailMetadata, StoryIssueMetadata, StoryMetadata,
    VolumeMetadata,
};

const NAME_FILTER: &str = "name";
const VOLUME_FILTER: &str = "volume";
const ISSUE_NUMBER_FILTER: &str = "issue_number";
const QUERY_PARAMETER: &str = "query";
const RESOURCES_PARAMETER: &str = "resources";
const RESULT_LIMIT_PARAMETER: &str = "limit";

/// Path prefix ComicVine assigns to issue records.
const ISSUE_ID_PREFIX: &str = "4000";
/// Path prefix ComicVine assigns to story arc records.
const STORY_ID_PREFIX: &str = "4045";

/// Client for the ComicVine catalog API.
///
/// One client may serve many harvests; each call owns its own query state, so
/// concurrent calls only share the transport and the configured credential.
#[derive(Debug, Clone)]
pub struct ComicVineClient {
    transport: Arc<dyn Transport>,
    config: HarvestConfig,
    cancel: CancelToken,
}

impl ComicVineClient {
    /// Create a client over an HTTP transport.
    pub fn new(config: HarvestConfig) -> Result<Self, HarvestError> {
        Ok(Self::with_transport(
            config,
            Arc::new(HttpTransport::new()?),
        ))
    }

    /// Create a client over an injected transport.
    pub fn with_transport(config: HarvestConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            config,
            cancel: CancelToken::new(),
        }
    }

    /// A token that cancels this client's in-flight harvests at their next
    /// rate-limit pause.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Search for volumes matching a series name.
    ///
    /// A `max_records` of zero means unbounded.
    pub async fn get_volumes(
        &self,
        series_name: &str,
        max_records: u32,
    ) -> Result<Vec<VolumeMetadata>, HarvestError> {
        require_subject(series_name, "series name")?;
        debug!("fetching volumes: series={}", series_name);

        let mut spec = QuerySpec::new();
        spec.add_filter(NAME_FILTER, series_name);
        for field in ["id", "name", "start_year", "publisher", "image", "count_of_issues"] {
            spec.add_field(field);
        }
        spec.add_parameter(RESOURCES_PARAMETER, "volume");
        spec.add_parameter(QUERY_PARAMETER, series_name);
        if max_records > 0 {
            spec.add_parameter(RESULT_LIMIT_PARAMETER, &max_records.to_string());
        }

        harvest_pages(
            self.transport.as_ref(),
            &self.config,
            "volumes",
            spec,
            max_records,
            &self.cancel,
            map::map_volume,
        )
        .await
    }

    /// Fetch every issue belonging to a volume.
    pub async fn get_all_issues(
        &self,
        volume_id: &str,
    ) -> Result<Vec<IssueDetailsMetadata>, HarvestError> {
        require_subject(volume_id, "volume id")?;
        debug!("fetching all issues: volume={}", volume_id);

        let mut spec = QuerySpec::new();
        spec.add_filter(VOLUME_FILTER, volume_id);
        for field in ["id", "name", "issue_number", "cover_date", "store_date", "description", "image"] {
            spec.add_field(field);
        }

        harvest_pages(
            self.transport.as_ref(),
            &self.config,
            "issues",
            spec,
            0,
            &self.cancel,
            map::map_issue_details,
        )
        .await
    }

    /// Fetch a single issue of a volume by issue number, or `None` when the
    /// catalog has no matching record.
    pub async fn get_issue(
        &self,
        volume_id: &str,
        issue_number: &str,
    ) -> Result<Option<IssueMetadata>, HarvestError> {
        require_subject(volume_id, "volume id")?;
        require_subject(issue_number, "issue number")?;
        debug!("fetching issue: volume={} issue={}", volume_id, issue_number);

        let mut spec = QuerySpec::new();
        spec.add_filter(VOLUME_FILTER, volume_id);
        spec.add_filter(ISSUE_NUMBER_FILTER, issue_number);
        for field in ["id", "name", "issue_number", "cover_date", "store_date", "description", "image", "volume"] {
            spec.add_field(field);
        }

        let result = harvest_pages(
            self.transport.as_ref(),
            &self.config,
            "issues",
            spec,
            1,
            &self.cancel,
            map::map_issue,
        )
        .await?;

        Ok(result.into_iter().next())
    }

    /// Fetch the full details of a single issue, including the publisher and
    /// volume label resolved through the issue's parent volume.
    pub async fn get_issue_details(
        &self,
        issue_id: &str,
    ) -> Result<IssueDetailsMetadata, HarvestError> {
        require_subject(issue_id, "issue id")?;
        self.config.validate()?;
        debug!("fetching issue details: issue={}", issue_id);

        let mut spec = QuerySpec::new();
        for field in [
            "id",
            "name",
            "issue_number",
            "cover_date",
            "store_date",
            "description",
            "image",
            "volume",
            "character_credits",
            "team_credits",
            "location_credits",
            "story_arc_credits",
            "person_credits",
        ] {
            spec.add_field(field);
        }

        let url = spec.url_for(
            &self.config.base_url,
            &format!("issue/{}-{}", ISSUE_ID_PREFIX, issue_id),
            &self.config.api_key,
        );
        let raw: wire::CvIssue = fetch_detail(self.transport.as_ref(), &self.config, &url).await?;

        let volume_detail_url = raw
            .volume
            .as_ref()
            .and_then(|volume| volume.api_detail_url.clone());
        let mut details = map::map_issue_details(raw)?;

        // The issue payload does not carry the publisher or the run's start
        // year; those live on the parent volume record.
        if let Some(volume_url) = volume_detail_url {
            let volume = self.get_volume_detail(&volume_url).await?;
            details.publisher = volume.publisher;
            details.volume = volume.start_year;
            if details.series.is_empty() {
                details.series = volume.name;
            }
        }

        Ok(details)
    }

    /// Search for story arcs matching a name.
    ///
    /// A `max_records` of zero means unbounded.
    pub async fn get_stories(
        &self,
        story_name: &str,
        max_records: u32,
    ) -> Result<Vec<StoryMetadata>, HarvestError> {
        require_subject(story_name, "story name")?;
        debug!("fetching stories: name={}", story_name);

        let mut spec = QuerySpec::new();
        spec.add_filter(NAME_FILTER, story_name);
        for field in ["id", "name", "publisher", "image"] {
            spec.add_field(field);
        }
        spec.add_parameter(RESOURCES_PARAMETER, "volume");
        spec.add_parameter(QUERY_PARAMETER, story_name);
        if max_records > 0 {
            spec.add_parameter(RESULT_LIMIT_PARAMETER, &max_records.to_string());
        }

        harvest_pages(
            self.transport.as_ref(),
            &self.config,
            "story_arcs",
            spec,
            max_records,
            &self.cancel,
            map::map_story,
        )
        .await
    }

    /// Fetch the full details of a story arc, resolving each of its issues
    /// through a separate detail fetch.
    ///
    /// Issues are resolved strictly in the order the story lists them, and
    /// each resolved issue is stamped with its 1-based reading order from that
    /// position. If any issue fetch fails, the whole story fails.
    pub async fn get_story_detail(
        &self,
        reference_id: &str,
    ) -> Result<StoryDetailMetadata, HarvestError> {
        require_subject(reference_id, "reference id")?;
        self.config.validate()?;
        debug!("fetching story detail: reference={}", reference_id);

        let mut spec = QuerySpec::new();
        for field in ["id", "publisher", "name", "description", "issues"] {
            spec.add_field(field);
        }

        let url = spec.url_for(
            &self.config.base_url,
            &format!("story_arc/{}-{}", STORY_ID_PREFIX, reference_id),
            &self.config.api_key,
        );
        let raw: wire::CvStoryDetail =
            fetch_detail(self.transport.as_ref(), &self.config, &url).await?;

        let mut story = StoryDetailMetadata {
            reference_id: reference_id.to_string(),
            name: raw.name.unwrap_or_default(),
            publisher: map::publisher_name(raw.publisher.as_ref()),
            description: raw.description.unwrap_or_default(),
            issues: Vec::new(),
        };

        let children = raw.issues.unwrap_or_default();
        debug!("story lists {} issue(s)", children.len());

        for (index, child) in children.into_iter().enumerate() {
            let child_id = map::require_id(child.id, "story issue")?;
            let issue = self.get_issue_details(&child_id).await?;
            story.issues.push(StoryIssueMetadata {
                reading_order: index + 1,
                name: issue.series,
                volume: issue.volume,
                issue_number: issue.issue_number,
                cover_date: issue.cover_date,
            });
        }

        Ok(story)
    }

    /// Fetch the full details of a volume from its upstream detail URL.
    pub async fn get_volume_detail(
        &self,
        api_detail_url: &str,
    ) -> Result<VolumeMetadata, HarvestError> {
        require_subject(api_detail_url, "details URL")?;
        self.config.validate()?;

        let mut spec = QuerySpec::new();
        for field in ["id", "name", "start_year", "api_detail_url", "publisher", "image", "count_of_issues"] {
            spec.add_field(field);
        }

        let url = spec.url_at(api_detail_url, &self.config.api_key);
        let raw: wire::CvVolume = fetch_detail(self.transport.as_ref(), &self.config, &url).await?;

        map::map_volume(raw)
    }

    /// Extract the reference id embedded in a ComicVine web address.
    pub fn reference_id(&self, web_address: &str) -> Option<String> {
        reference::reference_id(web_address)
    }
}

fn require_subject(value: &str, what: &str) -> Result<(), HarvestError> {
    if value.is_empty() {
        return Err(HarvestError::MissingConfiguration(what.to_string()));
    }
    Ok(())
}
