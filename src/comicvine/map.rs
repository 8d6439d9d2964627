//! Mapping from raw ComicVine records to domain metadata.
//!
//! Mapping rules:
//! - a missing identifier is a [`HarvestError::MalformedRecord`], never
//!   silently defaulted;
//! - absent optional fields (publisher, description, image) become empty
//!   values;
//! - image maps yield only the `original_url` variant, with no fallback to
//!   another size;
//! - strings that upstream pads with whitespace (publisher names) are
//!   trimmed.

use chrono::NaiveDate;
use tracing::trace;

use super::wire::{CvCredit, CvImageMap, CvIssue, CvNamedRef, CvPublisher, CvStory, CvVolume};
use crate::harvest::HarvestError;
use crate::models::{
    CreditMetadata, IssueDetailsMetadata, IssueMetadata, StoryMetadata, VolumeMetadata,
};

/// The image size variant used as the canonical representation.
const ORIGINAL_IMAGE_KEY: &str = "original_url";

pub(super) fn map_volume(raw: CvVolume) -> Result<VolumeMetadata, HarvestError> {
    let id = require_id(raw.id, "volume")?;
    trace!("processing volume record: {}", id);
    Ok(VolumeMetadata {
        id,
        name: raw.name.unwrap_or_default(),
        start_year: raw.start_year.unwrap_or_default(),
        issue_count: raw.count_of_issues.unwrap_or_default(),
        publisher: publisher_name(raw.publisher.as_ref()),
        image_url: original_image(raw.image.as_ref()),
    })
}

pub(super) fn map_issue(raw: CvIssue) -> Result<IssueMetadata, HarvestError> {
    let id = require_id(raw.id, "issue")?;
    trace!("processing issue record: {}", id);
    Ok(IssueMetadata {
        id,
        volume_name: raw
            .volume
            .and_then(|volume| volume.name)
            .unwrap_or_default(),
        issue_number: raw.issue_number.unwrap_or_default(),
        cover_date: parse_date(raw.cover_date.as_deref()),
        store_date: parse_date(raw.store_date.as_deref()),
        description: raw.description.unwrap_or_default(),
        image_url: original_image(raw.image.as_ref()),
    })
}

pub(super) fn map_issue_details(raw: CvIssue) -> Result<IssueDetailsMetadata, HarvestError> {
    let source_id = require_id(raw.id, "issue")?;
    trace!("processing issue detail record: {}", source_id);
    Ok(IssueDetailsMetadata {
        source_id,
        publisher: String::new(),
        series: raw
            .volume
            .as_ref()
            .and_then(|volume| volume.name.clone())
            .unwrap_or_default(),
        volume: String::new(),
        issue_number: raw.issue_number.unwrap_or_default(),
        title: raw.name.unwrap_or_default(),
        cover_date: parse_date(raw.cover_date.as_deref()),
        store_date: parse_date(raw.store_date.as_deref()),
        description: raw.description.unwrap_or_default(),
        image_url: original_image(raw.image.as_ref()),
        characters: names(raw.character_credits),
        teams: names(raw.team_credits),
        locations: names(raw.location_credits),
        stories: names(raw.story_arc_credits),
        credits: credits(raw.person_credits),
    })
}

pub(super) fn map_story(raw: CvStory) -> Result<StoryMetadata, HarvestError> {
    let reference_id = require_id(raw.id, "story")?;
    trace!("processing story record: {}", reference_id);
    Ok(StoryMetadata {
        reference_id,
        name: raw.name.unwrap_or_default(),
        publisher: publisher_name(raw.publisher.as_ref()),
        image_url: original_image(raw.image.as_ref()),
    })
}

pub(super) fn require_id(id: Option<i64>, kind: &str) -> Result<String, HarvestError> {
    id.map(|id| id.to_string())
        .ok_or_else(|| HarvestError::MalformedRecord(format!("{} record is missing its id", kind)))
}

pub(super) fn publisher_name(publisher: Option<&CvPublisher>) -> String {
    publisher
        .and_then(|p| p.name.as_deref())
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

pub(super) fn original_image(image: Option<&CvImageMap>) -> String {
    image
        .and_then(|map| map.get(ORIGINAL_IMAGE_KEY))
        .and_then(|url| url.clone())
        .unwrap_or_default()
}

pub(super) fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value?, "%Y-%m-%d").ok()
}

fn names(refs: Option<Vec<CvNamedRef>>) -> Vec<String> {
    refs.unwrap_or_default()
        .into_iter()
        .filter_map(|entry| entry.name)
        .collect()
}

fn credits(entries: Option<Vec<CvCredit>>) -> Vec<CreditMetadata> {
    entries
        .unwrap_or_default()
        .into_iter()
        .map(|credit| CreditMetadata {
            name: credit.name.unwrap_or_default(),
            role: credit.role.unwrap_or_default(),
        })
        .collect()
}
