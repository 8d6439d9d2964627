//! Domain metadata shapes.
//!
//! All of these are flat structures with a required identifier plus optional
//! descriptive fields. The mappers in [`crate::comicvine`] substitute empty
//! values for absent upstream fields rather than failing, so empty strings
//! here mean "the catalog did not say".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A comic book volume (series run) from a volume search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VolumeMetadata {
    /// Catalog identifier for the volume
    pub id: String,

    /// Series name
    pub name: String,

    /// Year the run started, as the catalog reports it
    pub start_year: String,

    /// Number of issues in the run
    pub issue_count: u32,

    /// Publisher display name
    pub publisher: String,

    /// Canonical cover image URL
    pub image_url: String,
}

/// A single issue from an issue search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueMetadata {
    /// Catalog identifier for the issue
    pub id: String,

    /// Series name the issue belongs to
    pub volume_name: String,

    /// Issue number within the series
    pub issue_number: String,

    /// Cover date, when the catalog carries one
    pub cover_date: Option<NaiveDate>,

    /// Store date, when the catalog carries one
    pub store_date: Option<NaiveDate>,

    /// Issue description (may contain markup from the catalog)
    pub description: String,

    /// Canonical cover image URL
    pub image_url: String,
}

/// The full set of details for a single issue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueDetailsMetadata {
    /// Catalog identifier for the issue
    pub source_id: String,

    /// Publisher display name
    pub publisher: String,

    /// Series name
    pub series: String,

    /// Volume label (the start year of the run)
    pub volume: String,

    /// Issue number within the series
    pub issue_number: String,

    /// Issue title
    pub title: String,

    /// Cover date, when the catalog carries one
    pub cover_date: Option<NaiveDate>,

    /// Store date, when the catalog carries one
    pub store_date: Option<NaiveDate>,

    /// Issue description (may contain markup from the catalog)
    pub description: String,

    /// Canonical cover image URL
    pub image_url: String,

    /// Characters appearing in the issue
    pub characters: Vec<String>,

    /// Teams appearing in the issue
    pub teams: Vec<String>,

    /// Locations appearing in the issue
    pub locations: Vec<String>,

    /// Story arcs the issue belongs to
    pub stories: Vec<String>,

    /// Creator credits
    pub credits: Vec<CreditMetadata>,
}

/// One creator credit: a name and a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditMetadata {
    pub name: String,
    pub role: String,
}

/// A story arc candidate from a story search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryMetadata {
    /// Catalog identifier for the story arc
    pub reference_id: String,

    /// Story arc name
    pub name: String,

    /// Publisher display name
    pub publisher: String,

    /// Canonical image URL
    pub image_url: String,
}

/// The full detail record for a story arc, including its resolved issues.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryDetailMetadata {
    /// Catalog identifier for the story arc
    pub reference_id: String,

    /// Story arc name
    pub name: String,

    /// Publisher display name
    pub publisher: String,

    /// Story description (may contain markup from the catalog)
    pub description: String,

    /// Issues making up the story, in reading order
    pub issues: Vec<StoryIssueMetadata>,
}

/// One issue within a story arc.
///
/// `reading_order` is 1-based and assigned strictly by the issue's position in
/// the story's reference list, independent of anything the issue's own detail
/// record says.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryIssueMetadata {
    /// 1-based position within the story
    pub reading_order: usize,

    /// Series name
    pub name: String,

    /// Volume label (the start year of the run)
    pub volume: String,

    /// Issue number within the series
    pub issue_number: String,

    /// Cover date, when the catalog carries one
    pub cover_date: Option<NaiveDate>,
}
