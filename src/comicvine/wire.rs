//! Raw ComicVine wire types.
//!
//! Only the subset of fields the mappers read is declared; everything else in
//! the upstream payload is ignored. All fields are optional at this layer:
//! deciding which absences are fatal is the mappers' job.

use std::collections::HashMap;

use serde::Deserialize;

/// A keyed map of image size name to URL (`original_url`, `thumb_url`, ...).
pub type CvImageMap = HashMap<String, Option<String>>;

#[derive(Debug, Deserialize)]
pub struct CvPublisher {
    pub name: Option<String>,
}

/// A lightweight pointer to another record: identifier plus display name.
#[derive(Debug, Deserialize)]
pub struct CvNamedRef {
    pub id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CvCredit {
    pub name: Option<String>,
    pub role: Option<String>,
}

/// A volume record, from either a search page or a detail fetch.
#[derive(Debug, Deserialize)]
pub struct CvVolume {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub start_year: Option<String>,
    pub count_of_issues: Option<u32>,
    pub publisher: Option<CvPublisher>,
    pub image: Option<CvImageMap>,
    pub api_detail_url: Option<String>,
}

/// The volume stub embedded in an issue record.
#[derive(Debug, Deserialize)]
pub struct CvVolumeStub {
    pub name: Option<String>,
    pub api_detail_url: Option<String>,
}

/// An issue record, from either a search page or a detail fetch.
#[derive(Debug, Deserialize)]
pub struct CvIssue {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub issue_number: Option<String>,
    pub cover_date: Option<String>,
    pub store_date: Option<String>,
    pub description: Option<String>,
    pub image: Option<CvImageMap>,
    pub volume: Option<CvVolumeStub>,
    pub character_credits: Option<Vec<CvNamedRef>>,
    pub team_credits: Option<Vec<CvNamedRef>>,
    pub location_credits: Option<Vec<CvNamedRef>>,
    pub story_arc_credits: Option<Vec<CvNamedRef>>,
    pub person_credits: Option<Vec<CvCredit>>,
}

/// A story arc entry from a story search page.
#[derive(Debug, Deserialize)]
pub struct CvStory {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub publisher: Option<CvPublisher>,
    pub image: Option<CvImageMap>,
}

/// The detail record for a story arc, embedding its issue references.
#[derive(Debug, Deserialize)]
pub struct CvStoryDetail {
    pub name: Option<String>,
    pub publisher: Option<CvPublisher>,
    pub description: Option<String>,
    pub issues: Option<Vec<CvNamedRef>>,
}
