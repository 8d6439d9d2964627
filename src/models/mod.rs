//! Flat domain records produced by a harvest.

mod metadata;

pub use metadata::{
    CreditMetadata, IssueDetailsMetadata, IssueMetadata, StoryDetailMetadata, StoryIssueMetadata,
    StoryMetadata, VolumeMetadata,
};
