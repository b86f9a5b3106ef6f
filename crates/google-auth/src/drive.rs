//! Drive v2 file-listing payload types
//!
//! Only the fields the gate renders are modeled; everything else in the
//! provider response is ignored on deserialization.

use serde::Deserialize;

/// A page of Drive files as returned by the files endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct FileList {
    #[serde(default)]
    pub items: Vec<DriveFile>,
}

/// One file entry.
#[derive(Debug, Deserialize)]
pub struct DriveFile {
    pub title: String,
    #[serde(rename = "iconLink", default)]
    pub icon_link: String,
    #[serde(rename = "alternateLink", default)]
    pub alternate_link: String,
    #[serde(default)]
    pub owners: Vec<FileOwner>,
}

#[derive(Debug, Deserialize)]
pub struct FileOwner {
    #[serde(rename = "displayName", default)]
    pub display_name: String,
}

/// The Drive query clause for a title substring search.
pub(crate) fn title_filter(query: &str) -> String {
    format!("title contains '{query}'")
}
