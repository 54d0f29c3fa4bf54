//! Mail folder types
//!
//! Provides a strongly-typed reference to a Graph mail folder instead
//! of raw strings. Well-known folder names like `inbox` and
//! `sentitems` have dedicated variants. Folders discovered while
//! walking are addressed by their opaque id through the `Id` variant.

use serde::Deserialize;
use std::fmt;

/// A reference to a mailbox folder, usable in a request path.
///
/// Well-known folders map to the names Graph accepts in place of an
/// id. Every other folder is addressed by its opaque id.
///
/// # Examples
///
/// ```
/// use graph_mail_bench::FolderRef;
///
/// let inbox = FolderRef::from("Inbox");
/// assert_eq!(inbox, FolderRef::Inbox);
/// assert_eq!(inbox.as_str(), "inbox");
///
/// let other = FolderRef::id("AAMkAGI2TAAA=");
/// assert_eq!(other.as_str(), "AAMkAGI2TAAA=");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FolderRef {
    /// The inbox.
    Inbox,
    /// Archived messages.
    Archive,
    /// Deleted messages.
    DeletedItems,
    /// Draft messages.
    Drafts,
    /// Junk email.
    JunkEmail,
    /// Sent messages.
    SentItems,
    /// Messages waiting to be sent.
    Outbox,
    /// Any folder addressed by its opaque id.
    Id(String),
}

impl FolderRef {
    /// Reference a folder by its opaque id.
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// The path segment used for this folder.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Inbox => "inbox",
            Self::Archive => "archive",
            Self::DeletedItems => "deleteditems",
            Self::Drafts => "drafts",
            Self::JunkEmail => "junkemail",
            Self::SentItems => "sentitems",
            Self::Outbox => "outbox",
            Self::Id(id) => id,
        }
    }
}

impl fmt::Display for FolderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for FolderRef {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "inbox" => Self::Inbox,
            "archive" => Self::Archive,
            "deleteditems" => Self::DeletedItems,
            "drafts" => Self::Drafts,
            "junkemail" => Self::JunkEmail,
            "sentitems" => Self::SentItems,
            "outbox" => Self::Outbox,
            _ => Self::Id(s.to_string()),
        }
    }
}

impl From<String> for FolderRef {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

/// One entry of a `childFolders` listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailFolder {
    pub id: String,
    pub display_name: String,
    /// Opaque id of the folder that was listed.
    #[serde(default)]
    pub parent_folder_id: Option<String>,
}
