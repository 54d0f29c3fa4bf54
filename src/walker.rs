//! Depth-first mailbox traversal
//!
//! Visits every folder below a root in pre-order. Each folder's
//! messages are listed page by page through the delta endpoint and
//! every message is fetched in full, attachments included, before any
//! child folder is entered.
//!
//! The walk keeps an explicit work stack rather than recursing, and
//! remembers every folder id it has entered so a cyclic folder graph
//! cannot loop forever.

use crate::client::ApiClient;
use crate::error::Result;
use crate::folder::{FolderRef, MailFolder};
use crate::page::{MessageRef, Page};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};

/// Progress reported while walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit<'a> {
    /// A folder is about to be processed.
    Folder {
        id: &'a str,
        name: &'a str,
        depth: usize,
    },
    /// A message has been fetched.
    Message { id: &'a str },
}

impl fmt::Display for Visit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Folder { name, .. } => write!(f, "working on folder {name}"),
            Self::Message { id } => write!(f, "loaded message {id}"),
        }
    }
}

/// Counters collected over one walk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkStats {
    pub folders: usize,
    pub pages: usize,
    pub messages: usize,
    pub skipped_folders: usize,
}

struct Pending {
    folder: FolderRef,
    name: String,
    depth: usize,
}

/// Walks one user's mailbox through an [`ApiClient`].
pub struct Walker<'a, C: ApiClient + ?Sized> {
    client: &'a C,
    user_id: String,
}

impl<'a, C: ApiClient + ?Sized> Walker<'a, C> {
    #[must_use]
    pub fn new(client: &'a C, user_id: impl Into<String>) -> Self {
        Self {
            client,
            user_id: user_id.into(),
        }
    }

    /// Walk the subtree rooted at `root`, calling `on_visit` as each
    /// folder is entered and each message is fetched.
    ///
    /// # Errors
    ///
    /// The first client or decoding error stops the walk and is
    /// returned; nothing after it is visited.
    pub async fn walk<F>(&self, root: &FolderRef, mut on_visit: F) -> Result<WalkStats>
    where
        F: FnMut(Visit<'_>),
    {
        let mut stats = WalkStats::default();
        let mut visited: HashSet<String> = HashSet::new();
        let mut stack = vec![Pending {
            folder: root.clone(),
            name: root.to_string(),
            depth: 0,
        }];

        while let Some(current) = stack.pop() {
            if !visited.insert(current.folder.as_str().to_string()) {
                warn!(
                    "Folder {} ({}) already visited, skipping",
                    current.name, current.folder
                );
                stats.skipped_folders += 1;
                continue;
            }

            on_visit(Visit::Folder {
                id: current.folder.as_str(),
                name: &current.name,
                depth: current.depth,
            });
            stats.folders += 1;

            self.visit_messages(&current.folder, &mut on_visit, &mut stats)
                .await?;

            let children = self.list_child_folders(&current.folder).await?;
            debug!("{} has {} child folders", current.name, children.len());

            // A well-known root is only known by its alias until its
            // children name its opaque id.
            visited.extend(children.iter().filter_map(|c| c.parent_folder_id.clone()));

            // Reversed so the first child is popped first.
            stack.extend(children.into_iter().rev().map(|child| Pending {
                folder: FolderRef::Id(child.id),
                name: child.display_name,
                depth: current.depth + 1,
            }));
        }

        info!(
            "Walked {} folders, {} pages, {} messages",
            stats.folders, stats.pages, stats.messages
        );
        Ok(stats)
    }

    /// List the immediate children of `folder` in a single request.
    ///
    /// # Errors
    ///
    /// Propagates request failures and malformed listings.
    pub async fn list_child_folders(&self, folder: &FolderRef) -> Result<Vec<MailFolder>> {
        let path = format!(
            "/users/{}/mailFolders/{}/childFolders",
            self.user_id, folder
        );
        let body = self.client.get(&path).await?;
        Ok(Page::<MailFolder>::from_json(body, &path)?.value)
    }

    /// Fetch one message with its attachments and drop the result.
    ///
    /// # Errors
    ///
    /// Propagates request failures.
    pub async fn fetch_message(&self, message_id: &str) -> Result<()> {
        let path = format!(
            "/users/{}/messages/{}?$expand=attachments",
            self.user_id, message_id
        );
        self.client.get(&path).await?;
        Ok(())
    }

    async fn visit_messages<F>(
        &self,
        folder: &FolderRef,
        on_visit: &mut F,
        stats: &mut WalkStats,
    ) -> Result<()>
    where
        F: FnMut(Visit<'_>),
    {
        let mut path = format!(
            "/users/{}/mailFolders/{}/messages/delta?$select=id",
            self.user_id, folder
        );

        loop {
            let body = self.client.get(&path).await?;
            let page = Page::<MessageRef>::from_json(body, &path)?;
            stats.pages += 1;

            for message in &page.value {
                self.fetch_message(&message.id).await?;
                stats.messages += 1;
                on_visit(Visit::Message { id: &message.id });
            }

            match page.next_path(self.client.service_root()) {
                Some(next) => path = next.to_string(),
                None => return Ok(()),
            }
        }
    }
}
