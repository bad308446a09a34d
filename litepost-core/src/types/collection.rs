use chrono::{DateTime, Utc};

use crate::types::{new_id, Request, StringMap};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Collection {
    #[serde(default = "new_id")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub requests: Vec<Request>,

    #[serde(default)]
    pub folders: Vec<Folder>,

    #[serde(default)]
    pub variables: StringMap,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Folder {
    #[serde(default = "new_id")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub requests: Vec<Request>,

    #[serde(default)]
    pub folders: Vec<Folder>,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: name.into(),
            description: String::new(),
            requests: Vec::new(),
            folders: Vec::new(),
            variables: StringMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn summary(&self) -> CollectionSummary {
        CollectionSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            request_count: self.requests.len()
                + self.folders.iter().map(Folder::request_count).sum::<usize>(),
            folder_count: self.folders.iter().map(Folder::folder_count).sum(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Folder {
    fn request_count(&self) -> usize {
        self.requests.len() + self.folders.iter().map(Folder::request_count).sum::<usize>()
    }

    fn folder_count(&self) -> usize {
        1 + self.folders.iter().map(Folder::folder_count).sum::<usize>()
    }
}

/// Counts over a collection, including nested folders.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CollectionSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub request_count: usize,
    pub folder_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
