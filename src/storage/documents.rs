//! Document store
//!
//! Holds one [`Document`] per successfully fetched URL, in the order pages
//! were recorded. That order is the row order of the term matrix and the
//! tie-break order of ranking, so it is preserved through persistence.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Extracted content of one fetched page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub url: String,
    pub title: String,
    pub text: String,
}

impl Document {
    pub fn new(url: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            text: text.into(),
        }
    }

    /// Title for display, falling back to the URL when empty
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.url
        } else {
            &self.title
        }
    }
}

/// Persisted value shape: `{"title": "...", "text": "..."}`
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredPage {
    #[serde(default)]
    title: String,
    #[serde(default)]
    text: String,
}

/// Insertion-ordered mapping of URL to [`Document`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentStore {
    docs: Vec<Document>,
    index: HashMap<String, usize>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a document
    ///
    /// A second insert for the same URL replaces the earlier document in
    /// place (last write wins) and keeps its original position.
    pub fn insert(&mut self, doc: Document) {
        match self.index.get(&doc.url) {
            Some(&i) => self.docs[i] = doc,
            None => {
                self.index.insert(doc.url.clone(), self.docs.len());
                self.docs.push(doc);
            }
        }
    }

    pub fn get(&self, url: &str) -> Option<&Document> {
        self.index.get(url).map(|&i| &self.docs[i])
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    /// Position of a URL in insertion order
    pub fn position(&self, url: &str) -> Option<usize> {
        self.index.get(url).copied()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.docs.iter()
    }

    pub fn documents(&self) -> &[Document] {
        &self.docs
    }
}

impl Serialize for DocumentStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.docs.len()))?;
        for doc in &self.docs {
            map.serialize_entry(
                &doc.url,
                &StoredPage {
                    title: doc.title.clone(),
                    text: doc.text.clone(),
                },
            )?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DocumentStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StoreVisitor;

        impl<'de> Visitor<'de> for StoreVisitor {
            type Value = DocumentStore;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of URL to {title, text}")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut store = DocumentStore::new();
                while let Some((url, page)) = access.next_entry::<String, StoredPage>()? {
                    store.insert(Document {
                        url,
                        title: page.title,
                        text: page.text,
                    });
                }
                Ok(store)
            }
        }

        deserializer.deserialize_map(StoreVisitor)
    }
}
