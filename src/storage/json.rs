//! JSON file backend
//!
//! Files are pretty-printed UTF-8 with non-ASCII text written verbatim.
//! Writes go to a sibling temporary file that is then renamed over the
//! target, so a reader never sees a half-written file.

use crate::storage::{DocumentStore, LinkGraph, Storage, StorageError, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Stores pages and graph as two JSON files
#[derive(Debug, Clone)]
pub struct JsonStorage {
    pages_path: PathBuf,
    graph_path: PathBuf,
}

impl JsonStorage {
    pub fn new(pages_path: impl Into<PathBuf>, graph_path: impl Into<PathBuf>) -> Self {
        Self {
            pages_path: pages_path.into(),
            graph_path: graph_path.into(),
        }
    }

    pub fn pages_path(&self) -> &Path {
        &self.pages_path
    }

    pub fn graph_path(&self) -> &Path {
        &self.graph_path
    }
}

impl Storage for JsonStorage {
    fn save_pages(&self, pages: &DocumentStore) -> StorageResult<()> {
        write_json(&self.pages_path, pages)
    }

    fn save_graph(&self, graph: &LinkGraph) -> StorageResult<()> {
        write_json(&self.graph_path, graph)
    }

    fn load_pages(&self) -> StorageResult<DocumentStore> {
        read_json(&self.pages_path)
    }

    fn load_graph(&self) -> StorageResult<LinkGraph> {
        read_json(&self.graph_path)
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> StorageResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let file = File::create(&tmp_path).map_err(io_error(&tmp_path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| {
        StorageError::Serialization {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(io_error(&tmp_path))?;
    drop(writer);

    fs::rename(&tmp_path, path).map_err(io_error(path))?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> StorageResult<T> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StorageError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(io_error(path)(e)),
    };

    serde_json::from_reader(BufReader::new(file)).map_err(|source| StorageError::Serialization {
        path: path.to_path_buf(),
        source,
    })
}
