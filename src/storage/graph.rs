//! Directed link graph
//!
//! Nodes are canonical URLs, including targets that were never fetched.
//! Parallel edges collapse into one; self-loops are kept. Node order is
//! insertion order and survives a save/load cycle.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkGraph {
    nodes: Vec<String>,
    index: HashMap<String, usize>,
    successors: Vec<Vec<usize>>,
}

impl LinkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node if absent and returns its index
    pub fn add_node(&mut self, url: &str) -> usize {
        if let Some(&i) = self.index.get(url) {
            return i;
        }
        let i = self.nodes.len();
        self.nodes.push(url.to_string());
        self.index.insert(url.to_string(), i);
        self.successors.push(Vec::new());
        i
    }

    /// Adds the edge `from -> to`, creating both nodes as needed
    ///
    /// Returns false if the edge already existed.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        let from = self.add_node(from);
        let to = self.add_node(to);
        let out = &mut self.successors[from];
        if out.contains(&to) {
            false
        } else {
            out.push(to);
            true
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    pub fn index_of(&self, url: &str) -> Option<usize> {
        self.index.get(url).copied()
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Successor indices of node `i`
    pub fn successors_of(&self, i: usize) -> &[usize] {
        self.successors.get(i).map_or(&[][..], Vec::as_slice)
    }

    /// Successor URLs of a node, empty for unknown URLs
    pub fn successors(&self, url: &str) -> Vec<&str> {
        self.index_of(url)
            .map(|i| {
                self.successors_of(i)
                    .iter()
                    .map(|&j| self.nodes[j].as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn out_degree(&self, i: usize) -> usize {
        self.successors_of(i).len()
    }
}

impl Serialize for LinkGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.nodes.len()))?;
        for (i, node) in self.nodes.iter().enumerate() {
            let targets: Vec<&str> = self.successors[i]
                .iter()
                .map(|&j| self.nodes[j].as_str())
                .collect();
            map.serialize_entry(node, &targets)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LinkGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GraphVisitor;

        impl<'de> Visitor<'de> for GraphVisitor {
            type Value = LinkGraph;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of URL to a list of target URLs")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, Vec<String>)> = Vec::new();
                while let Some(entry) = access.next_entry::<String, Vec<String>>()? {
                    entries.push(entry);
                }

                // Keys first so node order matches the file; targets that
                // are not keys follow
                let mut graph = LinkGraph::new();
                for (source, _) in &entries {
                    graph.add_node(source);
                }
                for (source, targets) in &entries {
                    for target in targets {
                        graph.add_edge(source, target);
                    }
                }
                Ok(graph)
            }
        }

        deserializer.deserialize_map(GraphVisitor)
    }
}
