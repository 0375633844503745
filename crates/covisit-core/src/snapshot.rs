//! Binary snapshot codec
//!
//! Full dump of the graph to a self-contained little-endian byte layout:
//!
//! ```text
//! [u64 n_categories]  n * ([i32 item] [i32 category])
//! [u64 n_users]       n * ([i32 user] [u64 n_edges] m * ([i32 item] [i64 ts]))
//! [u64 n_items]       n * ([i32 item] [u64 n_edges] m * ([i32 user] [i64 ts]))
//! ```
//!
//! Lengths are fixed at 64 bits so snapshots are portable across hosts.
//! Map iteration order is not part of the format; loaders must not depend
//! on it. The decoder rejects any declared length that exceeds the
//! remaining bytes, and rejects trailing bytes after the final section.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, Result};
use crate::graph::InteractionGraph;
use crate::types::{CategoryId, ItemId, Timestamp, UserId};

/// Bytes per `(id, id)` category entry.
const CATEGORY_ENTRY_SIZE: usize = 8;
/// Bytes per `(id, timestamp)` adjacency edge.
const EDGE_ENTRY_SIZE: usize = 12;
/// Minimum bytes per adjacency record: key plus edge-count header.
const ADJ_HEADER_SIZE: usize = 12;

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Serialize the full graph state into a byte buffer.
pub fn encode(graph: &InteractionGraph) -> Vec<u8> {
    let mut buf = Vec::new();

    let categories: Vec<(ItemId, CategoryId)> = graph.categories().collect();
    buf.extend_from_slice(&(categories.len() as u64).to_le_bytes());
    for (item, category) in categories {
        buf.extend_from_slice(&item.to_le_bytes());
        buf.extend_from_slice(&category.to_le_bytes());
    }

    buf.extend_from_slice(&(graph.user_count() as u64).to_le_bytes());
    for (user, edges) in graph.users() {
        buf.extend_from_slice(&user.to_le_bytes());
        buf.extend_from_slice(&(edges.len() as u64).to_le_bytes());
        for &(item, ts) in edges {
            buf.extend_from_slice(&item.to_le_bytes());
            buf.extend_from_slice(&ts.to_le_bytes());
        }
    }

    buf.extend_from_slice(&(graph.item_count() as u64).to_le_bytes());
    for (item, edges) in graph.items() {
        buf.extend_from_slice(&item.to_le_bytes());
        buf.extend_from_slice(&(edges.len() as u64).to_le_bytes());
        for &(user, ts) in edges {
            buf.extend_from_slice(&user.to_le_bytes());
            buf.extend_from_slice(&ts.to_le_bytes());
        }
    }

    buf
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Cursor over the snapshot bytes with bounds-checked primitive reads.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(EngineError::malformed(format!(
                "{what} truncated at byte {}",
                self.pos
            )));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_i32(&mut self, what: &str) -> Result<i32> {
        let bytes = self.take(4, what)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_i64(&mut self, what: &str) -> Result<i64> {
        let bytes = self.take(8, what)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(i64::from_le_bytes(raw))
    }

    /// Read a section length and reject counts that cannot fit in the
    /// remaining bytes at `entry_size` each.
    fn read_len(&mut self, entry_size: usize, what: &str) -> Result<usize> {
        let bytes = self.take(8, what)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        let declared = u64::from_le_bytes(raw);

        let fits = usize::try_from(declared)
            .ok()
            .and_then(|n| n.checked_mul(entry_size))
            .map(|total| total <= self.remaining())
            .unwrap_or(false);
        if !fits && declared != 0 {
            return Err(EngineError::malformed(format!(
                "{what} declares {declared} entries but only {} bytes remain",
                self.remaining()
            )));
        }
        Ok(declared as usize)
    }
}

fn decode_adjacency(
    reader: &mut Reader<'_>,
    section: &str,
) -> Result<HashMap<i32, Vec<(i32, Timestamp)>>> {
    let n_keys = reader.read_len(ADJ_HEADER_SIZE, section)?;
    let mut map: HashMap<i32, Vec<(i32, Timestamp)>> = HashMap::with_capacity(n_keys);
    for _ in 0..n_keys {
        let key = reader.read_i32(section)?;
        let n_edges = reader.read_len(EDGE_ENTRY_SIZE, section)?;
        let mut edges = Vec::with_capacity(n_edges);
        for _ in 0..n_edges {
            let id = reader.read_i32(section)?;
            let ts = reader.read_i64(section)?;
            edges.push((id, ts));
        }
        map.insert(key, edges);
    }
    Ok(map)
}

/// Rebuild a graph from snapshot bytes.
///
/// Consumes the whole buffer: premature EOF and trailing bytes both fail
/// with [`EngineError::MalformedSnapshot`].
pub fn decode(data: &[u8]) -> Result<InteractionGraph> {
    let mut reader = Reader::new(data);

    let n_categories = reader.read_len(CATEGORY_ENTRY_SIZE, "category section")?;
    let mut item_category: HashMap<ItemId, CategoryId> = HashMap::with_capacity(n_categories);
    for _ in 0..n_categories {
        let item = reader.read_i32("category entry")?;
        let category = reader.read_i32("category entry")?;
        item_category.insert(item, category);
    }

    let user_items: HashMap<UserId, Vec<(ItemId, Timestamp)>> =
        decode_adjacency(&mut reader, "user section")?;
    let item_users: HashMap<ItemId, Vec<(UserId, Timestamp)>> =
        decode_adjacency(&mut reader, "item section")?;

    if reader.remaining() != 0 {
        return Err(EngineError::malformed(format!(
            "{} trailing bytes after item section",
            reader.remaining()
        )));
    }

    Ok(InteractionGraph::from_parts(
        item_category,
        user_items,
        item_users,
    ))
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

/// Write the full graph state to `path`.
///
/// Not crash-atomic: an I/O error mid-write may leave a truncated file.
/// Callers needing atomicity write to a temporary path and rename.
pub fn save<P: AsRef<Path>>(graph: &InteractionGraph, path: P) -> Result<()> {
    let bytes = encode(graph);
    fs::write(path.as_ref(), &bytes)?;
    debug!(
        target: "covisit_core::snapshot",
        bytes = bytes.len(),
        users = graph.user_count(),
        items = graph.item_count(),
        edges = graph.edge_count(),
        "snapshot written",
    );
    Ok(())
}

/// Read a graph back from a snapshot file written by [`save`].
pub fn load<P: AsRef<Path>>(path: P) -> Result<InteractionGraph> {
    let data = fs::read(path.as_ref())?;
    let graph = decode(&data)?;
    debug!(
        target: "covisit_core::snapshot",
        bytes = data.len(),
        users = graph.user_count(),
        items = graph.item_count(),
        edges = graph.edge_count(),
        "snapshot loaded",
    );
    Ok(graph)
}
