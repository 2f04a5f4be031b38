//! Content store session over SQLite.
//!
//! # Responsibility
//! - Load the persisted content tree into staged in-memory nodes.
//! - Resolve absolute paths to nodes.
//! - Durably commit all staged mutations in one transaction on `save`.
//!
//! # Invariants
//! - The connection must be fully migrated before a session opens.
//! - Staged mutations are lost unless `save` completes; `save` is
//!   all-or-nothing within one SQLite transaction.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::value::PropertyValue;
use crate::repo::node::{Node, NodeId};
use log::info;
use rusqlite::{params, Connection, Transaction};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

/// Result type used by content store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from content store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Persisted data cannot be converted to a valid node tree.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "content store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "content store requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid content tree data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Staged view of the content tree bound to one SQLite connection.
#[derive(Debug)]
pub struct ContentSession {
    conn: Connection,
    root: Node,
}

impl ContentSession {
    /// Opens a session on a migrated connection and loads the stored tree.
    ///
    /// An empty store yields a fresh root node that first persists on `save`.
    pub fn open(conn: Connection) -> StoreResult<Self> {
        ensure_store_connection_ready(&conn)?;
        let root = load_tree(&conn)?.unwrap_or_else(|| Node::new(""));
        info!("event=session_open module=repo status=ok root={}", root.id());
        Ok(Self { conn, root })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Resolves an absolute slash-separated path (`/`, `/articles/intro`).
    pub fn node(&self, path: &str) -> Option<&Node> {
        let mut current = &self.root;
        for segment in path_segments(path) {
            current = current.child(segment)?;
        }
        Some(current)
    }

    /// Mutable variant of [`ContentSession::node`].
    pub fn node_mut(&mut self, path: &str) -> Option<&mut Node> {
        let mut current = &mut self.root;
        for segment in path_segments(path) {
            current = current.child_mut(segment)?;
        }
        Some(current)
    }

    /// Durably commits every staged mutation in one transaction.
    ///
    /// # Side effects
    /// - Rewrites the stored tree to match the staged state.
    /// - Emits a `session_save` logging event with node count and duration.
    pub fn save(&mut self) -> StoreResult<()> {
        let started_at = Instant::now();
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM node_properties;", [])?;
        tx.execute("DELETE FROM nodes;", [])?;
        let mut node_count = 0usize;
        persist_subtree(&tx, &self.root, None, &mut node_count)?;
        tx.commit()?;
        info!(
            "event=session_save module=repo status=ok nodes={node_count} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn persist_subtree(
    tx: &Transaction<'_>,
    node: &Node,
    parent: Option<NodeId>,
    node_count: &mut usize,
) -> StoreResult<()> {
    tx.execute(
        "INSERT INTO nodes (node_uuid, parent_uuid, name) VALUES (?1, ?2, ?3);",
        params![
            node.id().to_string(),
            parent.map(|id| id.to_string()),
            node.name(),
        ],
    )?;
    *node_count += 1;

    for (name, value) in node.properties() {
        match value {
            PropertyValue::Scalar(item) => {
                tx.execute(
                    "INSERT INTO node_properties (node_uuid, prop_name, item_index, item_value, is_multi)
                     VALUES (?1, ?2, 0, ?3, 0);",
                    params![node.id().to_string(), name, item],
                )?;
            }
            PropertyValue::Multi(items) if items.is_empty() => {
                // One NULL-valued row marks an empty list so the property
                // itself survives a reload.
                tx.execute(
                    "INSERT INTO node_properties (node_uuid, prop_name, item_index, item_value, is_multi)
                     VALUES (?1, ?2, 0, NULL, 1);",
                    params![node.id().to_string(), name],
                )?;
            }
            PropertyValue::Multi(items) => {
                for (index, item) in items.iter().enumerate() {
                    tx.execute(
                        "INSERT INTO node_properties (node_uuid, prop_name, item_index, item_value, is_multi)
                         VALUES (?1, ?2, ?3, ?4, 1);",
                        params![node.id().to_string(), name, index as i64, item],
                    )?;
                }
            }
        }
    }

    for child in node.children() {
        persist_subtree(tx, child, Some(node.id()), node_count)?;
    }

    Ok(())
}

struct NodeRecord {
    name: String,
}

fn load_tree(conn: &Connection) -> StoreResult<Option<Node>> {
    let mut records: HashMap<NodeId, NodeRecord> = HashMap::new();
    let mut children_of: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    let mut root: Option<NodeId> = None;

    let mut stmt = conn.prepare(
        "SELECT node_uuid, parent_uuid, name
         FROM nodes
         ORDER BY name ASC;",
    )?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let uuid_text: String = row.get(0)?;
        let node_uuid = parse_uuid(&uuid_text, "nodes.node_uuid")?;
        let parent = row
            .get::<_, Option<String>>(1)?
            .map(|value| parse_uuid(&value, "nodes.parent_uuid"))
            .transpose()?;

        match parent {
            Some(parent_uuid) => children_of.entry(parent_uuid).or_default().push(node_uuid),
            None => {
                if root.replace(node_uuid).is_some() {
                    return Err(StoreError::InvalidData(
                        "multiple root nodes in nodes table".to_string(),
                    ));
                }
            }
        }
        records.insert(node_uuid, NodeRecord { name: row.get(2)? });
    }

    let Some(root_uuid) = root else {
        if records.is_empty() {
            return Ok(None);
        }
        return Err(StoreError::InvalidData(
            "nodes table has rows but no root node".to_string(),
        ));
    };

    let mut properties = load_properties(conn)?;
    let root_node = assemble_node(root_uuid, &records, &children_of, &mut properties)?;
    Ok(Some(root_node))
}

type RawProperties = HashMap<NodeId, Vec<(String, bool, Option<String>)>>;

fn load_properties(conn: &Connection) -> StoreResult<RawProperties> {
    let mut properties: RawProperties = HashMap::new();
    let mut stmt = conn.prepare(
        "SELECT node_uuid, prop_name, item_value, is_multi
         FROM node_properties
         ORDER BY node_uuid ASC, prop_name ASC, item_index ASC;",
    )?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let uuid_text: String = row.get(0)?;
        let node_uuid = parse_uuid(&uuid_text, "node_properties.node_uuid")?;
        let prop_name: String = row.get(1)?;
        let item_value: Option<String> = row.get(2)?;
        let is_multi = row.get::<_, i64>(3)? != 0;
        properties
            .entry(node_uuid)
            .or_default()
            .push((prop_name, is_multi, item_value));
    }
    Ok(properties)
}

fn assemble_node(
    node_uuid: NodeId,
    records: &HashMap<NodeId, NodeRecord>,
    children_of: &HashMap<NodeId, Vec<NodeId>>,
    properties: &mut RawProperties,
) -> StoreResult<Node> {
    let record = records.get(&node_uuid).ok_or_else(|| {
        StoreError::InvalidData(format!("dangling parent reference to {node_uuid}"))
    })?;

    let mut node = Node::with_id(node_uuid, record.name.clone());
    for (prop_name, value) in collect_properties(node_uuid, properties)? {
        node.set_property(prop_name, value);
    }

    if let Some(child_ids) = children_of.get(&node_uuid) {
        for child_uuid in child_ids {
            let child = assemble_node(*child_uuid, records, children_of, properties)?;
            node.attach_child(child);
        }
    }

    Ok(node)
}

fn collect_properties(
    node_uuid: NodeId,
    properties: &mut RawProperties,
) -> StoreResult<Vec<(String, PropertyValue)>> {
    let Some(rows) = properties.remove(&node_uuid) else {
        return Ok(Vec::new());
    };

    let mut collected: Vec<(String, PropertyValue)> = Vec::new();
    for (prop_name, is_multi, item_value) in rows {
        match collected.last_mut() {
            Some((current_name, PropertyValue::Multi(items))) if *current_name == prop_name => {
                match item_value {
                    Some(value) => items.push(value),
                    None => {
                        return Err(StoreError::InvalidData(format!(
                            "NULL item inside non-empty list property `{prop_name}`"
                        )))
                    }
                }
            }
            Some((current_name, PropertyValue::Scalar(_))) if *current_name == prop_name => {
                return Err(StoreError::InvalidData(format!(
                    "scalar property `{prop_name}` has multiple stored items"
                )));
            }
            _ => {
                let value = match (is_multi, item_value) {
                    (true, Some(value)) => PropertyValue::Multi(vec![value]),
                    (true, None) => PropertyValue::Multi(Vec::new()),
                    (false, Some(value)) => PropertyValue::Scalar(value),
                    (false, None) => {
                        return Err(StoreError::InvalidData(format!(
                            "scalar property `{prop_name}` has NULL value"
                        )));
                    }
                };
                collected.push((prop_name, value));
            }
        }
    }
    Ok(collected)
}

fn parse_uuid(value: &str, column: &'static str) -> StoreResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| StoreError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn ensure_store_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["nodes", "node_properties"] {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(StoreError::MissingRequiredTable(table));
        }
    }

    Ok(())
}
