//! Scout state store: immutable, index-stamped snapshots of the cluster's
//! resource collections, swapped atomically on every applied batch.
//!
//! Readers take an `Arc<StateSnapshot>` and iterate it without locks; writers
//! serialize through [`StateStore::apply`], which publishes the next snapshot
//! and the new replicated-log index to subscribers.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use rustc_hash::FxHashMap;
use scout_core::{Resource, DEFAULT_NAMESPACE};
use tokio::sync::watch;
use tracing::debug;

mod error;
mod prefix;
mod table;

pub use error::StoreError;
pub use prefix::uuid_prefix;
pub use table::Table;

/// Records in identifier order.
pub type ResourceIter<'a> = Box<dyn Iterator<Item = &'a Resource> + 'a>;

/// Read side of the store as seen by queries.
pub trait StateReader: Send + Sync {
    /// Records of `table` whose identifier starts with `prefix`, in identifier
    /// order. `namespace` scopes namespaced tables and is ignored otherwise.
    fn by_prefix<'a>(
        &'a self,
        table: Table,
        namespace: &str,
        prefix: &str,
    ) -> Result<ResourceIter<'a>, StoreError>;

    /// Last log index that modified the collection named `key`; 0 if it was
    /// never written.
    fn index(&self, key: &str) -> Result<u64, StoreError>;
}

/// `(namespace, id)`; cluster-scoped tables use an empty namespace.
type Key = (String, String);
type Rows = BTreeMap<Key, Resource>;

#[derive(Debug, Clone)]
pub enum Mutation {
    Upsert(Resource),
    Delete { table: Table, namespace: String, id: String },
}

/// Point-in-time view of every table. Tables are shared between snapshots
/// until a batch touches them.
#[derive(Debug, Clone, Default)]
pub struct StateSnapshot {
    tables: FxHashMap<Table, Arc<Rows>>,
    indexes: FxHashMap<Table, u64>,
    latest: u64,
}

fn row_namespace(table: Table, namespace: &str) -> &str {
    if !table.namespaced() {
        ""
    } else if namespace.is_empty() {
        DEFAULT_NAMESPACE
    } else {
        namespace
    }
}

impl StateSnapshot {
    /// Highest index applied to any table.
    pub fn latest_index(&self) -> u64 {
        self.latest
    }

    pub fn table_index(&self, table: Table) -> u64 {
        self.indexes.get(&table).copied().unwrap_or(0)
    }

    pub fn len(&self, table: Table) -> usize {
        self.tables.get(&table).map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn get(&self, table: Table, namespace: &str, id: &str) -> Option<&Resource> {
        let key = (row_namespace(table, namespace).to_string(), id.to_string());
        self.tables.get(&table)?.get(&key)
    }

    /// Build the snapshot that results from applying `batch` at `index`.
    pub fn apply(&self, index: u64, batch: Vec<Mutation>) -> Result<StateSnapshot, StoreError> {
        if index <= self.latest {
            return Err(StoreError::StaleIndex { index, current: self.latest });
        }
        let mut next = self.clone();
        for m in batch {
            match m {
                Mutation::Upsert(res) => {
                    let table = Table::of(&res)
                        .ok_or_else(|| StoreError::Unsupported(res.kind().to_string()))?;
                    let id = res.id().unwrap_or_default().to_string();
                    if table.uuid_keyed() {
                        check_uuid(table, &id)?;
                    }
                    let ns = row_namespace(table, res.namespace().unwrap_or_default()).to_string();
                    let rows = next.tables.entry(table).or_default();
                    Arc::make_mut(rows).insert((ns, id), res);
                    next.indexes.insert(table, index);
                }
                Mutation::Delete { table, namespace, id } => {
                    let key = (row_namespace(table, &namespace).to_string(), id);
                    if let Some(rows) = next.tables.get_mut(&table) {
                        if Arc::make_mut(rows).remove(&key).is_some() {
                            next.indexes.insert(table, index);
                        }
                    }
                }
            }
        }
        next.latest = index;
        Ok(next)
    }
}

fn check_uuid(table: Table, id: &str) -> Result<(), StoreError> {
    match uuid::Uuid::parse_str(id) {
        Ok(u) if u.hyphenated().to_string() == id => Ok(()),
        _ => Err(StoreError::InvalidId { table: table.name(), id: id.to_string() }),
    }
}

impl StateReader for StateSnapshot {
    fn by_prefix<'a>(
        &'a self,
        table: Table,
        namespace: &str,
        prefix: &str,
    ) -> Result<ResourceIter<'a>, StoreError> {
        let needle = if table.uuid_keyed() { uuid_prefix(prefix)? } else { prefix.to_string() };
        let Some(rows) = self.tables.get(&table) else {
            return Ok(Box::new(std::iter::empty()));
        };
        let ns = row_namespace(table, namespace).to_string();
        let start: Key = (ns.clone(), needle.clone());
        let iter = rows
            .range(start..)
            .take_while(move |((row_ns, id), _)| *row_ns == ns && id.starts_with(needle.as_str()))
            .map(|(_, res)| res);
        Ok(Box::new(iter))
    }

    fn index(&self, key: &str) -> Result<u64, StoreError> {
        Ok(Table::from_name(key).map(|t| self.table_index(t)).unwrap_or(0))
    }
}

/// Shared handle to the current snapshot plus a channel announcing each newly
/// applied index.
pub struct StateStore {
    snap: ArcSwap<StateSnapshot>,
    index_tx: watch::Sender<u64>,
    write: Mutex<()>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    pub fn new() -> Self {
        let (index_tx, _) = watch::channel(0u64);
        Self {
            snap: ArcSwap::from_pointee(StateSnapshot::default()),
            index_tx,
            write: Mutex::new(()),
        }
    }

    pub fn current(&self) -> Arc<StateSnapshot> {
        self.snap.load_full()
    }

    pub fn subscribe_index(&self) -> watch::Receiver<u64> {
        self.index_tx.subscribe()
    }

    /// Apply a batch atomically at `index` and publish the resulting snapshot.
    pub fn apply(&self, index: u64, batch: Vec<Mutation>) -> Result<u64, StoreError> {
        let _guard = self.write.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let n = batch.len();
        let next = self.snap.load().apply(index, batch)?;
        self.snap.store(Arc::new(next));
        self.index_tx.send_replace(index);
        metrics::gauge!("scout_state_index", index as f64);
        debug!(index, mutations = n, "state: batch applied");
        Ok(index)
    }

    /// Upsert every record in one batch at `index`.
    pub fn restore(&self, index: u64, resources: Vec<Resource>) -> Result<u64, StoreError> {
        self.apply(index, resources.into_iter().map(Mutation::Upsert).collect())
    }
}
