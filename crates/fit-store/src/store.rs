// ABOUTME: RecordStore owns the in-memory table and config of one database file and its load/persist cycle.
// ABOUTME: Implements add, update, upsert, query, status changes and manual reordering with dense positions.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::Local;
use fit_core::{Config, DefaultContext, Row, RowView, Schema, fold_name};
use thiserror::Error;

use crate::format::{self, FormatError, FormatVersion, Table};
use crate::query::Query;

/// Field name to value mapping accepted by [`RecordStore::add`] and
/// [`RecordStore::update`]. Names are matched to columns case-insensitively.
pub type Fields = BTreeMap<String, String>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no Id given")]
    MissingId,

    #[error("unknown id: {0}")]
    UnknownId(String),

    #[error("id already in use: {0}")]
    DuplicateId(String),

    #[error("no such column: {0}")]
    UnknownColumn(String),

    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Whether the in-memory table reflects the backing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Rows and config were read from the file.
    Loaded,
    /// The last load failed; the store holds the default config and no rows.
    /// Persisting in this state replaces the file with an empty table.
    Degraded,
}

/// Where [`RecordStore::reorder`] puts the moved row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Immediately before the row with this id.
    Before(String),
    /// After every other row.
    End,
}

impl Placement {
    /// Target id the board sends when a card is dropped below the last card.
    pub const END_SENTINEL: &'static str = "empty";

    pub fn from_target(target: &str) -> Self {
        if target == Self::END_SENTINEL {
            Placement::End
        } else {
            Placement::Before(target.to_string())
        }
    }
}

/// The table of one database file, held entirely in memory.
///
/// Every mutation only changes memory; call [`persist`](Self::persist) to
/// rewrite the file. The store does no locking of its own, see
/// [`SharedStore`](crate::SharedStore) for use from several threads.
pub struct RecordStore {
    path: PathBuf,
    output_version: Option<FormatVersion>,
    input_version: Option<FormatVersion>,
    state: StoreState,
    config: Config,
    schema: Schema,
    rows: Vec<Row>,
    /// Id to slot in `rows`. Rebuilt whenever slots move.
    index: HashMap<String, usize>,
}

impl RecordStore {
    /// A store for `path` that has not read the file yet. It starts out
    /// [`StoreState::Degraded`] until [`load`](Self::load) succeeds.
    pub fn new(path: impl AsRef<Path>, output_version: Option<FormatVersion>) -> Self {
        let config = Config::default();
        Self {
            path: path.as_ref().to_path_buf(),
            output_version,
            input_version: None,
            state: StoreState::Degraded,
            schema: Schema::from_config(&config),
            config,
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Open the database at `path` and load it. A failed load leaves the store
    /// [`StoreState::Degraded`] instead of failing construction.
    pub fn open(path: impl AsRef<Path>, output_version: Option<FormatVersion>) -> Self {
        let mut store = Self::new(path, output_version);
        // failure is already logged and recorded in `state`
        let _ = store.load();
        store
    }

    /// Replace config and rows with the contents of the backing file.
    ///
    /// On failure the store falls back to the default config with no rows,
    /// becomes [`StoreState::Degraded`] and returns the error.
    pub fn load(&mut self) -> Result<(), StoreError> {
        self.reset();
        match self.read_file() {
            Ok((version, table)) => {
                self.input_version = Some(version);
                self.install(table);
                self.state = StoreState::Loaded;
                tracing::info!(
                    "loaded {} rows from {} (version {})",
                    self.rows.len(),
                    self.path.display(),
                    version
                );
                Ok(())
            }
            Err(e) => {
                self.state = StoreState::Degraded;
                tracing::warn!("failed to load {}: {}", self.path.display(), e);
                Err(e)
            }
        }
    }

    /// Read the backing file again from scratch. The only way out of
    /// [`StoreState::Degraded`].
    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.load()
    }

    fn read_file(&self) -> Result<(FormatVersion, Table), StoreError> {
        let file = File::open(&self.path)?;
        Ok(format::read_table(BufReader::new(file))?)
    }

    fn reset(&mut self) {
        self.config = Config::default();
        self.schema = Schema::from_config(&self.config);
        self.rows.clear();
        self.index.clear();
    }

    fn install(&mut self, table: Table) {
        self.config = table.config;
        self.schema = Schema::from_config(&self.config);
        self.rows = table.rows;

        let width = self.schema.width();
        for row in &mut self.rows {
            if row.fit_to_width(width) {
                tracing::warn!(
                    "row at position {} did not have {} fields, adjusted",
                    row.position(),
                    width
                );
            }
        }
        self.rebuild_index();
    }

    /// Renumber positions densely in sequence order and rebuild the id index.
    fn rebuild_index(&mut self) {
        self.index.clear();
        let id_column = self.schema.id_column();
        for (slot, row) in self.rows.iter_mut().enumerate() {
            row.set_position(slot);
            let id = row.get(id_column).unwrap_or_default().to_string();
            if self.index.insert(id.clone(), slot).is_some() {
                tracing::warn!("duplicate id {} in {}", id, self.path.display());
            }
        }
    }

    /// Version used by [`persist`](Self::persist): the configured output version,
    /// else the version the file was read in, else the latest.
    pub fn write_version(&self) -> FormatVersion {
        self.output_version
            .or(self.input_version)
            .unwrap_or(FormatVersion::LATEST)
    }

    pub fn set_output_version(&mut self, version: Option<FormatVersion>) {
        self.output_version = version;
    }

    /// Overwrite the backing file with the whole in-memory state.
    ///
    /// The file is truncated and rewritten in place; a crash mid-write can
    /// leave it partial. An error here does not undo in-memory changes.
    pub fn persist(&self) -> Result<(), StoreError> {
        let version = self.write_version();
        let file = File::create(&self.path)?;
        format::write_table(BufWriter::new(file), version, &self.config, &self.rows)?;
        tracing::info!(
            "persisted {} rows to {} (version {})",
            self.rows.len(),
            self.path.display(),
            version
        );
        Ok(())
    }

    /// Append a new row and return its id.
    ///
    /// Each column takes the caller's value when one is given under a matching
    /// name, otherwise its default strategy is evaluated. Names that match no
    /// column are ignored.
    pub fn add(&mut self, fields: &Fields) -> Result<String, StoreError> {
        let ctx = DefaultContext {
            config: &self.config,
            row_count: self.rows.len(),
            now: Local::now(),
        };
        let explicit = self.explicit_columns(fields);

        let values: Vec<String> = self
            .schema
            .defaults()
            .iter()
            .enumerate()
            .map(|(column, strategy)| match explicit.get(&column) {
                Some(value) => value.to_string(),
                None => strategy.resolve(&ctx),
            })
            .collect();

        let row = Row::new(values, self.rows.len());
        let id = row
            .get(self.schema.id_column())
            .unwrap_or_default()
            .to_string();
        if self.index.contains_key(&id) {
            return Err(StoreError::DuplicateId(id));
        }

        tracing::debug!("adding row {} at position {}", id, row.position());
        self.index.insert(id.clone(), self.rows.len());
        self.rows.push(row);
        Ok(id)
    }

    /// Column index to supplied value, for every supplied name that is a column.
    fn explicit_columns<'a>(&self, fields: &'a Fields) -> HashMap<usize, &'a str> {
        let mut explicit = HashMap::new();
        for (name, value) in fields {
            match self.schema.column(name) {
                Some(column) => {
                    explicit.insert(column, value.as_str());
                }
                None => tracing::debug!("ignoring unknown field {}", name),
            }
        }
        explicit
    }

    /// Overwrite the supplied columns of the row named by the `Id` entry.
    /// Other columns, the id itself and the position are left alone.
    pub fn update(&mut self, fields: &Fields) -> Result<(), StoreError> {
        let id = id_field(fields).ok_or(StoreError::MissingId)?;
        let slot = self.slot_of(id)?;
        let id_column = self.schema.id_column();

        for (column, value) in self.explicit_columns(fields) {
            if column != id_column {
                self.rows[slot].set(column, value);
            }
        }
        tracing::debug!("updated row {}", id);
        Ok(())
    }

    /// Update when `fields` names an id, add otherwise. Returns the row's id.
    pub fn upsert(&mut self, fields: &Fields) -> Result<String, StoreError> {
        match id_field(fields) {
            Some(id) => {
                self.update(fields)?;
                Ok(id.to_string())
            }
            None => self.add(fields),
        }
    }

    /// Rows matching `query`, in position order.
    pub fn query(&self, query: &Query) -> Vec<&Row> {
        self.rows
            .iter()
            .filter(|row| query.matches(row, &self.schema))
            .collect()
    }

    /// Like [`query`](Self::query) but with named access to each row.
    pub fn query_views(&self, query: &Query) -> Vec<RowView<'_>> {
        self.query(query)
            .into_iter()
            .map(|row| row.view(&self.schema))
            .collect()
    }

    /// Like [`query`](Self::query) but as column name to value mappings.
    pub fn query_maps(&self, query: &Query) -> Vec<BTreeMap<String, String>> {
        self.query_views(query)
            .iter()
            .map(|view| view.to_map())
            .collect()
    }

    /// Set the `Status` column of one row.
    pub fn set_status(&mut self, id: &str, status: &str) -> Result<(), StoreError> {
        let column = self
            .schema
            .column("Status")
            .ok_or_else(|| StoreError::UnknownColumn("Status".to_string()))?;
        let slot = self.slot_of(id)?;
        self.rows[slot].set(column, status);
        tracing::debug!("row {} now has status {}", id, status);
        Ok(())
    }

    /// Move a row before another one (or to the end) and renumber positions.
    ///
    /// If either id is unknown nothing changes and false is returned; this is
    /// not treated as an error.
    pub fn reorder(&mut self, id: &str, placement: &Placement) -> bool {
        match self.try_reorder(id, placement) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("ignoring reorder of {}: {}", id, e);
                false
            }
        }
    }

    fn try_reorder(&mut self, id: &str, placement: &Placement) -> Result<(), StoreError> {
        let from = self.slot_of(id)?;
        let to = match placement {
            Placement::End => self.rows.len() - 1,
            Placement::Before(target) if target == id => return Ok(()),
            Placement::Before(target) => {
                let target = self.slot_of(target)?;
                if target > from { target - 1 } else { target }
            }
        };

        let row = self.rows.remove(from);
        self.rows.insert(to, row);
        self.rebuild_index();
        tracing::debug!("moved row {} from position {} to {}", id, from, to);
        Ok(())
    }

    /// Board move: change the status and optionally reposition the row.
    pub fn move_to(
        &mut self,
        id: &str,
        status: &str,
        placement: Option<&Placement>,
    ) -> Result<(), StoreError> {
        self.set_status(id, status)?;
        if let Some(placement) = placement {
            self.reorder(id, placement);
        }
        Ok(())
    }

    fn slot_of(&self, id: &str) -> Result<usize, StoreError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| StoreError::UnknownId(id.to_string()))
    }

    /// Row with exactly this id.
    pub fn get(&self, id: &str) -> Option<&Row> {
        self.index.get(id).map(|slot| &self.rows[*slot])
    }

    pub fn columns(&self) -> &[String] {
        self.schema.names()
    }

    /// Values of a config key; empty if the key is absent.
    pub fn config(&self, key: &str) -> &[String] {
        self.config.values(key)
    }

    /// Value to colour mapping from `key` and `key.Color`.
    ///
    /// Precondition: both sequences have the same length. If they do not,
    /// values past the shorter one are left out.
    pub fn color_config(&self, key: &str) -> BTreeMap<String, String> {
        self.config.color_map(key)
    }

    pub fn config_block(&self) -> &Config {
        &self.config
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, position: usize) -> Option<&Row> {
        self.rows.get(position)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    pub fn is_degraded(&self) -> bool {
        self.state == StoreState::Degraded
    }

    pub fn input_version(&self) -> Option<FormatVersion> {
        self.input_version
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Value supplied under the `Id` key, matched the way column names are.
fn id_field(fields: &Fields) -> Option<&str> {
    fields
        .iter()
        .find(|(name, _)| fold_name(name) == "id")
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fields(pairs: &[(&str, &str)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn fresh_store(dir: &TempDir) -> RecordStore {
        RecordStore::open(dir.path().join("todo.txt"), None)
    }

    /// Store with rows A, B, C, D in that order.
    fn lettered_store(dir: &TempDir) -> RecordStore {
        let mut store = fresh_store(dir);
        for id in ["A", "B", "C", "D"] {
            store.add(&fields(&[("Id", id), ("Title", id)])).unwrap();
        }
        store
    }

    fn order(store: &RecordStore) -> Vec<String> {
        store
            .rows()
            .iter()
            .map(|r| r.get(0).unwrap().to_string())
            .collect()
    }

    fn assert_dense(store: &RecordStore) {
        let positions: Vec<usize> = store.rows().iter().map(|r| r.position()).collect();
        let expected: Vec<usize> = (0..store.row_count()).collect();
        assert_eq!(positions, expected, "positions must be 0..N-1 in order");
    }

    #[test]
    fn missing_file_degrades_to_defaults() {
        let dir = TempDir::new().unwrap();
        let mut store = fresh_store(&dir);

        assert_eq!(store.state(), StoreState::Degraded);
        assert_eq!(store.columns(), Config::default().fields());
        assert!(store.query(&Query::all()).is_empty());
        assert!(matches!(store.reload(), Err(StoreError::Io(_))));
    }

    #[test]
    fn new_store_waits_for_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todo.txt");
        fs::write(&path, "Version=1\n[Config]\nFields=Id;\n[Entries]\nA;\n").unwrap();

        let mut store = RecordStore::new(&path, None);
        assert!(store.is_degraded());
        assert_eq!(store.row_count(), 0);

        store.load().unwrap();
        assert_eq!(store.state(), StoreState::Loaded);
        assert_eq!(store.row_count(), 1);
    }

    #[test]
    fn unknown_version_degrades() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todo.txt");
        fs::write(&path, "Version=9\n[Config]\nFields=Id;\n[Entries]\n").unwrap();

        let store = RecordStore::open(&path, None);
        assert!(store.is_degraded());
        assert_eq!(store.row_count(), 0);
        assert_eq!(store.config("Status"), ["Backlog", "WIP", "Done"]);
    }

    #[test]
    fn reload_recovers_after_file_is_fixed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todo.txt");
        fs::write(&path, "garbage").unwrap();
        let mut store = RecordStore::open(&path, None);
        assert!(store.is_degraded());

        fs::write(&path, "Version=1\n[Config]\nFields=Id;Title;\n[Entries]\nX;Hello;\n").unwrap();
        store.reload().unwrap();
        assert_eq!(store.state(), StoreState::Loaded);
        assert_eq!(store.row_count(), 1);
        assert_eq!(store.get("X").unwrap().get(1), Some("Hello"));
    }

    #[test]
    fn truncated_version_two_file_keeps_complete_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todo.txt");
        fs::write(
            &path,
            "Version=2\n[Config]\nFields=Id;Title;\n[Entries]\n\"A\"\n\"one\"\n----\n\"B\"\n\"two\"\n",
        )
        .unwrap();

        let store = RecordStore::open(&path, None);
        assert_eq!(store.state(), StoreState::Loaded);
        assert_eq!(store.row_count(), 1);
        assert_eq!(store.get("A").unwrap().values(), ["A", "one"]);
        assert!(store.get("B").is_none());
    }

    #[test]
    fn whitespace_line_after_version_one_entries_is_not_a_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todo.txt");
        fs::write(&path, "Version=1\n[Config]\nFields=Id;Title;\n[Entries]\nA;one;\n  \n").unwrap();

        let store = RecordStore::open(&path, None);
        assert_eq!(store.state(), StoreState::Loaded);
        assert_eq!(store.row_count(), 1);
        store.persist().unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Version=1\n[Config]\nFields=Id;Title;\n[Entries]\nA;one;\n"
        );
    }

    #[test]
    fn add_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let mut store = fresh_store(&dir);
        let id = store.add(&fields(&[("title", "Write docs")])).unwrap();

        let row = store.get(&id).unwrap().view(store.schema());
        assert_eq!(id.len(), 8);
        assert_eq!(row.title(), "Write docs");
        assert_eq!(row.kind(), "Todo");
        assert_eq!(row.status(), "Backlog");
        assert_eq!(row.parent(), "none");
        assert_eq!(row.description(), "");
        assert_eq!(row.created().len(), 19);
        assert_eq!(row.created(), row.modified());
        assert_eq!(row.position(), 0);
    }

    #[test]
    fn add_ignores_unknown_fields() {
        let dir = TempDir::new().unwrap();
        let mut store = fresh_store(&dir);
        let id = store
            .add(&fields(&[("Title", "T"), ("Priority", "High")]))
            .unwrap();
        assert_eq!(store.get(&id).unwrap().values().len(), 8);
    }

    #[test]
    fn add_rejects_existing_id() {
        let dir = TempDir::new().unwrap();
        let mut store = lettered_store(&dir);
        let err = store.add(&fields(&[("Id", "B")])).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(ref id) if id == "B"));
        assert_eq!(store.row_count(), 4);
    }

    #[test]
    fn generated_ids_are_unique_within_a_store() {
        let dir = TempDir::new().unwrap();
        let mut store = fresh_store(&dir);
        let mut ids = std::collections::HashSet::new();
        for _ in 0..50 {
            let id = store.add(&Fields::new()).unwrap();
            assert!(ids.insert(id));
        }
        assert_eq!(store.row_count(), 50);
        assert_dense(&store);
    }

    #[test]
    fn update_changes_only_given_fields() {
        let dir = TempDir::new().unwrap();
        let mut store = fresh_store(&dir);
        let id = store
            .add(&fields(&[("Title", "T1"), ("Description", "D"), ("Status", "WIP")]))
            .unwrap();
        let before = store.get(&id).unwrap().clone();

        store.update(&fields(&[("Id", id.as_str()), ("TITLE", "T2")])).unwrap();

        let after = store.get(&id).unwrap().view(store.schema());
        assert_eq!(after.title(), "T2");
        assert_eq!(after.status(), "WIP");
        assert_eq!(after.description(), "D");
        assert_eq!(after.created(), before.view(store.schema()).created());
        assert_eq!(after.position(), before.position());
    }

    #[test]
    fn update_requires_known_id() {
        let dir = TempDir::new().unwrap();
        let mut store = lettered_store(&dir);
        assert!(matches!(
            store.update(&fields(&[("Title", "x")])),
            Err(StoreError::MissingId)
        ));
        assert!(matches!(
            store.update(&fields(&[("Id", "Z"), ("Title", "x")])),
            Err(StoreError::UnknownId(_))
        ));
        assert_eq!(store.get("A").unwrap().get(2), Some("A"));
    }

    #[test]
    fn upsert_adds_or_updates() {
        let dir = TempDir::new().unwrap();
        let mut store = fresh_store(&dir);
        let id = store.upsert(&fields(&[("Title", "new")])).unwrap();
        assert_eq!(store.row_count(), 1);

        let same = store.upsert(&fields(&[("Id", id.as_str()), ("Title", "edited")])).unwrap();
        assert_eq!(same, id);
        assert_eq!(store.row_count(), 1);
        assert_eq!(store.get(&id).unwrap().view(store.schema()).title(), "edited");
    }

    #[test]
    fn reorder_moves_before_target() {
        let dir = TempDir::new().unwrap();
        let mut store = lettered_store(&dir);
        assert!(store.reorder("D", &Placement::Before("B".into())));
        assert_eq!(order(&store), ["A", "D", "B", "C"]);
        assert_dense(&store);
    }

    #[test]
    fn reorder_forward_lands_before_target() {
        let dir = TempDir::new().unwrap();
        let mut store = lettered_store(&dir);
        assert!(store.reorder("A", &Placement::Before("C".into())));
        assert_eq!(order(&store), ["B", "A", "C", "D"]);
        assert_dense(&store);
    }

    #[test]
    fn reorder_to_end() {
        let dir = TempDir::new().unwrap();
        let mut store = lettered_store(&dir);
        assert!(store.reorder("A", &Placement::from_target("empty")));
        assert_eq!(order(&store), ["B", "C", "D", "A"]);
        assert_dense(&store);
    }

    #[test]
    fn reorder_with_unknown_ids_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let mut store = lettered_store(&dir);
        assert!(!store.reorder("Z", &Placement::Before("B".into())));
        assert!(!store.reorder("A", &Placement::Before("Z".into())));
        assert!(!store.reorder("Z", &Placement::End));
        assert_eq!(order(&store), ["A", "B", "C", "D"]);
        assert_dense(&store);
    }

    #[test]
    fn reorder_before_itself_keeps_order() {
        let dir = TempDir::new().unwrap();
        let mut store = lettered_store(&dir);
        assert!(store.reorder("B", &Placement::Before("B".into())));
        assert_eq!(order(&store), ["A", "B", "C", "D"]);
    }

    #[test]
    fn index_follows_reorder() {
        let dir = TempDir::new().unwrap();
        let mut store = lettered_store(&dir);
        store.reorder("D", &Placement::Before("A".into()));
        store.set_status("C", "Done").unwrap();
        let c = store.get("C").unwrap().view(store.schema());
        assert_eq!(c.status(), "Done");
        assert_eq!(c.position(), 3);
    }

    #[test]
    fn move_to_sets_status_and_position() {
        let dir = TempDir::new().unwrap();
        let mut store = lettered_store(&dir);
        store
            .move_to("C", "WIP", Some(&Placement::Before("A".into())))
            .unwrap();
        assert_eq!(order(&store), ["C", "A", "B", "D"]);
        assert_eq!(store.get("C").unwrap().view(store.schema()).status(), "WIP");

        assert!(matches!(
            store.move_to("Z", "WIP", None),
            Err(StoreError::UnknownId(_))
        ));
    }

    #[test]
    fn query_filters_by_type_set_and_status() {
        let dir = TempDir::new().unwrap();
        let mut store = fresh_store(&dir);
        store.add(&fields(&[("Id", "1"), ("Type", "Todo"), ("Status", "Done")])).unwrap();
        store.add(&fields(&[("Id", "2"), ("Type", "Bug"), ("Status", "done")])).unwrap();
        store.add(&fields(&[("Id", "3"), ("Type", "Wiki"), ("Status", "Done")])).unwrap();
        store.add(&fields(&[("Id", "4"), ("Type", "bug"), ("Status", "WIP")])).unwrap();

        let hits = store.query_maps(&Query::all().kinds(["todo", "bug"]).status("Done"));
        let ids: Vec<&str> = hits.iter().map(|m| m["Id"].as_str()).collect();
        assert_eq!(ids, ["1", "2"]);

        let all: Vec<&str> = store
            .query_views(&Query::all())
            .iter()
            .map(|v| v.id())
            .collect();
        assert_eq!(all, ["1", "2", "3", "4"]);
    }

    #[test]
    fn dangling_parent_matches_nothing() {
        let dir = TempDir::new().unwrap();
        let mut store = lettered_store(&dir);
        store
            .add(&fields(&[("Id", "C1"), ("Type", "Comment"), ("Parent", "GONE")]))
            .unwrap();
        assert!(store.query(&Query::comments_of("A")).is_empty());
        assert_eq!(store.query(&Query::comments_of("gone")).len(), 1);
    }

    #[test]
    fn persist_then_reload_keeps_everything() {
        let dir = TempDir::new().unwrap();
        let mut store = lettered_store(&dir);
        store
            .update(&fields(&[("Id", "B"), ("Description", "semi;colon \"quoted\"\nnext \\ line")]))
            .unwrap();
        store.reorder("D", &Placement::Before("A".into()));
        store.persist().unwrap();

        let reloaded = RecordStore::open(store.path(), None);
        assert_eq!(reloaded.state(), StoreState::Loaded);
        assert_eq!(reloaded.rows(), store.rows());
        assert_eq!(reloaded.config_block(), store.config_block());
        assert_eq!(reloaded.input_version(), Some(FormatVersion::V2));
    }

    #[test]
    fn persist_twice_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let store = lettered_store(&dir);
        store.persist().unwrap();
        let first = fs::read(store.path()).unwrap();
        store.persist().unwrap();
        let second = fs::read(store.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn migrates_version_one_to_two() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todo.txt");
        let mut v1 = RecordStore::open(&path, Some(FormatVersion::V1));
        v1.add(&fields(&[("Id", "A"), ("Title", "a;b\nc")])).unwrap();
        v1.persist().unwrap();
        assert!(fs::read_to_string(&path).unwrap().starts_with("Version=1\n"));

        let mut store = RecordStore::open(&path, None);
        assert_eq!(store.input_version(), Some(FormatVersion::V1));
        store.set_output_version(Some(FormatVersion::V2));
        store.persist().unwrap();
        assert!(fs::read_to_string(&path).unwrap().starts_with("Version=2\n"));

        let migrated = RecordStore::open(&path, None);
        assert_eq!(migrated.rows(), store.rows());
        assert_eq!(migrated.config_block(), store.config_block());
    }

    #[test]
    fn short_rows_are_padded_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todo.txt");
        fs::write(&path, "Version=1\n[Config]\nFields=Id;Title;Status;\n[Entries]\nX;Only title;\n").unwrap();

        let store = RecordStore::open(&path, None);
        assert_eq!(store.get("X").unwrap().values(), ["X", "Only title", ""]);
    }

    #[test]
    fn color_config_zips_values() {
        let dir = TempDir::new().unwrap();
        let store = fresh_store(&dir);
        let colors = store.color_config("Type");
        assert_eq!(colors["Bug"], "Red");
        assert_eq!(colors["Wiki"], "Grey");
    }

    #[test]
    fn persist_from_degraded_writes_empty_default_table() {
        let dir = TempDir::new().unwrap();
        let store = fresh_store(&dir);
        store.persist().unwrap();

        let reopened = RecordStore::open(store.path(), None);
        assert_eq!(reopened.state(), StoreState::Loaded);
        assert_eq!(reopened.row_count(), 0);
        assert_eq!(reopened.config_block(), &Config::default());
        assert_eq!(reopened.input_version(), Some(FormatVersion::LATEST));
    }
}
