// ABOUTME: Query filters over the table: type (one or a set), parent, id and status, all case-insensitive.
// ABOUTME: Also names the relation conventions used by the board: comments of an issue, wiki pages, board columns.

use fit_core::{Row, Schema};

/// Types shown as cards on the board.
pub const BOARD_TYPES: [&str; 2] = ["todo", "bug"];

/// Filter for [`RecordStore::query`](crate::RecordStore::query). Absent filters
/// match every row; present ones must all match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    kinds: Option<Vec<String>>,
    parent: Option<String>,
    id: Option<String>,
    status: Option<String>,
}

impl Query {
    /// A query that matches everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Keep rows of exactly this type.
    pub fn kind(self, kind: impl AsRef<str>) -> Self {
        self.kinds([kind])
    }

    /// Keep rows whose type is any of `kinds`.
    pub fn kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.kinds = Some(kinds.into_iter().map(|k| k.as_ref().to_lowercase()).collect());
        self
    }

    pub fn parent(mut self, parent: impl AsRef<str>) -> Self {
        self.parent = Some(parent.as_ref().to_lowercase());
        self
    }

    pub fn id(mut self, id: impl AsRef<str>) -> Self {
        self.id = Some(id.as_ref().to_lowercase());
        self
    }

    pub fn status(mut self, status: impl AsRef<str>) -> Self {
        self.status = Some(status.as_ref().to_lowercase());
        self
    }

    /// Comments attached to an issue.
    pub fn comments_of(issue_id: impl AsRef<str>) -> Self {
        Self::all().kind("comment").parent(issue_id)
    }

    /// The wiki page with the given name.
    pub fn wiki_page(name: impl AsRef<str>) -> Self {
        Self::all().kind("wiki").id(name)
    }

    /// Every wiki page.
    pub fn wiki_pages() -> Self {
        Self::all().kind("wiki")
    }

    /// Cards shown in one board column.
    pub fn board_column(status: impl AsRef<str>) -> Self {
        Self::all().kinds(BOARD_TYPES).status(status)
    }

    pub fn matches(&self, row: &Row, schema: &Schema) -> bool {
        let value = |column: Option<usize>| {
            column
                .and_then(|c| row.get(c))
                .map(str::to_lowercase)
        };
        let equals = |column: Option<usize>, wanted: &Option<String>| match wanted {
            None => true,
            Some(wanted) => value(column).is_some_and(|v| v == *wanted),
        };

        let kind_ok = match &self.kinds {
            None => true,
            Some(kinds) => value(schema.column("Type")).is_some_and(|v| kinds.contains(&v)),
        };

        kind_ok
            && equals(schema.column("Parent"), &self.parent)
            && equals(Some(schema.id_column()), &self.id)
            && equals(schema.column("Status"), &self.status)
    }
}
