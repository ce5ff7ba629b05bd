// ── Resource adapters ──
//
// A `Resource` describes one remote collection: where it lives, which
// columns it shows, and what may be done to each row. The list controller
// is generic over this trait and holds no per-resource logic.

mod classify;
mod products;
mod users;

use std::cmp::Ordering;
use std::fmt;

use serde::de::DeserializeOwned;

pub use classify::StockLevel;
pub use products::{Product, ProductImage, ProductMetadata, Products, Region};
pub use users::{RoleBadge, User, Users};

/// Server-assigned row identifier.
pub type RowId = u64;

/// How a column's values compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
}

/// One displayed column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub title: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn numeric(key: &'static str, title: &'static str) -> Self {
        Self {
            key,
            title,
            kind: ColumnKind::Numeric,
        }
    }

    pub const fn text(key: &'static str, title: &'static str) -> Self {
        Self {
            key,
            title,
            kind: ColumnKind::Text,
        }
    }
}

/// A single cell's value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn opt_text(s: Option<&str>) -> Self {
        s.map_or(Self::Empty, |s| Self::Text(s.to_owned()))
    }

    /// Order two cells. Numbers compare numerically, text case-folded, and
    /// empty cells sort after everything else.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Empty, Self::Empty) => Ordering::Equal,
            (Self::Empty, _) => Ordering::Greater,
            (_, Self::Empty) => Ordering::Less,
            (a, b) => a.folded().cmp(&b.folded()),
        }
    }

    fn folded(&self) -> String {
        self.to_string().to_lowercase()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) if n.fract().abs() < f64::EPSILON && n.abs() < 1e15 => write!(f, "{n:.0}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Empty => Ok(()),
        }
    }
}

/// A remote collection the list controller can page, sort, filter, and
/// delete from.
pub trait Resource: Send + Sync + 'static {
    type Row: Clone + fmt::Debug + DeserializeOwned + Send + Sync + 'static;

    /// API path relative to the base URL, e.g. `admin/users`.
    const ENDPOINT: &'static str;
    /// Plural noun for messages, e.g. `users`.
    const LABEL: &'static str;

    fn columns() -> &'static [Column];

    fn row_id(row: &Self::Row) -> RowId;

    /// The value shown in column `key`. Unknown keys yield `Empty`.
    fn cell(row: &Self::Row, key: &str) -> CellValue;

    fn can_edit(_row: &Self::Row) -> bool {
        true
    }

    fn can_delete(_row: &Self::Row) -> bool {
        true
    }

    fn column(key: &str) -> Option<&'static Column> {
        Self::columns().iter().find(|c| c.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_numerically() {
        assert_eq!(CellValue::Number(9.0).compare(&CellValue::Number(10.0)), Ordering::Less);
    }

    #[test]
    fn text_compares_case_folded() {
        assert_eq!(CellValue::text("apple").compare(&CellValue::text("Banana")), Ordering::Less);
        assert_eq!(CellValue::text("SILK").compare(&CellValue::text("silk")), Ordering::Equal);
    }

    #[test]
    fn empty_sorts_last() {
        assert_eq!(CellValue::Empty.compare(&CellValue::text("a")), Ordering::Greater);
        assert_eq!(CellValue::Number(1.0).compare(&CellValue::Empty), Ordering::Less);
    }

    #[test]
    fn display_drops_integral_fraction() {
        assert_eq!(CellValue::Number(1200.0).to_string(), "1200");
        assert_eq!(CellValue::Number(12.5).to_string(), "12.5");
        assert_eq!(CellValue::Empty.to_string(), "");
    }
}
