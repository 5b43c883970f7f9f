// link.rs - Genetic link table: row position -> participant ID

use crate::data::table::{Table, LINK_ID_CANDIDATES};
use crate::error::Result;
use std::path::PathBuf;

/// One row of a genetic link file.
///
/// Withdrawn participants are replaced by non-positive sentinels in the
/// released `.sample`/`.fam` files. They keep their position but never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEntry {
    Participant(i64),
    Withdrawn(i64),
}

impl LinkEntry {
    pub fn from_id(id: i64) -> Self {
        if id > 0 {
            LinkEntry::Participant(id)
        } else {
            LinkEntry::Withdrawn(id)
        }
    }

    /// The raw ID as it appears in the file, sentinel or not
    pub fn raw_id(&self) -> i64 {
        match self {
            LinkEntry::Participant(id) | LinkEntry::Withdrawn(id) => *id,
        }
    }

    /// The participant ID, or `None` for a withdrawal sentinel
    pub fn participant_id(&self) -> Option<i64> {
        match self {
            LinkEntry::Participant(id) => Some(*id),
            LinkEntry::Withdrawn(_) => None,
        }
    }

    pub fn is_withdrawn(&self) -> bool {
        matches!(self, LinkEntry::Withdrawn(_))
    }
}

/// Ordered link entries; index in `entries` is the genetic row position
#[derive(Debug, Clone, PartialEq)]
pub struct LinkTable {
    pub source: PathBuf,
    pub id_column: String,
    pub entries: Vec<LinkEntry>,
}

impl LinkTable {
    pub fn from_table(table: Table, id_column: Option<&str>) -> Result<Self> {
        let id_idx = table.find_id_column(id_column, LINK_ID_CANDIDATES)?;

        let entries = (0..table.len())
            .map(|row| table.participant_id(row, id_idx).map(LinkEntry::from_id))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id_column: table.headers[id_idx].clone(),
            source: table.source,
            entries,
        })
    }

    pub fn from_ids(source: PathBuf, ids: &[i64]) -> Self {
        Self {
            source,
            id_column: "ID_1".to_string(),
            entries: ids.iter().map(|&id| LinkEntry::from_id(id)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn withdrawn_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_withdrawn()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_are_withdrawn() {
        assert_eq!(LinkEntry::from_id(5), LinkEntry::Participant(5));
        assert_eq!(LinkEntry::from_id(-1), LinkEntry::Withdrawn(-1));
        assert_eq!(LinkEntry::from_id(0), LinkEntry::Withdrawn(0));
        assert_eq!(LinkEntry::from_id(-1000007).participant_id(), None);
        assert_eq!(LinkEntry::from_id(-1000007).raw_id(), -1000007);
    }

    #[test]
    fn test_from_table_preserves_order() {
        let mut t = Table::new(
            PathBuf::from("link.csv"),
            vec!["ID_1".to_string(), "ID_2".to_string()],
        );
        for (i, id) in ["7", "-3", "5"].iter().enumerate() {
            t.rows.push(vec![id.to_string(), id.to_string()]);
            t.lines.push(i + 2);
        }

        let link = LinkTable::from_table(t, None).unwrap();
        assert_eq!(link.id_column, "ID_1");
        assert_eq!(
            link.entries,
            vec![
                LinkEntry::Participant(7),
                LinkEntry::Withdrawn(-3),
                LinkEntry::Participant(5)
            ]
        );
        assert_eq!(link.withdrawn_count(), 1);
    }

    #[test]
    fn test_non_integer_id_fails() {
        let mut t = Table::new(PathBuf::from("link.csv"), vec!["IID".to_string()]);
        t.rows.push(vec!["sample_A".to_string()]);
        t.lines.push(2);
        assert!(LinkTable::from_table(t, None).is_err());
    }
}
