// phenotype.rs - Phenotype table keyed by participant ID

use crate::data::filter::FieldFilter;
use crate::data::table::{Table, PHENOTYPE_ID_CANDIDATES};
use crate::error::{PrepError, Result};
use std::collections::HashMap;
use std::path::PathBuf;

/// One participant's phenotype values, aligned with `PhenotypeTable::fields`
#[derive(Debug, Clone, PartialEq)]
pub struct PhenotypeRecord {
    pub participant_id: i64,
    pub values: Vec<String>,
}

/// Phenotype fields for every participant in the input
#[derive(Debug, Clone, PartialEq)]
pub struct PhenotypeTable {
    pub source: PathBuf,
    pub id_column: String,
    /// Field names, excluding the ID column
    pub fields: Vec<String>,
    pub records: Vec<PhenotypeRecord>,
    index: HashMap<i64, usize>,
}

impl PhenotypeTable {
    /// Build from a raw table, keying rows by the participant ID column
    pub fn from_table(table: Table, id_column: Option<&str>) -> Result<Self> {
        let id_idx = table.find_id_column(id_column, PHENOTYPE_ID_CANDIDATES)?;
        let id_name = table.headers[id_idx].clone();

        let fields: Vec<String> = table
            .headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != id_idx)
            .map(|(_, h)| h.clone())
            .collect();

        let mut records = Vec::with_capacity(table.len());
        let mut index = HashMap::with_capacity(table.len());

        for row in 0..table.len() {
            let participant_id = table.participant_id(row, id_idx)?;

            if let Some(&previous) = index.get(&participant_id) {
                return Err(PrepError::schema(
                    &table.source,
                    format!(
                        "participant {} appears twice (lines {} and {})",
                        participant_id, table.lines[previous], table.lines[row]
                    ),
                ));
            }

            let values = table.rows[row]
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != id_idx)
                .map(|(_, v)| v.clone())
                .collect();

            index.insert(participant_id, records.len());
            records.push(PhenotypeRecord {
                participant_id,
                values,
            });
        }

        Ok(Self {
            source: table.source,
            id_column: id_name,
            fields,
            records,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, participant_id: i64) -> Option<&PhenotypeRecord> {
        self.index.get(&participant_id).map(|&i| &self.records[i])
    }

    pub fn contains(&self, participant_id: i64) -> bool {
        self.index.contains_key(&participant_id)
    }

    /// Drop fields rejected by the filter. The ID column is never a field.
    pub fn apply_field_filter(&mut self, filter: &FieldFilter) -> Result<()> {
        if filter.is_empty() {
            return Ok(());
        }

        let keep: Vec<bool> = self.fields.iter().map(|f| filter.keeps(f)).collect();
        let before = self.fields.len();

        self.fields = self
            .fields
            .iter()
            .zip(&keep)
            .filter(|(_, k)| **k)
            .map(|(f, _)| f.clone())
            .collect();

        for record in &mut self.records {
            record.values = record
                .values
                .iter()
                .zip(&keep)
                .filter(|(_, k)| **k)
                .map(|(v, _)| v.clone())
                .collect();
        }

        let after = self.fields.len();
        if before != after {
            println!(
                "Field filters: kept {} fields (removed {})",
                after,
                before - after
            );
        }

        if after == 0 {
            return Err(PrepError::schema(
                &self.source,
                "no phenotype fields remain after filtering",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn raw(rows: &[(&str, &str, &str)]) -> Table {
        let mut t = Table::new(
            PathBuf::from("pheno.csv"),
            vec!["age".to_string(), "eid".to_string(), "sex".to_string()],
        );
        for (i, (age, eid, sex)) in rows.iter().enumerate() {
            t.rows
                .push(vec![age.to_string(), eid.to_string(), sex.to_string()]);
            t.lines.push(i + 2);
        }
        t
    }

    #[test]
    fn test_keyed_by_detected_id_column() {
        let table = PhenotypeTable::from_table(raw(&[("40", "5", "F"), ("55", "7", "M")]), None)
            .unwrap();

        assert_eq!(table.id_column, "eid");
        assert_eq!(table.fields, vec!["age", "sex"]);
        assert_eq!(table.get(7).unwrap().values, vec!["55", "M"]);
        assert!(table.get(6).is_none());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_duplicate_participant_is_rejected() {
        let err = PhenotypeTable::from_table(raw(&[("40", "5", "F"), ("41", "5", "F")]), None)
            .unwrap_err();
        assert!(matches!(err, PrepError::Schema { .. }));
        assert!(err.to_string().contains("lines 2 and 3"));
    }

    #[test]
    fn test_explicit_id_column_must_exist() {
        let err = PhenotypeTable::from_table(raw(&[("40", "5", "F")]), Some("f.eid")).unwrap_err();
        assert!(matches!(err, PrepError::MissingIdColumn { .. }));
    }

    #[test]
    fn test_field_filter() {
        let mut table = PhenotypeTable::from_table(raw(&[("40", "5", "F")]), None).unwrap();
        let filter = FieldFilter {
            exclude_regex: Some(Regex::new("^sex$").unwrap()),
            ..FieldFilter::default()
        };
        table.apply_field_filter(&filter).unwrap();
        assert_eq!(table.fields, vec!["age"]);
        assert_eq!(table.get(5).unwrap().values, vec!["40"]);

        let drop_all = FieldFilter {
            include_regex: Some(Regex::new("^nothing$").unwrap()),
            ..FieldFilter::default()
        };
        assert!(table.apply_field_filter(&drop_all).is_err());
    }
}
