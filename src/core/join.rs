// join.rs - DataLoader: phenotype x genetic link join in link order

use crate::data::{
    read_table, FieldFilter, LinkEntry, LinkTable, PhenotypeTable, TableFormat, MISSING_VALUE,
};
use crate::error::{PrepError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

/// What to do with link rows that have no phenotype record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPolicy {
    /// Drop withdrawn and unmatched rows
    #[default]
    Exclude,
    /// Keep every link row and mark its status
    Flag,
}

impl FromStr for UnmatchedPolicy {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "exclude" | "drop" => Ok(UnmatchedPolicy::Exclude),
            "flag" | "keep" => Ok(UnmatchedPolicy::Flag),
            _ => Err(PrepError::config(format!(
                "Invalid unmatched policy: {}. Use: exclude, flag",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Matched,
    Withdrawn,
    Unmatched,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Matched => "matched",
            MatchStatus::Withdrawn => "withdrawn",
            MatchStatus::Unmatched => "unmatched",
        }
    }
}

/// One output row, anchored to its genetic row position
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow {
    pub position: usize,
    /// ID as written in the link file (negative for withdrawals)
    pub participant_id: i64,
    pub status: MatchStatus,
    pub values: Vec<String>,
}

/// Counts describing how much of each input survived the join
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinReport {
    pub link_rows: usize,
    pub phenotype_rows: usize,
    pub matched: usize,
    pub withdrawn: usize,
    pub unmatched: usize,
    /// Participants with phenotype data but no genetic row
    pub phenotype_only: usize,
    /// Positive IDs that occur on more than one link row
    pub duplicate_link_ids: usize,
}

impl JoinReport {
    pub fn print_summary(&self) {
        println!("\n🔗 === JOIN SUMMARY ===");
        println!("  📏 Link rows: {}", self.link_rows);
        println!("  📏 Phenotype rows: {}", self.phenotype_rows);
        println!(
            "  ✅ Matched: {} ({:.1}% of link rows)",
            self.matched,
            percent(self.matched, self.link_rows)
        );
        println!("  🚫 Withdrawn (sentinel IDs): {}", self.withdrawn);
        println!("  ❓ Unmatched link IDs: {}", self.unmatched);
        println!("  📋 Phenotype-only participants: {}", self.phenotype_only);
        if self.duplicate_link_ids > 0 {
            println!(
                "  ⚠️  Duplicate participant IDs in link file: {}",
                self.duplicate_link_ids
            );
        }
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

/// Result of a join: rows in genetic order plus the report
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedDataset {
    pub id_column: String,
    pub fields: Vec<String>,
    pub rows: Vec<JoinedRow>,
    pub policy: UnmatchedPolicy,
    pub report: JoinReport,
}

impl JoinedDataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Output header: position, ID, optional status, then phenotype fields
    pub fn headers(&self) -> Vec<String> {
        let mut headers = vec!["genetic_index".to_string(), self.id_column.clone()];
        if self.policy == UnmatchedPolicy::Flag {
            headers.push("status".to_string());
        }
        headers.extend(self.fields.iter().cloned());
        headers
    }

    /// Output records matching `headers()`
    pub fn records(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.rows.iter().map(move |row| {
            let mut record = Vec::with_capacity(self.fields.len() + 3);
            record.push(row.position.to_string());
            record.push(row.participant_id.to_string());
            if self.policy == UnmatchedPolicy::Flag {
                record.push(row.status.as_str().to_string());
            }
            record.extend(row.values.iter().cloned());
            record
        })
    }
}

/// Options controlling how inputs are read and joined
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    pub phenotype_id_column: Option<String>,
    pub link_id_column: Option<String>,
    pub phenotype_format: Option<TableFormat>,
    pub link_format: Option<TableFormat>,
    pub field_filter: FieldFilter,
    pub unmatched_policy: UnmatchedPolicy,
}

/// Joins a phenotype table with a genetic link table.
///
/// Output rows follow link-file order because downstream genotype formats
/// are positional. Sentinel IDs never match.
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    options: LoaderOptions,
}

impl DataLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LoaderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    pub fn phenotype_id_column(&mut self, column: &str) -> &mut Self {
        self.options.phenotype_id_column = Some(column.to_owned());
        self
    }

    pub fn link_id_column(&mut self, column: &str) -> &mut Self {
        self.options.link_id_column = Some(column.to_owned());
        self
    }

    pub fn field_filter(&mut self, filter: FieldFilter) -> &mut Self {
        self.options.field_filter = filter;
        self
    }

    pub fn unmatched_policy(&mut self, policy: UnmatchedPolicy) -> &mut Self {
        self.options.unmatched_policy = policy;
        self
    }

    /// Load phenotype data keyed by participant ID
    pub fn load_phenotypes(&self, path: &Path) -> Result<PhenotypeTable> {
        println!("📊 Loading phenotypes: {}", path.display());

        let table = read_table(path, self.options.phenotype_format)?;
        let mut phenotypes =
            PhenotypeTable::from_table(table, self.options.phenotype_id_column.as_deref())?;
        phenotypes.apply_field_filter(&self.options.field_filter)?;

        println!(
            "✅ Phenotypes loaded: {} participants, {} fields (ID column '{}')",
            phenotypes.len(),
            phenotypes.fields.len(),
            phenotypes.id_column
        );
        Ok(phenotypes)
    }

    /// Load the genetic link table in file order
    pub fn load_link(&self, path: &Path) -> Result<LinkTable> {
        println!("🧬 Loading genetic link table: {}", path.display());

        let table = read_table(path, self.options.link_format)?;
        let link = LinkTable::from_table(table, self.options.link_id_column.as_deref())?;

        println!(
            "✅ Link table loaded: {} rows, {} withdrawn (ID column '{}')",
            link.len(),
            link.withdrawn_count(),
            link.id_column
        );
        Ok(link)
    }

    /// Align phenotype records to link positions
    pub fn join(&self, phenotypes: &PhenotypeTable, link: &LinkTable) -> Result<JoinedDataset> {
        let policy = self.options.unmatched_policy;
        let mut report = JoinReport {
            link_rows: link.len(),
            phenotype_rows: phenotypes.len(),
            ..JoinReport::default()
        };

        let mut seen = HashSet::with_capacity(link.len());
        let mut rows = Vec::with_capacity(link.len());

        for (position, entry) in link.entries.iter().enumerate() {
            let (status, values) = match entry {
                LinkEntry::Withdrawn(_) => {
                    report.withdrawn += 1;
                    (MatchStatus::Withdrawn, None)
                }
                LinkEntry::Participant(id) => {
                    if !seen.insert(*id) {
                        report.duplicate_link_ids += 1;
                        tracing::warn!(
                            participant = *id,
                            position,
                            "participant ID repeated in link file"
                        );
                    }
                    match phenotypes.get(*id) {
                        Some(record) => {
                            report.matched += 1;
                            (MatchStatus::Matched, Some(record.values.clone()))
                        }
                        None => {
                            report.unmatched += 1;
                            (MatchStatus::Unmatched, None)
                        }
                    }
                }
            };

            match (values, policy) {
                (Some(values), _) => rows.push(JoinedRow {
                    position,
                    participant_id: entry.raw_id(),
                    status,
                    values,
                }),
                (None, UnmatchedPolicy::Flag) => rows.push(JoinedRow {
                    position,
                    participant_id: entry.raw_id(),
                    status,
                    values: vec![MISSING_VALUE.to_string(); phenotypes.fields.len()],
                }),
                (None, UnmatchedPolicy::Exclude) => {}
            }
        }

        report.phenotype_only = phenotypes
            .records
            .iter()
            .filter(|r| !seen.contains(&r.participant_id))
            .count();

        report.print_summary();
        tracing::info!(
            matched = report.matched,
            withdrawn = report.withdrawn,
            unmatched = report.unmatched,
            phenotype_only = report.phenotype_only,
            "join finished"
        );

        if report.matched == 0 {
            return Err(PrepError::EmptyJoin {
                link_rows: report.link_rows,
                withdrawn: report.withdrawn,
                unmatched: report.unmatched,
            });
        }

        Ok(JoinedDataset {
            id_column: link.id_column.clone(),
            fields: phenotypes.fields.clone(),
            rows,
            policy,
            report,
        })
    }

    /// Load both inputs and join them
    pub fn load_and_join(&self, phenotype_path: &Path, link_path: &Path) -> Result<JoinedDataset> {
        let phenotypes = self.load_phenotypes(phenotype_path)?;
        let link = self.load_link(link_path)?;
        self.join(&phenotypes, &link)
    }
}
