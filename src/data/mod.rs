// mod.rs - Data structures module

pub mod filter;
pub mod link;
pub mod loaders;
pub mod phenotype;
pub mod table;

// Re-export main types for convenience
pub use filter::FieldFilter;
pub use link::{LinkEntry, LinkTable};
pub use loaders::read_table;
pub use phenotype::{PhenotypeRecord, PhenotypeTable};
pub use table::{Table, TableFormat, MISSING_VALUE};
