// mod.rs - Core logic module

pub mod compile;
pub mod join;

// Re-export main types for convenience
pub use compile::{compile_snps, CompiledTable};
pub use join::{
    DataLoader, JoinReport, JoinedDataset, JoinedRow, LoaderOptions, MatchStatus, UnmatchedPolicy,
};
