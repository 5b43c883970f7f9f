// mod.rs - Feature selection over compiled SNP tables

pub mod bootstrap;
pub mod chi2;
pub mod dataset;
pub mod infogain;
pub mod lcsi;
pub mod mwu;
pub mod registry;
pub mod stats;
pub mod traits;

pub use bootstrap::{BootstrapAggregate, BootstrapPlan, SelectionRun};
pub use chi2::Chi2Selector;
pub use dataset::Dataset;
pub use infogain::InfoGainSelector;
pub use lcsi::{JmiSelector, MrmrSelector};
pub use mwu::MannWhitneySelector;
pub use registry::SelectorRegistry;
pub use traits::{parse_params, FeatureSelector, SelectionResult, SelectorParams};
