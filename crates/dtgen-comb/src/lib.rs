//! Combination engine: which data test cases each element receives, and how
//! per-element choices are assembled into mixes.

pub mod engine;
pub mod invalid;
pub mod options;
pub mod strategy;
pub mod variant;

pub use engine::{CombinationEngine, CombinationOptions, PlannedMix};
pub use invalid::{plan_groups, Candidate, ElementCandidates, PlannedGroup};
pub use options::{CombinationOption, InvalidOption, OptionError, VariantSelectionOption};
pub use strategy::CombinationStrategy;
pub use variant::Ranked;
