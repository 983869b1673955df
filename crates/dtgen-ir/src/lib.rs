pub mod case;
pub mod compat;
pub mod mix;
pub mod parse;
pub mod types;

pub use case::{
    Boundary, ComputationCase, DataTestCase, DataTestCaseGroup, FormatCase, RequiredCase, SetCase,
};
pub use compat::is_compatible;
pub use mix::{DataMix, DataOutcome, GapReason, MixEntry};
pub use parse::parse_elements;
pub use types::{CandidateSource, DataValue, UiElementSpec, ValueType};
