//! Value generation for data test cases.
//!
//! - [`random`]: the seeded [`RandomSource`] and typed random draws.
//! - [`raw`]: 13-position boundary generators per value type.
//! - [`set`], [`pattern`]: candidate-set and format generators.
//! - [`cache`]: per-run query cache and the [`Queryable`] data source trait.
//! - [`analyzer`]: valid / invalid / incompatible verdicts per element.
//! - [`dispatch`]: routes an (element, data test case) pair to a generator.

pub mod analyzer;
pub mod cache;
pub mod dispatch;
pub mod error;
pub mod pattern;
pub mod random;
pub mod raw;
pub mod set;

pub use analyzer::{analyze, Analysis, Validity};
pub use cache::{QueryCache, Queryable, Row, Rows};
pub use dispatch::{DataGenerator, ElementProfile, GeneratorOptions, SetSource};
pub use error::{GeneratorError, QueryError};
pub use pattern::RegexGenerator;
pub use random::{RandomDouble, RandomLong, RandomSource, RandomString};
pub use raw::{RangeDomain, RangeGenerator, RawDataGenerator, StringGenerator};
pub use set::{ListBasedGenerator, QueryBasedGenerator};
