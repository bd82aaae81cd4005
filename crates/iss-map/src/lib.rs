//! Label matching engine.
//!
//! Scores core labels against study labels with TF-IDF cosine similarity,
//! accepts the best candidate above a threshold, re-scores edited rows and
//! compiles per-row derivations.

pub mod analyze;
pub mod derive;
pub mod error;
pub mod handle;
pub mod score;
pub mod select;
pub mod session;
pub mod vectorize;

pub use analyze::{StopWords, analyze};
pub use derive::{derivation_for, synthesize};
pub use error::{MapError, Result};
pub use handle::SessionHandle;
pub use score::SimilarityScorer;
pub use select::{DEFAULT_THRESHOLD, MatchOptions, MatchSelector, Selection};
pub use session::{MappingSession, StudyReference};
pub use vectorize::{TermVector, TfidfModel};
