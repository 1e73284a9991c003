//! Similarity module - positional, angular and combined pose scores
//!
//! Re-exports only. All logic in submodules.

mod positional;
mod angular;
mod combined;

pub use positional::{calculate_similarity, cos_and_euc, mixed_score, CosAndEuc};
pub use angular::{angular_similarity, AngleWeights};
pub use combined::{heel_foot_similarity, SimilarityResult};
