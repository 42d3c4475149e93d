pub mod completion;
pub mod eligibility;
pub mod index;
pub mod recommendations;
pub mod repair;
pub mod scoring;
pub mod student_lookup;

pub use recommendations::Recommender;
pub use scoring::{Jitter, NoJitter, SeededJitter, UniformJitter};
