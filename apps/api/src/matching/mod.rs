// Resume ↔ job-description matching engine.
// Pure, synchronous functions over immutable tables; handlers run them via spawn_blocking.

pub mod analysis;
pub mod ats;
pub mod experience;
pub mod handlers;
pub mod lexicon;
pub mod normalize;
pub mod sections;
pub mod similarity;
pub mod skills;
pub mod tfidf;
