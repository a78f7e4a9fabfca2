// Run history: a summary of every completed analysis, searchable and deletable.
// Storage sits behind the RunStore trait; the default backend is in-memory.

pub mod handlers;
pub mod store;
