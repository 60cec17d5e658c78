pub mod candidates;
pub mod controller;
pub mod debouncer;
pub mod matcher;

pub use candidates::CandidateList;
pub use controller::{AutocompleteController, ControllerPhase, FILTER_DEBOUNCE};
pub use debouncer::{Debounced, Debouncer};
pub use matcher::Highlight;
