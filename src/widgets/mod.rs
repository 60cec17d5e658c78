pub mod autocomplete;
pub mod suggestion_list;
pub mod text_edit;
pub mod text_field;
pub mod traits;

pub use autocomplete::{Autocomplete, Interactivity};
pub use suggestion_list::SuggestionList;
pub use text_field::TextField;
