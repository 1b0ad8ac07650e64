// library crate for dashvis
// decides whether dashboard sections and items are rendered, given the
// current entity states, an edit-mode flag, and the viewport

pub mod conditions;
pub mod dashboard;
pub mod entity;
pub mod screen;
