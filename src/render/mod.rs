//! Page markup as pure functions of a [`PageSnapshot`](crate::orchestrator::PageSnapshot).

mod components;
mod page;

pub use components::{movie_card, search_box, spinner, trending_section};
pub use page::{page, results_section};
