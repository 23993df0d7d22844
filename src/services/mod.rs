pub mod pagination;
pub mod popularity;
pub mod posters;
pub mod providers;
pub mod recommendations;
pub mod title_search;
