pub mod completions;
pub mod config;
pub mod edit_user;
pub mod listings;
pub mod remaining;
pub mod status;
