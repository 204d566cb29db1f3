pub mod api;
pub mod feed;
pub mod payload;
pub mod state;
