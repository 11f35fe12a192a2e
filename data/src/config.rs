pub mod api_key;
pub mod state;
pub mod theme;
