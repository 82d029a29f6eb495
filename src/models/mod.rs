pub mod api;
pub mod params;
pub mod payload;
