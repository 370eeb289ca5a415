pub mod params;
pub mod smile;
pub mod strike;
