pub mod fetch;
pub mod join;
pub mod niche;
pub mod stages;
