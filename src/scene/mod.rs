pub mod model;
pub mod templates;
