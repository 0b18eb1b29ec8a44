pub mod flatten;
pub mod host;
pub mod loader;
pub mod model;
