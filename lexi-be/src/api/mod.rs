//! HTTP API handlers for lexi-be

pub mod analytics;
pub mod assessment;
pub mod buildinfo;
pub mod exercises;
pub mod health;
pub mod lessons;
pub mod profiles;

pub use analytics::analytics_routes;
pub use assessment::assessment_routes;
pub use buildinfo::buildinfo_routes;
pub use exercises::exercise_routes;
pub use health::health_routes;
pub use lessons::lesson_routes;
pub use profiles::profile_routes;
