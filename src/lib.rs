pub mod acquire;
pub mod chart;
pub mod engine;
pub mod errors;
pub mod probe;
pub mod registry;
pub mod results;
pub mod sync;
pub mod template;
pub mod types;
