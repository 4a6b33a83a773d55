pub mod collector;
pub mod config;
pub mod corrector;
pub mod persistence;
pub mod registry;
pub mod validator;

pub use collector::{chunk_boundaries, Gatherer, StationResult};
pub use config::Config;
pub use corrector::Corrector;
pub use persistence::{InMemoryStore, Persistence, StationStatus};
pub use registry::ReaderRegistry;
pub use validator::Validator;
