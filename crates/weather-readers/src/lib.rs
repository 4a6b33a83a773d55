pub mod adapters;
pub mod benchmark;
pub mod http;
pub mod reader;

pub use benchmark::BenchmarkReader;
pub use reader::{coalesce, json_number, latest_timestamp, max_or_none, min_or_none, RawEnvelope, RawPayload, Reader, ReaderFactory};
