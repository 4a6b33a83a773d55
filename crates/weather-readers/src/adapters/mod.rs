//! One module per source. Each adapter is a small struct implementing
//! [`crate::reader::Reader`]; the registry that maps a connection-type tag
//! to a reader factory lives in the collector crate, not here.

pub mod ecowitt;
pub mod holfuy;
pub mod meteoclimatic;
pub mod realtime;
pub mod thingspeak;
pub mod weatherlink_v1;
pub mod weatherlink_v2;
pub mod wunderground;

pub use ecowitt::EcowittReader;
pub use holfuy::HolfuyReader;
pub use meteoclimatic::MeteoclimaticReader;
pub use realtime::RealtimeReader;
pub use thingspeak::ThingspeakReader;
pub use weatherlink_v1::WeatherlinkV1Reader;
pub use weatherlink_v2::WeatherlinkV2Reader;
pub use wunderground::WundergroundReader;
