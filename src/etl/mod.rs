//! Extract and decode stages: raw logs in, [`DecodedLog`](crate::event::DecodedLog)s out.

pub mod decoder;
pub mod extractor;
pub mod log;

pub use decoder::ForwarderDecoder;
pub use extractor::JsonLogSource;
pub use log::RawLog;
