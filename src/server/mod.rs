mod ingest;
mod listen;
mod transport;

pub use ingest::Ingestor;
pub use listen::{Config, Server};
pub use transport::ZmqTransport;
