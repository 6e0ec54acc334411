pub mod range_transport;

pub use range_transport::RangeTransport;
