pub mod http_transport;
pub mod probe_info;
pub mod range_response;
pub mod transport_error;

pub use http_transport::{HttpTransport, DEFAULT_USER_AGENT};
pub use probe_info::ProbeInfo;
pub use range_response::{BodyStream, RangeResponse};
pub use transport_error::TransportError;
