pub mod impl_range_transport;
