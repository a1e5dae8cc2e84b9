//! HTTP surfaces: the forwarding server and the stub upstream.

pub mod downstream;
pub mod shutdown;
pub mod stub_upstream;
