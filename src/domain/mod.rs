// Domain layer: value types and ports. Adapters live under core/ and config/.

pub mod model;
pub mod ports;
