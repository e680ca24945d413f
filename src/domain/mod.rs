// Domain layer: models and ports. Concrete implementations live under adapters.

pub mod model;
pub mod ports;
