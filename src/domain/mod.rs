// Domain layer: launch models and ports (interfaces). No process or terminal access here.

pub mod model;
pub mod ports;
