// Domain layer: moderation models and ports (interfaces) to the remote service and the display.

pub mod model;
pub mod ports;
