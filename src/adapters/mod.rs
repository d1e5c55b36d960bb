// Adapters layer: concrete implementations of the domain ports (HTTP service, terminal display).

pub mod http;
pub mod terminal;
