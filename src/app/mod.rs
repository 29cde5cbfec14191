//! Application layer: port traits, shared state and the [`RgbLed`](service::RgbLed)
//! owning context.

pub mod ports;
pub mod service;
pub mod shared;
