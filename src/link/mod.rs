//! Client link plumbing.
//!
//! [`commands`] turns inbound client JSON into mode/payload mutations on
//! the arbiter; [`pump`] forwards queued result messages to the connected
//! client. The wireless transport itself (BLE GATT server, advertising,
//! characteristic wiring) is an external collaborator that calls into
//! these entry points.

pub mod commands;
pub mod pump;
