//! Client for the photo album gateway
//!
//! [`controller::AlbumController`] owns the album state and drives it through
//! the pure reducer in [`state`], talking to the server through
//! [`gateway::GatewayClient`]. Large photos are shrunk by [`compression`]
//! before they leave the machine.

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

pub mod compression;
pub mod controller;
pub mod file;
pub mod format;
pub mod gateway;
pub mod gesture;
pub mod state;
