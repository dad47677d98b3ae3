//! Forward-operator and regularization assembly for 3D prism gravity
//! inversion.
//!
//! Channels and grid in, dense matrices out; solving is delegated to an
//! [`engine::InversionEngine`].

pub mod channel;
pub mod data;
pub mod depth_weight;
pub mod engine;
pub mod prism;
pub mod report;
pub mod sensitivity;
pub mod smoothness;
pub mod system;

pub use channel::{ChannelSet, Component, ObservationSet};
pub use system::GravityInversion;
