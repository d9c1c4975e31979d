//! # Domain Models
//!
//! Inputs the core receives from the service layer: the device record and
//! the per-call credentials.
//!
//! ## Security Design
//!
//! [`SecureString`] zeroes the secret on drop and never exposes it through
//! `Debug`. Credentials are never stored by this crate.

pub mod credentials;
pub mod device;

pub use credentials::{Credentials, SecureString, Username};
pub use device::{Device, DeviceTypeTag};
