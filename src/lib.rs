//! Logo icons for a browser extension.
//!
//! Three ways to produce `icon{size}.png` files: synthesize the built-in
//! pattern ([`logo`]), crop a user image with size/offset percentages
//! ([`crop::process_logo`]) or center-crop it ([`crop::update_logo`]).

pub mod crop;
pub mod error;
pub mod icon_writer;
pub mod logo;
pub mod manifest_json;
pub mod verify;

pub use error::{LogoError, Result};
