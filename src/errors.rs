// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors raised by the renderer.  Configuration problems are caught
//! when a plan is built; everything after that can only fail by being
//! cancelled or by losing a worker thread.

use failure::Fail;

/// Everything that can go wrong between configuring a render and
/// receiving its pixels.
#[derive(Debug, Fail, PartialEq)]
pub enum MandelbrotError {
    /// A configuration value is out of range.  Values are never
    /// silently clamped.
    #[fail(display = "invalid configuration: {}", _0)]
    InvalidConfig(String),

    /// The render's cancel token fired, either by hand or because its
    /// deadline passed.
    #[fail(display = "render cancelled")]
    Cancelled,

    /// One of the evaluation or coloring threads panicked.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,
}

/// Shorthand used throughout the crate.
pub type Result<T> = ::std::result::Result<T, MandelbrotError>;

pub(crate) fn invalid<T, S: Into<String>>(message: S) -> Result<T> {
    Err(MandelbrotError::InvalidConfig(message.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_displays_its_reason() {
        let err = MandelbrotError::InvalidConfig("samples must be at least 1".to_string());
        assert_eq!(
            format!("{}", err),
            "invalid configuration: samples must be at least 1"
        );
    }

    #[test]
    fn invalid_helper_wraps_message() {
        let r: Result<()> = invalid("bad");
        assert_eq!(r, Err(MandelbrotError::InvalidConfig("bad".to_string())));
    }
}
