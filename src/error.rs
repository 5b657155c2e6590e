// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// List of all errors.
#[derive(Debug)]
pub enum Error {
    /// The document doesn't declare a usable intrinsic size.
    ///
    /// Neither a valid `viewBox` nor positive, unit-less `width`/`height`
    /// attributes were found on the root element.
    ///
    /// [`convert`](crate::convert) absorbs this error and falls back to the
    /// requested target box. It is surfaced only by the resolver itself.
    UnresolvableDimensions,

    /// Failed to parse or render the document.
    Rasterization(String),

    /// Failed to encode the pixel buffer into PNG.
    ///
    /// Cannot occur for buffers produced by this crate. Kept so that the
    /// encoder doesn't have to panic on a misbehaving sink.
    Encoding(png::EncodingError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::UnresolvableDimensions => {
                write!(f, "the document has no usable intrinsic size")
            }
            Error::Rasterization(ref e) => {
                write!(f, "SVG rasterization failed cause {}", e)
            }
            Error::Encoding(ref e) => {
                write!(f, "PNG encoding failed cause {}", e)
            }
        }
    }
}

impl std::error::Error for Error {}
