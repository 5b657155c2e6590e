// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`svg2png` converts SVG documents into fixed-size PNG images.

The pipeline resolves the document's intrinsic size, fits the requested
target box against it (optionally preserving the aspect ratio), renders the
document on top of an optional background fill and encodes the result as an
RGBA8 PNG.

SVG parsing and rendering are delegated to [`usvg`] and [`resvg`]; this
crate owns the sizing policy, the compositing policy, the encoding and the
failure mapping around them.

```no_run
let data = std::fs::read("image.svg").unwrap();
let png = svg2png::convert(&data, &svg2png::Options::default()).unwrap();
png.save("image.png").unwrap();
```
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::uninlined_format_args)]

pub use usvg;

use usvg::fontdb;
use usvg::roxmltree;

mod dimensions;
mod encode;
mod error;
mod geom;
mod render;

pub use error::Error;
pub use geom::{fit_target, IntSize, Size, TargetBox, MAX_DEFAULT_SIZE, MAX_TARGET_SIZE};

/// Background fill for regions the document doesn't cover.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Background {
    /// Leave uncovered pixels at zero alpha.
    Transparent,
    /// Fill the whole buffer with an opaque color before drawing.
    Color {
        /// Red component.
        red: u8,
        /// Green component.
        green: u8,
        /// Blue component.
        blue: u8,
    },
}

impl Default for Background {
    fn default() -> Self {
        Background::Transparent
    }
}

impl std::str::FromStr for Background {
    type Err = svgtypes::Error;

    /// Parses from the `transparent` keyword or any CSS color
    /// (`#fff`, `#fff000`, `red`).
    ///
    /// A fully transparent color maps to `Transparent`; any other alpha is
    /// discarded, since the background fill is always opaque.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let color: svgtypes::Color = text.parse()?;
        if color.alpha == 0 {
            Ok(Background::Transparent)
        } else {
            Ok(Background::Color {
                red: color.red,
                green: color.green,
                blue: color.blue,
            })
        }
    }
}

/// Conversion options.
///
/// One value of this type carries everything a single [`convert`] call needs,
/// so repeated conversions with changed settings are independent calls over
/// fresh request data.
pub struct Options {
    /// The requested output box. Default: 512x512 with the aspect ratio locked.
    pub target: TargetBox,

    /// Background fill. Default: transparent.
    pub background: Background,

    /// Directory used during relative paths resolving for `image` elements.
    ///
    /// Expected to be the same as the directory that contains the SVG file,
    /// but can be set to any. Default: `None`.
    pub resources_dir: Option<std::path::PathBuf>,

    /// Font database used during text to path conversion.
    ///
    /// Empty by default; load system fonts or font files into it when the
    /// documents contain text.
    pub fontdb: fontdb::Database,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            target: TargetBox::default(),
            background: Background::Transparent,
            resources_dir: None,
            fontdb: fontdb::Database::new(),
        }
    }
}

/// A finished conversion.
pub struct Png {
    data: Vec<u8>,
    size: IntSize,
}

impl Png {
    /// Returns the encoded PNG data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the output size in pixels.
    ///
    /// Can differ from the requested box when the aspect ratio was kept.
    pub fn size(&self) -> IntSize {
        self.size
    }

    /// Returns the underlying data.
    pub fn take(self) -> Vec<u8> {
        self.data
    }

    /// Saves the PNG at the provided path.
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> std::io::Result<()> {
        std::fs::write(path, &self.data)
    }
}

/// Converts an SVG document into a PNG image.
///
/// `data` must be UTF-8 encoded SVG markup. The requested target box is
/// fitted against the document's intrinsic size when the aspect-ratio lock
/// is on; a document without a usable intrinsic size is still converted,
/// just with the lock inert.
///
/// Returns either a complete [`Png`] or an [`Error`], never partial output.
pub fn convert(data: &[u8], opt: &Options) -> Result<Png, Error> {
    let text = std::str::from_utf8(data)
        .map_err(|_| Error::Rasterization("provided data has not an UTF-8 encoding".to_string()))?;

    let xml_opt = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let xml = roxmltree::Document::parse_with_options(text, xml_opt)
        .map_err(|e| Error::Rasterization(e.to_string()))?;

    // Not knowing the document's own size only disables the aspect lock.
    let intrinsic = dimensions::resolve(&xml).ok().log_none(|| {
        log::warn!("The document has no usable intrinsic size. The aspect ratio will not be kept.")
    });

    let size = geom::fit_target(intrinsic, &opt.target);
    let pixmap = render::rasterize(&xml, size, opt.background, opt)?;
    let data = encode::encode(pixmap)?;

    Ok(Png { data, size })
}

/// Proposes a default target box for the provided document.
///
/// The box equals the document's intrinsic size, uniformly downscaled when
/// either axis exceeds [`MAX_DEFAULT_SIZE`]. When the document cannot be
/// parsed or declares no usable size, the default 512x512 box is returned.
pub fn propose_target(data: &[u8]) -> TargetBox {
    let intrinsic = std::str::from_utf8(data).ok().and_then(|text| {
        let xml_opt = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let xml = roxmltree::Document::parse_with_options(text, xml_opt).ok()?;
        dimensions::resolve(&xml).ok()
    });

    match intrinsic {
        Some(size) => TargetBox::from_size(size),
        None => TargetBox::default(),
    }
}

trait OptionLog {
    fn log_none<F: FnOnce()>(self, f: F) -> Self;
}

impl<T> OptionLog for Option<T> {
    #[inline]
    fn log_none<F: FnOnce()>(self, f: F) -> Self {
        self.or_else(|| {
            f();
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn background_from_str() {
        assert_eq!(
            Background::from_str("transparent").unwrap(),
            Background::Transparent
        );
        assert_eq!(
            Background::from_str("#fff").unwrap(),
            Background::Color {
                red: 255,
                green: 255,
                blue: 255
            }
        );
        assert_eq!(
            Background::from_str("#ff8000").unwrap(),
            Background::Color {
                red: 255,
                green: 128,
                blue: 0
            }
        );
        assert_eq!(
            Background::from_str("red").unwrap(),
            Background::Color {
                red: 255,
                green: 0,
                blue: 0
            }
        );
        assert_eq!(
            Background::from_str("rgba(10, 20, 30, 0)").unwrap(),
            Background::Transparent
        );
        assert!(Background::from_str("not-a-color").is_err());
    }

    #[test]
    fn propose_target_falls_back_to_default() {
        assert_eq!(propose_target(b"not xml at all"), TargetBox::default());
        assert_eq!(
            propose_target(b"<svg xmlns='http://www.w3.org/2000/svg'/>"),
            TargetBox::default()
        );
    }

    #[test]
    fn propose_target_uses_intrinsic_size() {
        let target =
            propose_target(b"<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 4000 1000'/>");
        assert_eq!(target.size().dimensions(), (2048, 512));
        assert!(target.keep_aspect_ratio);
    }
}
