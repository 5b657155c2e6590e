// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// The maximum target dimension, in pixels.
pub const MAX_TARGET_SIZE: u32 = 4096;

/// The maximum dimension a derived default target can have, in pixels.
///
/// See [`TargetBox::from_size`].
pub const MAX_DEFAULT_SIZE: u32 = 2048;

/// A 2D floating-point size.
///
/// Width and height are guarantee to be finite and > 0.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    /// Creates a new `Size` from values.
    #[inline]
    pub fn from_wh(width: f64, height: f64) -> Option<Self> {
        if width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0 {
            Some(Size { width, height })
        } else {
            None
        }
    }

    /// Returns width.
    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns height.
    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Converts the current size to `IntSize`, rounding to the nearest pixel.
    #[inline]
    pub fn to_int_size(&self) -> IntSize {
        IntSize::new(
            std::cmp::max(1, self.width.round() as u32),
            std::cmp::max(1, self.height.round() as u32),
        )
        .unwrap()
    }

    /// Scales current size until it fits inside `to`, keeping the aspect ratio.
    ///
    /// The binding axis is copied from `to` verbatim; the other one is derived
    /// in floating point and rounded once at the end, so repeated fitting
    /// doesn't accumulate rounding error. The result never exceeds `to` on
    /// either axis and fitting a size into itself returns it unchanged.
    pub fn scale_to(&self, to: IntSize) -> IntSize {
        let aspect = self.width / self.height;
        let (width, height) = if to.width() as f64 / to.height() as f64 > aspect {
            (to.height() as f64 * aspect, to.height() as f64)
        } else {
            (to.width() as f64, to.width() as f64 / aspect)
        };

        IntSize::new(
            std::cmp::max(1, width.round() as u32),
            std::cmp::max(1, height.round() as u32),
        )
        .unwrap()
    }
}

/// A 2D integer size representation.
///
/// Width and height are guarantee to be > 0.
#[derive(Clone, Copy, PartialEq)]
pub struct IntSize {
    width: u32,
    height: u32,
}

impl IntSize {
    /// Creates a new `IntSize` from values.
    #[inline]
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width > 0 && height > 0 {
            Some(IntSize { width, height })
        } else {
            None
        }
    }

    /// Returns width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns width and height as a tuple.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl std::fmt::Debug for IntSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "IntSize({} {})", self.width, self.height)
    }
}

impl std::fmt::Display for IntSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The requested output box.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TargetBox {
    width: u32,
    height: u32,
    /// Fit the output inside the box, keeping the document's aspect ratio.
    ///
    /// When unset, the document is stretched to the box exactly.
    pub keep_aspect_ratio: bool,
}

impl TargetBox {
    /// Creates a new `TargetBox` with the aspect ratio locked.
    ///
    /// Returns `None` when either dimension is outside `1..=MAX_TARGET_SIZE`.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if (1..=MAX_TARGET_SIZE).contains(&width) && (1..=MAX_TARGET_SIZE).contains(&height) {
            Some(TargetBox {
                width,
                height,
                keep_aspect_ratio: true,
            })
        } else {
            None
        }
    }

    /// Derives a default target box from the document's own size.
    ///
    /// The intrinsic size is used verbatim, uniformly downscaled when either
    /// axis exceeds `MAX_DEFAULT_SIZE`. Small documents are never upscaled.
    pub fn from_size(intrinsic: Size) -> Self {
        let size = if intrinsic.width() > MAX_DEFAULT_SIZE as f64
            || intrinsic.height() > MAX_DEFAULT_SIZE as f64
        {
            intrinsic.scale_to(IntSize::new(MAX_DEFAULT_SIZE, MAX_DEFAULT_SIZE).unwrap())
        } else {
            intrinsic.to_int_size()
        };

        TargetBox {
            width: size.width(),
            height: size.height(),
            keep_aspect_ratio: true,
        }
    }

    /// Returns width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the box as `IntSize`.
    #[inline]
    pub fn size(&self) -> IntSize {
        // Can't fail, because `TargetBox` is always valid.
        IntSize::new(self.width, self.height).unwrap()
    }
}

impl Default for TargetBox {
    fn default() -> Self {
        TargetBox {
            width: 512,
            height: 512,
            keep_aspect_ratio: true,
        }
    }
}

/// Computes the final output size for `target`.
///
/// The target box is used verbatim when the aspect-ratio lock is off
/// or when the document's intrinsic size is unknown.
pub fn fit_target(intrinsic: Option<Size>, target: &TargetBox) -> IntSize {
    match intrinsic {
        Some(size) if target.keep_aspect_ratio => size.scale_to(target.size()),
        _ => target.size(),
    }
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! fit {
        ($name:ident, $size:expr, $target:expr, $result:expr) => (
            #[test]
            fn $name() {
                let (sw, sh) = $size;
                let (tw, th) = $target;
                let size = Size::from_wh(sw, sh).unwrap();
                let target = IntSize::new(tw, th).unwrap();
                assert_eq!(size.scale_to(target).dimensions(), $result);
            }
        )
    }

    fit!(fit_1, (200.0, 100.0),  (512, 512), (512, 256));
    fit!(fit_2, (100.0, 200.0),  (512, 512), (256, 512));
    fit!(fit_3, (300.0, 400.0),  (300, 400), (300, 400));
    fit!(fit_4, (3.0, 2.0),      (512, 512), (512, 341));
    fit!(fit_5, (1000.0, 1.0),   (100, 100), (100, 1));
    fit!(fit_6, (512.0, 512.0),  (100, 300), (100, 100));

    #[test]
    fn refit_is_identity() {
        let size = Size::from_wh(200.0, 100.0).unwrap();
        let fitted = size.scale_to(IntSize::new(512, 512).unwrap());
        let refitted = Size::from_wh(fitted.width() as f64, fitted.height() as f64)
            .unwrap()
            .scale_to(fitted);
        assert_eq!(refitted, fitted);
    }

    #[test]
    fn invalid_sizes() {
        assert!(Size::from_wh(0.0, 100.0).is_none());
        assert!(Size::from_wh(100.0, -1.0).is_none());
        assert!(Size::from_wh(f64::NAN, 100.0).is_none());
        assert!(Size::from_wh(100.0, f64::INFINITY).is_none());
        assert!(IntSize::new(0, 100).is_none());
    }

    #[test]
    fn target_box_bounds() {
        assert!(TargetBox::new(0, 100).is_none());
        assert!(TargetBox::new(100, 4097).is_none());
        assert!(TargetBox::new(1, 4096).is_some());
    }

    #[test]
    fn fit_target_unlocked_is_verbatim() {
        let mut target = TargetBox::new(300, 400).unwrap();
        target.keep_aspect_ratio = false;
        let intrinsic = Size::from_wh(200.0, 100.0).unwrap();
        assert_eq!(fit_target(Some(intrinsic), &target).dimensions(), (300, 400));
    }

    #[test]
    fn fit_target_without_intrinsic_is_verbatim() {
        let target = TargetBox::new(300, 400).unwrap();
        assert_eq!(fit_target(None, &target).dimensions(), (300, 400));
    }

    #[test]
    fn derived_default_is_downscaled() {
        let target = TargetBox::from_size(Size::from_wh(4000.0, 1000.0).unwrap());
        assert_eq!(target.size().dimensions(), (2048, 512));
        assert!(target.keep_aspect_ratio);
    }

    #[test]
    fn derived_default_is_not_upscaled() {
        let target = TargetBox::from_size(Size::from_wh(300.4, 200.0).unwrap());
        assert_eq!(target.size().dimensions(), (300, 200));
    }
}
