// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use usvg::roxmltree;

use crate::error::Error;
use crate::geom::IntSize;
use crate::{Background, Options};

/// Renders an already-parsed document into a pixel buffer of exactly `size`.
///
/// The buffer starts out fully transparent, or filled with the background
/// color at full alpha. The document is then composited on top with a plain
/// scale to `size`. The aspect ratio was already applied by the fitter, so
/// an anisotropic scale here is intentional.
pub fn rasterize(
    xml: &roxmltree::Document,
    size: IntSize,
    background: Background,
    opt: &Options,
) -> Result<tiny_skia::Pixmap, Error> {
    // The tree is built with `default_size` set to the output size, so
    // documents without any size of their own still fill the buffer.
    let usvg_opt = usvg::Options {
        resources_dir: opt.resources_dir.clone(),
        default_size: usvg::Size::from_wh(size.width() as f32, size.height() as f32).unwrap(),
        ..usvg::Options::default()
    };

    let tree = usvg::Tree::from_xmltree(xml, &usvg_opt, &opt.fontdb)
        .map_err(|e| Error::Rasterization(e.to_string()))?;

    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| Error::Rasterization("failed to allocate the pixel buffer".to_string()))?;

    if let Background::Color { red, green, blue } = background {
        pixmap.fill(tiny_skia::Color::from_rgba8(red, green, blue, 255));
    }

    let ts = tiny_skia::Transform::from_scale(
        size.width() as f32 / tree.size().width(),
        size.height() as f32 / tree.size().height(),
    );

    resvg::render(&tree, ts, &mut pixmap.as_mut());

    Ok(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rasterize_str(text: &str, size: IntSize, background: Background) -> tiny_skia::Pixmap {
        let doc = roxmltree::Document::parse(text).unwrap();
        rasterize(&doc, size, background, &Options::default()).unwrap()
    }

    #[test]
    fn transparent_background_stays_transparent() {
        let pixmap = rasterize_str(
            "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 10 10'/>",
            IntSize::new(4, 4).unwrap(),
            Background::Transparent,
        );
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn background_fill_is_opaque() {
        let pixmap = rasterize_str(
            "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 10 10'/>",
            IntSize::new(4, 4).unwrap(),
            Background::Color {
                red: 128,
                green: 128,
                blue: 128,
            },
        );
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 255));
    }

    #[test]
    fn content_is_stretched_to_fill() {
        // A 10x10 viewBox fully covered by a red rect, stretched to 8x4.
        let pixmap = rasterize_str(
            "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 10 10'>\
             <rect width='10' height='10' fill='#ff0000'/></svg>",
            IntSize::new(8, 4).unwrap(),
            Background::Transparent,
        );
        assert!(pixmap.pixels().iter().all(|p| p.red() == 255 && p.alpha() == 255));
    }

    #[test]
    fn invalid_tree_is_an_error() {
        // Parsed XML, but not an SVG document.
        let doc = roxmltree::Document::parse("<html xmlns='http://www.w3.org/1999/xhtml'/>")
            .unwrap();
        let result = rasterize(
            &doc,
            IntSize::new(4, 4).unwrap(),
            Background::Transparent,
            &Options::default(),
        );
        assert!(matches!(result, Err(Error::Rasterization(_))));
    }
}
