// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use usvg::roxmltree;

use crate::error::Error;
use crate::geom::Size;

/// Resolves the intrinsic size of a parsed document.
///
/// A `viewBox` on the root element wins; its width/height are the 3rd and 4th
/// numbers. An ill-formed `viewBox` (fewer than four numbers, non-numeric or
/// non-positive size) fails right away without falling back to the
/// `width`/`height` attributes.
///
/// Without a `viewBox`, the `width`/`height` attributes are read as plain
/// unit-less numbers. Missing or suffixed values (`100%`, `10px`) count
/// as zero and therefore fail.
pub fn resolve(doc: &roxmltree::Document) -> Result<Size, Error> {
    let root = doc.root_element();

    if let Some(text) = root.attribute("viewBox") {
        let vb: svgtypes::ViewBox = text.parse().map_err(|_| Error::UnresolvableDimensions)?;
        return Size::from_wh(vb.w, vb.h).ok_or(Error::UnresolvableDimensions);
    }

    let width = root.attribute("width").map_or(0.0, parse_number);
    let height = root.attribute("height").map_or(0.0, parse_number);
    Size::from_wh(width, height).ok_or(Error::UnresolvableDimensions)
}

fn parse_number(text: &str) -> f64 {
    text.trim().parse().unwrap_or(0.0)
}
