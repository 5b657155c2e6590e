// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use rgb::FromSlice;

use crate::error::Error;

/// Encodes the pixel buffer into an in-memory PNG.
///
/// The buffer is consumed: tiny-skia stores premultiplied RGBA and the alpha
/// has to be demultiplied in place before encoding, since PNG expects
/// straight alpha. Lossless, 8-bit RGBA.
pub fn encode(pixmap: tiny_skia::Pixmap) -> Result<Vec<u8>, Error> {
    let width = pixmap.width();
    let height = pixmap.height();

    let mut data = pixmap.take();
    demultiply_alpha(data.as_rgba_mut());

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().map_err(Error::Encoding)?;
        writer.write_image_data(&data).map_err(Error::Encoding)?;
    }

    Ok(png_data)
}

/// Demultiplies provided pixels alpha.
///
/// Zero alpha produces NaN, which saturates to 0, so fully transparent
/// pixels come out as `(0, 0, 0, 0)`.
fn demultiply_alpha(data: &mut [rgb::RGBA8]) {
    for p in data {
        let a = p.a as f64 / 255.0;
        p.b = (p.b as f64 / a + 0.5) as u8;
        p.g = (p.g as f64 / a + 0.5) as u8;
        p.r = (p.r as f64 / a + 0.5) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demultiply() {
        let mut data = vec![
            rgb::RGBA8::new(128, 64, 0, 128),
            rgb::RGBA8::new(0, 0, 0, 0),
            rgb::RGBA8::new(255, 255, 255, 255),
        ];
        demultiply_alpha(&mut data);
        assert_eq!(data[0], rgb::RGBA8::new(255, 128, 0, 128));
        assert_eq!(data[1], rgb::RGBA8::new(0, 0, 0, 0));
        assert_eq!(data[2], rgb::RGBA8::new(255, 255, 255, 255));
    }

    #[test]
    fn encode_keeps_size_and_alpha() {
        let mut pixmap = tiny_skia::Pixmap::new(3, 2).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(10, 20, 30, 255));
        let data = encode(pixmap).unwrap();

        let decoder = png::Decoder::new(data.as_slice());
        let mut reader = decoder.read_info().unwrap();
        let mut img_data = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut img_data).unwrap();

        assert_eq!((info.width, info.height), (3, 2));
        assert_eq!(info.color_type, png::ColorType::Rgba);
        assert_eq!(&img_data[0..4], &[10, 20, 30, 255]);
    }
}
