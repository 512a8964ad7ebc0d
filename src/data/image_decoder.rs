// Copyright (C) 2024 Bellande Artificial Intelligence Computer Vision Research Innovation Center, Ronaldson Bellande

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::core::error::StegoError;
use crate::data::dataset_spec::ColorChannel;
use image::codecs::jpeg::JpegDecoder;
use image::io::Reader;
use image::{ColorType, DynamicImage, ImageDecoder, ImageFormat};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// 8-bit image in interleaved HWC layout, exactly as stored in the file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    width: usize,
    height: usize,
    channel: ColorChannel,
    pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn new(
        width: usize,
        height: usize,
        channel: ColorChannel,
        pixels: Vec<u8>,
    ) -> Result<Self, StegoError> {
        let expected = width * height * channel.channels();
        if pixels.len() != expected {
            return Err(StegoError::ShapeMismatch(format!(
                "Invalid pixel buffer size: expected {}, got {}",
                expected,
                pixels.len()
            )));
        }

        Ok(DecodedImage {
            width,
            height,
            channel,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channel(&self) -> ColorChannel {
        self.channel
    }

    pub fn channels(&self) -> usize {
        self.channel.channels()
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Value of channel `c` at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize, c: usize) -> Option<u8> {
        if x >= self.width || y >= self.height || c >= self.channels() {
            return None;
        }
        Some(self.pixels[(y * self.width + x) * self.channels() + c])
    }
}

/// Maps an `image` color type onto the channel tokens a dataset can request.
pub fn channel_of(color: ColorType) -> Option<ColorChannel> {
    match color {
        ColorType::L8 => Some(ColorChannel::L),
        ColorType::Rgb8 => Some(ColorChannel::Rgb),
        ColorType::Rgba8 => Some(ColorChannel::Rgba),
        _ => None,
    }
}

/// Maps a PNG header onto a channel token. Palette, gray+alpha and any depth
/// other than 8 bits have no token.
pub fn png_channel(color: png::ColorType, depth: png::BitDepth) -> Option<ColorChannel> {
    match (color, depth) {
        (png::ColorType::Grayscale, png::BitDepth::Eight) => Some(ColorChannel::L),
        (png::ColorType::Rgb, png::BitDepth::Eight) => Some(ColorChannel::Rgb),
        (png::ColorType::Rgba, png::BitDepth::Eight) => Some(ColorChannel::Rgba),
        _ => None,
    }
}

fn decode_error(path: &Path, reason: impl ToString) -> StegoError {
    StegoError::ImageDecodeError {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn open_buffered(path: &Path) -> Result<BufReader<File>, StegoError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| decode_error(path, e))
}

/// Guesses the container format from the file's leading bytes.
fn sniff_format(path: &Path) -> Result<ImageFormat, StegoError> {
    Reader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| decode_error(path, e))?
        .format()
        .ok_or_else(|| decode_error(path, "unrecognised image format"))
}

/// PNG reader that keeps samples exactly as stored: no palette expansion, no
/// tRNS alpha, no bit depth widening.
fn png_reader(path: &Path) -> Result<png::Reader<BufReader<File>>, StegoError> {
    let mut decoder = png::Decoder::new(open_buffered(path)?);
    decoder.set_transformations(png::Transformations::IDENTITY);
    decoder.read_info().map_err(|e| decode_error(path, e))
}

/// Color mode as recorded in the file header. PNG and JPEG only read the
/// header; other formats are decoded.
fn stored_channel(path: &Path) -> Result<Option<ColorChannel>, StegoError> {
    match sniff_format(path)? {
        ImageFormat::Png => {
            let reader = png_reader(path)?;
            let info = reader.info();
            Ok(png_channel(info.color_type, info.bit_depth))
        }
        ImageFormat::Jpeg => {
            let decoder = JpegDecoder::new(open_buffered(path)?).map_err(|e| decode_error(path, e))?;
            Ok(channel_of(decoder.color_type()))
        }
        _ => {
            let image = image::open(path).map_err(|e| decode_error(path, e))?;
            Ok(channel_of(image.color()))
        }
    }
}

/// Reports the native color mode of `path`, or `None` when the file cannot be
/// read or its mode is outside L/RGB/RGBA.
pub fn native_channel(path: &Path) -> Option<ColorChannel> {
    match stored_channel(path) {
        Ok(channel) => channel,
        Err(e) => {
            log::debug!("skipping unreadable image: {}", e);
            None
        }
    }
}

/// Decodes `path` without any conversion of its color mode or bit depth.
pub fn decode_image(path: &Path) -> Result<DecodedImage, StegoError> {
    match sniff_format(path)? {
        ImageFormat::Png => decode_png(path),
        _ => {
            let image = image::open(path).map_err(|e| decode_error(path, e))?;
            from_dynamic(image).map_err(|reason| decode_error(path, reason))
        }
    }
}

fn decode_png(path: &Path) -> Result<DecodedImage, StegoError> {
    let mut reader = png_reader(path)?;
    let info = reader.info();
    let channel = png_channel(info.color_type, info.bit_depth).ok_or_else(|| {
        decode_error(
            path,
            format!("unsupported PNG color {:?} at {:?}", info.color_type, info.bit_depth),
        )
    })?;

    let mut pixels = vec![0u8; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut pixels)
        .map_err(|e| decode_error(path, e))?;
    pixels.truncate(frame.buffer_size());

    DecodedImage::new(frame.width as usize, frame.height as usize, channel, pixels)
}

fn from_dynamic(image: DynamicImage) -> Result<DecodedImage, String> {
    let color = image.color();
    let channel = channel_of(color).ok_or_else(|| format!("unsupported color type {:?}", color))?;
    let width = image.width() as usize;
    let height = image.height() as usize;

    let pixels = match image {
        DynamicImage::ImageLuma8(buffer) => buffer.into_raw(),
        DynamicImage::ImageRgb8(buffer) => buffer.into_raw(),
        DynamicImage::ImageRgba8(buffer) => buffer.into_raw(),
        _ => return Err(format!("unsupported color type {:?}", color)),
    };

    DecodedImage::new(width, height, channel, pixels).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};
    use std::io::BufWriter;

    fn write_png(
        path: &Path,
        size: (u32, u32),
        color: png::ColorType,
        depth: png::BitDepth,
        configure: impl FnOnce(&mut png::Encoder<BufWriter<File>>),
        data: &[u8],
    ) {
        let file = BufWriter::new(File::create(path).unwrap());
        let mut encoder = png::Encoder::new(file, size.0, size.1);
        encoder.set_color(color);
        encoder.set_depth(depth);
        configure(&mut encoder);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn decodes_without_touching_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.png");
        let mut image = RgbImage::new(3, 2);
        image.put_pixel(2, 1, Rgb([1, 2, 255]));
        image.save(&path).unwrap();

        let decoded = decode_image(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
        assert_eq!(decoded.channel(), ColorChannel::Rgb);
        assert_eq!(decoded.pixel(2, 1, 0), Some(1));
        assert_eq!(decoded.pixel(2, 1, 2), Some(255));
        assert_eq!(decoded.pixel(3, 1, 0), None);
    }

    #[test]
    fn native_channel_reports_grayscale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        GrayImage::from_pixel(2, 2, Luma([7])).save(&path).unwrap();
        assert_eq!(native_channel(&path), Some(ColorChannel::L));
    }

    #[test]
    fn palette_png_has_no_channel_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("palette.png");
        write_png(
            &path,
            (2, 2),
            png::ColorType::Indexed,
            png::BitDepth::Eight,
            |encoder| encoder.set_palette(vec![0, 0, 0, 255, 255, 255]),
            &[0, 1, 1, 0],
        );

        assert_eq!(native_channel(&path), None);
        assert!(matches!(
            decode_image(&path),
            Err(StegoError::ImageDecodeError { .. })
        ));
    }

    #[test]
    fn one_bit_grayscale_has_no_channel_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bilevel.png");
        write_png(
            &path,
            (2, 2),
            png::ColorType::Grayscale,
            png::BitDepth::One,
            |_| {},
            &[0b1000_0000, 0b0100_0000],
        );

        assert_eq!(native_channel(&path), None);
    }

    #[test]
    fn rgb_with_transparency_stays_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trns.png");
        write_png(
            &path,
            (1, 2),
            png::ColorType::Rgb,
            png::BitDepth::Eight,
            |encoder| encoder.set_trns(vec![0, 0, 0, 0, 0, 0]),
            &[0, 0, 0, 9, 8, 7],
        );

        assert_eq!(native_channel(&path), Some(ColorChannel::Rgb));
        let decoded = decode_image(&path).unwrap();
        assert_eq!(decoded.channels(), 3);
        assert_eq!(decoded.pixels(), &[0, 0, 0, 9, 8, 7]);
    }

    #[test]
    fn jpeg_header_reports_grayscale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.jpg");
        GrayImage::from_pixel(8, 8, Luma([128])).save(&path).unwrap();
        assert_eq!(native_channel(&path), Some(ColorChannel::L));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        assert_eq!(native_channel(&path), None);
        assert!(matches!(
            decode_image(&path),
            Err(StegoError::ImageDecodeError { path: p, .. }) if p == path
        ));
    }
}
