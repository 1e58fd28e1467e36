//! Native scanline transforms into planar YUV420P.
//!
//! Each transform walks the source two rows at a time and writes one luma
//! row pair plus one chroma row per plane. Chroma for a 2x2 block is taken
//! from its top row only. All planes are checked before the first byte is
//! written.

use byteorder::ByteOrder;
use itertools::izip;

use crate::{
    colorspace::{luma, rgb_to_yuv444},
    frame::{checked_plane_mut, FrameMut, FrameRef},
    pixfmt::PixFmt,
    Error, Result,
};

/// Word order used for packed source pixels and for packed luma pairs.
///
/// Packed pixels are read, and luma pairs written, as host native words. On
/// little-endian hosts this matches the usual byte layouts: RGB32 is
/// `B G R X`, YUYV422 is `Y0 U Y1 V` and UYVY422 is `U Y0 V Y1`. Big-endian
/// hosts will see swapped samples.
pub type PackedWordOrder = byteorder::NativeEndian;

/// A native transform from one pixel format into another.
pub type TransformFn = for<'d, 's> fn(&mut FrameMut<'d>, &FrameRef<'s>) -> Result<()>;

/// Output of one 2x2 block.
struct Block420 {
    top: [u8; 2],
    bottom: [u8; 2],
    u: u8,
    v: u8,
}

/// Luma of the left pixel in the low byte, right pixel in the high byte.
#[inline]
fn luma_word(pair: [u8; 2]) -> u16 {
    u16::from(pair[0]) | (u16::from(pair[1]) << 8)
}

#[inline]
fn rgb32_pixel(px: &[u8]) -> (u8, u8, u8) {
    let word = PackedWordOrder::read_u32(px);
    ((word >> 16) as u8, (word >> 8) as u8, word as u8)
}

#[inline]
fn rgb32_luma(px: &[u8]) -> u8 {
    let (r, g, b) = rgb32_pixel(px);
    luma(r, g, b)
}

fn rgb32_block(top: &[u8], bottom: &[u8]) -> Block420 {
    let (r, g, b) = rgb32_pixel(&top[0..4]);
    let top_left = rgb_to_yuv444(r, g, b);
    Block420 {
        top: [top_left.y, rgb32_luma(&top[4..8])],
        bottom: [rgb32_luma(&bottom[0..4]), rgb32_luma(&bottom[4..8])],
        u: top_left.u,
        v: top_left.v,
    }
}

/// Bit offsets of the samples in a packed 4:2:2 pixel pair word.
struct Packed422 {
    y0: u32,
    u: u32,
    y1: u32,
    v: u32,
}

const YUYV: Packed422 = Packed422 {
    y0: 0,
    u: 8,
    y1: 16,
    v: 24,
};

const UYVY: Packed422 = Packed422 {
    u: 0,
    y0: 8,
    v: 16,
    y1: 24,
};

impl Packed422 {
    fn block(&self, top: &[u8], bottom: &[u8]) -> Block420 {
        let top = PackedWordOrder::read_u32(top);
        let bottom = PackedWordOrder::read_u32(bottom);
        Block420 {
            top: [(top >> self.y0) as u8, (top >> self.y1) as u8],
            bottom: [(bottom >> self.y0) as u8, (bottom >> self.y1) as u8],
            u: (top >> self.u) as u8,
            v: (top >> self.v) as u8,
        }
    }
}

fn check_formats(dst: &FrameMut<'_>, src: &FrameRef<'_>, src_fmt: PixFmt) -> Result<()> {
    if src.format != src_fmt || dst.format != PixFmt::YUV420P {
        return Err(Error::UnsupportedConversion {
            src: src.format,
            src_size: src.size,
            dst: dst.format,
            dst_size: dst.size,
        });
    }
    if src.size != dst.size {
        return Err(Error::SizeMismatch {
            src: src.size,
            dst: dst.size,
        });
    }
    Ok(())
}

/// Walk 2x2 blocks of a single plane packed source and fill the three
/// YUV420P planes of `dst`.
///
/// `block_bytes` is the number of source bytes covering two pixels of one
/// row.
fn blocks_into_yuv420p<K>(
    dst: &mut FrameMut<'_>,
    src: &FrameRef<'_>,
    block_bytes: usize,
    kernel: K,
) -> Result<()>
where
    K: Fn(&[u8], &[u8]) -> Block420,
{
    let w2 = dst.size.width as usize / 2;
    let h2 = dst.size.height as usize / 2;

    let src_layout = src.format.layout(src.size);
    let src_plane = src.checked_plane(0, &src_layout.planes()[0])?;

    let dst_fmt = dst.format;
    let dst_layout = PixFmt::YUV420P.layout(dst.size);
    let layouts = dst_layout.planes();
    let [y_slot, u_slot, v_slot, _] = dst.planes_mut();
    let (y_plane, y_stride) = checked_plane_mut(y_slot, dst_fmt, 0, &layouts[0])?;
    let (u_plane, u_stride) = checked_plane_mut(u_slot, dst_fmt, 1, &layouts[1])?;
    let (v_plane, v_stride) = checked_plane_mut(v_slot, dst_fmt, 2, &layouts[2])?;

    if w2 == 0 || h2 == 0 {
        return Ok(());
    }

    let src_stride = src_plane.stride;
    let src_row_bytes = w2 * block_bytes;
    let luma_row_bytes = w2 * 2;

    let rows = izip!(
        src_plane.data.chunks(2 * src_stride),
        y_plane.chunks_mut(2 * y_stride),
        u_plane.chunks_mut(u_stride),
        v_plane.chunks_mut(v_stride),
    );
    for (src_pair, y_pair, u_row, v_row) in rows.take(h2) {
        let src_top = &src_pair[..src_row_bytes];
        let src_bottom = &src_pair[src_stride..(src_stride + src_row_bytes)];
        let (y_top, y_rest) = y_pair.split_at_mut(y_stride);

        for (top, bottom, y_top_word, y_bottom_word, u, v) in izip!(
            src_top.chunks_exact(block_bytes),
            src_bottom.chunks_exact(block_bytes),
            y_top[..luma_row_bytes].chunks_exact_mut(2),
            y_rest[..luma_row_bytes].chunks_exact_mut(2),
            &mut u_row[..w2],
            &mut v_row[..w2],
        ) {
            let block = kernel(top, bottom);
            PackedWordOrder::write_u16(y_top_word, luma_word(block.top));
            PackedWordOrder::write_u16(y_bottom_word, luma_word(block.bottom));
            *u = block.u;
            *v = block.v;
        }
    }
    Ok(())
}

/// Convert packed RGB32 into planar YUV420P.
///
/// Chroma of each 2x2 block comes from its top-left pixel.
pub fn rgb32_to_yuv420p(dst: &mut FrameMut<'_>, src: &FrameRef<'_>) -> Result<()> {
    check_formats(dst, src, PixFmt::RGB32)?;
    blocks_into_yuv420p(dst, src, 8, rgb32_block)
}

/// Convert packed YUYV422 into planar YUV420P.
pub fn yuyv422_to_yuv420p(dst: &mut FrameMut<'_>, src: &FrameRef<'_>) -> Result<()> {
    check_formats(dst, src, PixFmt::YUYV422)?;
    blocks_into_yuv420p(dst, src, 4, |top, bottom| YUYV.block(top, bottom))
}

/// Convert packed UYVY422 into planar YUV420P.
pub fn uyvy422_to_yuv420p(dst: &mut FrameMut<'_>, src: &FrameRef<'_>) -> Result<()> {
    check_formats(dst, src, PixFmt::UYVY422)?;
    blocks_into_yuv420p(dst, src, 4, |top, bottom| UYVY.block(top, bottom))
}
