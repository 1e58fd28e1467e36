//! Convert raw video frames between pixel formats.
//!
//! Frames are borrowed views ([FrameRef] for the source, [FrameMut] for the
//! destination) over buffers allocated by the caller. [FrameConverter]
//! dispatches on the source and destination [PixFmt] and writes into the
//! destination planes in place. Nothing here allocates pixel memory.
//!
//! ```
//! use vidconv::{FrameConverter, FrameMut, FrameRef, PixFmt, Size};
//!
//! let size = Size::new(2, 2);
//! let rgb32 = [0xffu8; 16];
//! let src = FrameRef::from_planes(PixFmt::RGB32, size, [(&rgb32[..], 8)]);
//!
//! let mut planes = PixFmt::YUV420P.layout(size).alloc_planes();
//! let strides: [usize; 3] = [2, 1, 1];
//! let mut dst = FrameMut::from_planes(
//!     PixFmt::YUV420P,
//!     size,
//!     planes.iter_mut().map(|p| &mut p[..]).zip(strides),
//! );
//!
//! FrameConverter::new().convert(Some(&mut dst), Some(&src), 0, false, false);
//! assert_eq!(dst.plane(0).unwrap(), &[255, 255, 255, 255]);
//! assert_eq!(dst.plane(1).unwrap(), &[128]);
//! ```

pub mod colorspace;
mod converter;
mod frame;
mod pixfmt;
pub mod transforms;

pub use converter::{Conversion, FrameConverter, GeneralConvert};
pub use frame::{FrameMut, FrameRef, PlaneMut, PlaneRef, Size, MAX_PLANES};
pub use pixfmt::{FrameLayout, PixFmt, PlaneLayout, UnknownPixFmt, ALL_PIXFMTS};
pub use transforms::{PackedWordOrder, TransformFn};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unsupported pixel format conversion {src}:{src_size} -> {dst}:{dst_size}")]
    UnsupportedConversion {
        src: PixFmt,
        src_size: Size,
        dst: PixFmt,
        dst_size: Size,
    },
    #[error("size mismatch {src} -> {dst} (scaling requires a general converter)")]
    SizeMismatch { src: Size, dst: Size },
    #[error("{fmt} frame has no plane {plane}")]
    MissingPlane { fmt: PixFmt, plane: usize },
    #[error("destination plane {plane} aliases a source plane and cannot be written")]
    ReadOnlyPlane { plane: usize },
    #[error("invalid stride {stride} for plane {plane} (minimum {min})")]
    InvalidStride {
        plane: usize,
        stride: usize,
        min: usize,
    },
    #[error("invalid buffer size {len} for plane {plane} (minimum {min})")]
    InvalidBufferSize { plane: usize, len: usize, min: usize },
    #[error("packed {fmt} frame has {len} bytes, expected {expected}")]
    InvalidPackedSize {
        fmt: PixFmt,
        len: usize,
        expected: usize,
    },
    #[error("general converter failed: {0}")]
    GeneralConvert(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}
