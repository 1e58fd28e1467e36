use std::collections::HashMap;

use crate::{
    frame::{FrameMut, FrameRef},
    pixfmt::PixFmt,
    transforms::{self, TransformFn},
    Error, Result,
};

/// A general purpose converter used for pairs without a native transform.
///
/// Implementations may change both pixel format and size (for example a
/// wrapper around a software scaler).
pub trait GeneralConvert: Send + Sync {
    fn scale_and_convert(&self, dst: &mut FrameMut<'_>, src: &FrameRef<'_>) -> Result<()>;
}

/// Which path a successful conversion took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Formats were equal. The destination now re-views the source planes.
    Aliased,
    /// A native transform wrote the destination planes.
    Converted,
    /// The general converter handled the pair.
    Delegated,
}

/// Converts frames between pixel formats.
///
/// Dispatch is a lookup on the (source, destination) format pair. The
/// converter holds no per-frame state, so one instance can be shared between
/// threads converting independent frames.
pub struct FrameConverter {
    transforms: HashMap<(PixFmt, PixFmt), TransformFn>,
    fallback: Option<Box<dyn GeneralConvert>>,
}

impl Default for FrameConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut pairs: Vec<_> = self.transforms.keys().collect();
        pairs.sort_by_key(|(src, dst)| (src.as_str(), dst.as_str()));
        f.debug_struct("FrameConverter")
            .field("transforms", &pairs)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl FrameConverter {
    /// Create a converter with the built-in native transforms and no
    /// fallback.
    pub fn new() -> Self {
        let mut result = Self {
            transforms: HashMap::new(),
            fallback: None,
        };
        result.register(
            PixFmt::RGB32,
            PixFmt::YUV420P,
            transforms::rgb32_to_yuv420p,
        );
        result.register(
            PixFmt::YUYV422,
            PixFmt::YUV420P,
            transforms::yuyv422_to_yuv420p,
        );
        result.register(
            PixFmt::UYVY422,
            PixFmt::YUV420P,
            transforms::uyvy422_to_yuv420p,
        );
        result
    }

    /// Use `fallback` for pairs without a native transform.
    pub fn with_fallback<G>(mut self, fallback: G) -> Self
    where
        G: GeneralConvert + 'static,
    {
        self.fallback = Some(Box::new(fallback));
        self
    }

    /// Add or replace the native transform for a format pair.
    ///
    /// Returns the transform previously registered for the pair.
    pub fn register(
        &mut self,
        src: PixFmt,
        dst: PixFmt,
        transform: TransformFn,
    ) -> Option<TransformFn> {
        self.transforms.insert((src, dst), transform)
    }

    /// True if a native transform exists for the pair.
    pub fn has_native_path(&self, src: PixFmt, dst: PixFmt) -> bool {
        self.transforms.contains_key(&(src, dst))
    }

    /// Convert `src` into `dst`.
    ///
    /// Absent frames make this a no-op. Failures are logged and leave `dst`
    /// unmodified; use [FrameConverter::try_convert] to observe them.
    /// `rotate`, `hflip` and `vflip` are currently ignored.
    pub fn convert<'a>(
        &self,
        dst: Option<&mut FrameMut<'a>>,
        src: Option<&FrameRef<'a>>,
        rotate: i32,
        hflip: bool,
        vflip: bool,
    ) {
        let (Some(dst), Some(src)) = (dst, src) else {
            return;
        };

        // unused for now
        let _ = (rotate, hflip, vflip);

        if let Err(e) = self.try_convert(dst, src) {
            tracing::warn!("vidconv: {e}");
        }
    }

    /// Convert `src` into `dst` and report which path was taken.
    ///
    /// With equal formats no pixels are copied: `dst` takes over the source
    /// planes and strides. Native transforms require equal sizes; any other
    /// pair goes to the fallback if one was set.
    pub fn try_convert<'a>(&self, dst: &mut FrameMut<'a>, src: &FrameRef<'a>) -> Result<Conversion> {
        tracing::debug!(
            "vidconv: {}:{} ---> {}:{}",
            src.format,
            src.size,
            dst.format,
            dst.size
        );

        if src.format == dst.format {
            dst.alias(src);
            return Ok(Conversion::Aliased);
        }

        if src.size == dst.size {
            if let Some(&transform) = self.transforms.get(&(src.format, dst.format)) {
                transform(dst, src)?;
                return Ok(Conversion::Converted);
            }
        }

        match &self.fallback {
            Some(fallback) => {
                tracing::debug!("vidconv: using general converter");
                fallback.scale_and_convert(dst, src)?;
                Ok(Conversion::Delegated)
            }
            None => Err(Error::UnsupportedConversion {
                src: src.format,
                src_size: src.size,
                dst: dst.format,
                dst_size: dst.size,
            }),
        }
    }
}

fn _test_converter_is_send_sync() {
    // Compile-time test to ensure FrameConverter can be shared between threads.
    fn implements<T: Send + Sync>() {}
    implements::<FrameConverter>();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Size;

    #[test]
    fn builtin_pairs() {
        let conv = FrameConverter::new();
        assert!(conv.has_native_path(PixFmt::RGB32, PixFmt::YUV420P));
        assert!(conv.has_native_path(PixFmt::YUYV422, PixFmt::YUV420P));
        assert!(conv.has_native_path(PixFmt::UYVY422, PixFmt::YUV420P));
        assert!(!conv.has_native_path(PixFmt::ARGB, PixFmt::UYVY422));
        assert!(!conv.has_native_path(PixFmt::YUV420P, PixFmt::RGB32));
        let dbg = format!("{conv:?}");
        assert!(dbg.contains("fallback: false"), "{dbg}");
    }

    fn fill_yuv420p(dst: &mut FrameMut<'_>, _src: &FrameRef<'_>) -> Result<()> {
        for idx in 0..3 {
            if let Some(buf) = dst.plane_mut(idx).and_then(|p| p.data_mut()) {
                buf.fill(42);
            }
        }
        Ok(())
    }

    #[test]
    fn registered_transform_is_used() {
        let mut conv = FrameConverter::new();
        assert!(conv
            .register(PixFmt::ARGB, PixFmt::YUV420P, fill_yuv420p)
            .is_none());

        let size = Size::new(2, 2);
        let src_buf = [0u8; 16];
        let mut y = [0u8; 4];
        let mut u = [0u8; 1];
        let mut v = [0u8; 1];
        let src = FrameRef::from_planes(PixFmt::ARGB, size, [(&src_buf[..], 8)]);
        let mut dst = FrameMut::from_planes(
            PixFmt::YUV420P,
            size,
            [(&mut y[..], 2), (&mut u[..], 1), (&mut v[..], 1)],
        );
        assert_eq!(
            conv.try_convert(&mut dst, &src).unwrap(),
            Conversion::Converted
        );
        drop(dst);
        assert_eq!(y, [42; 4]);
        assert_eq!((u, v), ([42], [42]));
    }
}
