//! Borrowed views over caller-owned frame buffers.

use crate::{
    pixfmt::{PixFmt, PlaneLayout},
    Error, Result,
};

/// Maximum number of planes a frame can carry.
pub const MAX_PLANES: usize = 4;

/// Frame dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One readable plane: bytes plus the distance between row starts.
#[derive(Debug, Clone, Copy)]
pub struct PlaneRef<'a> {
    pub data: &'a [u8],
    pub stride: usize,
}

/// A read-only view of a populated frame.
#[derive(Debug, Clone)]
pub struct FrameRef<'a> {
    pub format: PixFmt,
    pub size: Size,
    planes: [Option<PlaneRef<'a>>; MAX_PLANES],
}

impl<'a> FrameRef<'a> {
    /// Create a view from `(data, stride)` pairs in plane order.
    ///
    /// Planes beyond [MAX_PLANES] are ignored.
    pub fn from_planes<I>(format: PixFmt, size: Size, planes: I) -> Self
    where
        I: IntoIterator<Item = (&'a [u8], usize)>,
    {
        let mut result = Self {
            format,
            size,
            planes: Default::default(),
        };
        for (slot, (data, stride)) in result.planes.iter_mut().zip(planes) {
            *slot = Some(PlaneRef { data, stride });
        }
        result
    }

    /// Split a tightly packed buffer (planes concatenated, stride equal to
    /// row bytes) into a view.
    pub fn from_packed(format: PixFmt, size: Size, data: &'a [u8]) -> Result<Self> {
        let layout = format.layout(size);
        let expected = layout.packed_len();
        if data.len() != expected {
            return Err(Error::InvalidPackedSize {
                fmt: format,
                len: data.len(),
                expected,
            });
        }
        let mut rest = data;
        let mut planes = Vec::with_capacity(layout.planes().len());
        for plane in layout.planes() {
            let (head, tail) = rest.split_at(plane.row_bytes * plane.rows);
            planes.push((head, plane.row_bytes));
            rest = tail;
        }
        Ok(Self::from_planes(format, size, planes))
    }

    pub fn plane(&self, idx: usize) -> Option<&'a [u8]> {
        self.plane_ref(idx).map(|p| p.data)
    }

    pub fn stride(&self, idx: usize) -> Option<usize> {
        self.plane_ref(idx).map(|p| p.stride)
    }

    pub fn plane_ref(&self, idx: usize) -> Option<PlaneRef<'a>> {
        self.planes.get(idx).copied().flatten()
    }

    /// Fetch plane `idx` and check it can hold `layout`.
    pub(crate) fn checked_plane(&self, idx: usize, layout: &PlaneLayout) -> Result<PlaneRef<'a>> {
        let plane = self.plane_ref(idx).ok_or(Error::MissingPlane {
            fmt: self.format,
            plane: idx,
        })?;
        check_geometry(idx, plane.data.len(), plane.stride, layout)?;
        Ok(plane)
    }
}

#[derive(Debug)]
enum PlaneData<'a> {
    Writable(&'a mut [u8]),
    /// Re-view of a source plane set by an identity conversion.
    Aliased(&'a [u8]),
}

/// One destination plane.
#[derive(Debug)]
pub struct PlaneMut<'a> {
    data: PlaneData<'a>,
    stride: usize,
}

impl<'a> PlaneMut<'a> {
    pub fn data(&self) -> &[u8] {
        match &self.data {
            PlaneData::Writable(buf) => &buf[..],
            PlaneData::Aliased(buf) => &buf[..],
        }
    }

    /// Writable bytes, or `None` if the plane aliases a source plane.
    pub fn data_mut(&mut self) -> Option<&mut [u8]> {
        match &mut self.data {
            PlaneData::Writable(buf) => Some(&mut buf[..]),
            PlaneData::Aliased(_) => None,
        }
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn is_aliased(&self) -> bool {
        matches!(self.data, PlaneData::Aliased(_))
    }
}

/// A view of a destination frame whose planes were allocated by the caller.
#[derive(Debug)]
pub struct FrameMut<'a> {
    pub format: PixFmt,
    pub size: Size,
    planes: [Option<PlaneMut<'a>>; MAX_PLANES],
}

impl<'a> FrameMut<'a> {
    /// Create a view from `(data, stride)` pairs in plane order.
    ///
    /// Planes beyond [MAX_PLANES] are ignored.
    pub fn from_planes<I>(format: PixFmt, size: Size, planes: I) -> Self
    where
        I: IntoIterator<Item = (&'a mut [u8], usize)>,
    {
        let mut result = Self {
            format,
            size,
            planes: Default::default(),
        };
        for (slot, (data, stride)) in result.planes.iter_mut().zip(planes) {
            *slot = Some(PlaneMut {
                data: PlaneData::Writable(data),
                stride,
            });
        }
        result
    }

    pub fn plane(&self, idx: usize) -> Option<&[u8]> {
        self.planes.get(idx)?.as_ref().map(PlaneMut::data)
    }

    pub fn stride(&self, idx: usize) -> Option<usize> {
        self.planes.get(idx)?.as_ref().map(PlaneMut::stride)
    }

    pub fn plane_mut(&mut self, idx: usize) -> Option<&mut PlaneMut<'a>> {
        self.planes.get_mut(idx)?.as_mut()
    }

    /// True if any plane is a re-view of a source plane.
    pub fn is_aliased(&self) -> bool {
        self.planes.iter().flatten().any(PlaneMut::is_aliased)
    }

    /// Read-only view of the current contents.
    pub fn as_frame_ref(&self) -> FrameRef<'_> {
        let mut result = FrameRef {
            format: self.format,
            size: self.size,
            planes: Default::default(),
        };
        for (slot, plane) in result.planes.iter_mut().zip(self.planes.iter()) {
            *slot = plane.as_ref().map(|p| PlaneRef {
                data: p.data(),
                stride: p.stride,
            });
        }
        result
    }

    /// Replace every plane with a re-view of the matching source plane.
    pub(crate) fn alias(&mut self, src: &FrameRef<'a>) {
        for (slot, plane) in self.planes.iter_mut().zip(src.planes.iter()) {
            *slot = plane.map(|p| PlaneMut {
                data: PlaneData::Aliased(p.data),
                stride: p.stride,
            });
        }
    }

    pub(crate) fn planes_mut(&mut self) -> &mut [Option<PlaneMut<'a>>; MAX_PLANES] {
        &mut self.planes
    }
}

/// Borrow the writable bytes of destination plane `idx` after checking they
/// can hold `layout`.
pub(crate) fn checked_plane_mut<'p>(
    slot: &'p mut Option<PlaneMut<'_>>,
    fmt: PixFmt,
    idx: usize,
    layout: &PlaneLayout,
) -> Result<(&'p mut [u8], usize)> {
    let plane = slot
        .as_mut()
        .ok_or(Error::MissingPlane { fmt, plane: idx })?;
    let stride = plane.stride;
    let data = plane.data_mut().ok_or(Error::ReadOnlyPlane { plane: idx })?;
    check_geometry(idx, data.len(), stride, layout)?;
    Ok((data, stride))
}

fn check_geometry(idx: usize, len: usize, stride: usize, layout: &PlaneLayout) -> Result<()> {
    if stride < layout.row_bytes {
        return Err(Error::InvalidStride {
            plane: idx,
            stride,
            min: layout.row_bytes,
        });
    }
    // A stride too large to address every row can never be satisfied.
    let min = PlaneLayout {
        stride,
        ..*layout
    }
    .min_len()
    .unwrap_or(usize::MAX);
    if len < min {
        return Err(Error::InvalidBufferSize {
            plane: idx,
            len,
            min,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_packed_splits_planes() {
        let size = Size::new(4, 2);
        let data: Vec<u8> = (0..12).collect();
        let frame = FrameRef::from_packed(PixFmt::YUV420P, size, &data).unwrap();
        assert_eq!(frame.plane(0).unwrap(), &data[..8]);
        assert_eq!(frame.stride(0), Some(4));
        assert_eq!(frame.plane(1).unwrap(), &data[8..10]);
        assert_eq!(frame.plane(2).unwrap(), &data[10..12]);
        assert_eq!(frame.stride(2), Some(2));
        assert!(frame.plane(3).is_none());

        let err = FrameRef::from_packed(PixFmt::YUV420P, size, &data[..11]).unwrap_err();
        assert!(matches!(err, Error::InvalidPackedSize { expected: 12, .. }));
    }

    #[test]
    fn geometry_checks() {
        let layout = PlaneLayout {
            stride: 4,
            row_bytes: 4,
            rows: 2,
        };
        let buf = [0u8; 8];
        let short = FrameRef::from_planes(PixFmt::RGB32, Size::new(1, 2), [(&buf[..7], 4)]);
        assert!(matches!(
            short.checked_plane(0, &layout),
            Err(Error::InvalidBufferSize { min: 8, .. })
        ));
        let narrow = FrameRef::from_planes(PixFmt::RGB32, Size::new(1, 2), [(&buf[..], 3)]);
        assert!(matches!(
            narrow.checked_plane(0, &layout),
            Err(Error::InvalidStride { min: 4, .. })
        ));
        let huge = FrameRef::from_planes(
            PixFmt::RGB32,
            Size::new(1, 2),
            [(&buf[..], usize::MAX / 2)],
        );
        let huge_layout = PlaneLayout { rows: 4, ..layout };
        assert!(matches!(
            huge.checked_plane(0, &huge_layout),
            Err(Error::InvalidBufferSize { len: 8, min: usize::MAX, .. })
        ));
        // The last row does not need padding.
        let padded = PlaneLayout { stride: 6, ..layout };
        let buf = [0u8; 10];
        let frame = FrameRef::from_planes(PixFmt::RGB32, Size::new(1, 2), [(&buf[..], 6)]);
        assert!(frame.checked_plane(0, &padded).is_ok());
        assert!(matches!(
            frame.checked_plane(1, &padded),
            Err(Error::MissingPlane { plane: 1, .. })
        ));
    }

    #[test]
    fn aliased_planes_are_read_only() {
        let src_buf = [7u8; 8];
        let mut dst_buf = [0u8; 8];
        let src = FrameRef::from_planes(PixFmt::YUYV422, Size::new(2, 2), [(&src_buf[..], 4)]);
        let mut dst =
            FrameMut::from_planes(PixFmt::YUYV422, Size::new(2, 2), [(&mut dst_buf[..], 4)]);
        assert!(!dst.is_aliased());
        dst.alias(&src);
        assert!(dst.is_aliased());
        assert_eq!(dst.plane(0).unwrap(), &src_buf[..]);
        assert!(dst.plane_mut(0).unwrap().data_mut().is_none());
        let layout = PixFmt::YUYV422.layout(Size::new(2, 2)).planes()[0];
        let err = checked_plane_mut(&mut dst.planes_mut()[0], PixFmt::YUYV422, 0, &layout)
            .unwrap_err();
        assert!(matches!(err, Error::ReadOnlyPlane { plane: 0 }));
    }
}
