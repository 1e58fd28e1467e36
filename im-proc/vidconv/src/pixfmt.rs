//! Runtime description of the supported pixel formats.

use crate::frame::Size;

/// Pixel format of a video frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixFmt {
    /// No format. A frame with this format has no planes.
    None,
    /// Planar 4:2:0. Full resolution Y plane followed by quarter resolution U
    /// and V planes.
    YUV420P,
    /// Packed 4:2:2, bytes `U Y0 V Y1` per pixel pair.
    UYVY422,
    /// Packed 4:2:2, bytes `Y0 U Y1 V` per pixel pair.
    YUYV422,
    /// Packed 32 bit word per pixel, `0xXXRRGGBB` in host word order.
    RGB32,
    /// Packed 32 bit word per pixel with alpha.
    ARGB,
}

/// All pixel formats, in declaration order.
pub const ALL_PIXFMTS: [PixFmt; 6] = [
    PixFmt::None,
    PixFmt::YUV420P,
    PixFmt::UYVY422,
    PixFmt::YUYV422,
    PixFmt::RGB32,
    PixFmt::ARGB,
];

impl PixFmt {
    /// The name of the pixel format.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "(NONE)",
            Self::YUV420P => "YUV420P",
            Self::UYVY422 => "UYVY422",
            Self::YUYV422 => "YUYV422",
            Self::RGB32 => "RGB32",
            Self::ARGB => "ARGB",
        }
    }

    /// Number of planes a frame of this format carries.
    pub const fn num_planes(&self) -> usize {
        match self {
            Self::None => 0,
            Self::YUV420P => 3,
            Self::UYVY422 | Self::YUYV422 | Self::RGB32 | Self::ARGB => 1,
        }
    }

    /// Plane geometry for a tightly packed frame of `size`.
    pub fn layout(&self, size: Size) -> FrameLayout {
        self.layout_aligned(size, 1)
    }

    /// Plane geometry where every stride is rounded up to a multiple of
    /// `align` bytes.
    ///
    /// An `align` of zero is treated as one.
    pub fn layout_aligned(&self, size: Size, align: usize) -> FrameLayout {
        let w = size.width as usize;
        let h = size.height as usize;
        let dims: &[(usize, usize)] = match self {
            Self::None => &[],
            Self::YUV420P => &[(w, h), (w / 2, h / 2), (w / 2, h / 2)],
            Self::UYVY422 | Self::YUYV422 => &[(w * 2, h)],
            Self::RGB32 | Self::ARGB => &[(w * 4, h)],
        };
        let planes = dims
            .iter()
            .map(|&(row_bytes, rows)| PlaneLayout {
                stride: row_bytes.next_multiple_of(align.max(1)),
                row_bytes,
                rows,
            })
            .collect();
        FrameLayout { planes }
    }
}

impl std::fmt::Display for PixFmt {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown pixel format name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown pixel format: {0:?}")]
pub struct UnknownPixFmt(pub String);

impl std::str::FromStr for PixFmt {
    type Err = UnknownPixFmt;
    fn from_str(instr: &str) -> Result<Self, Self::Err> {
        let upper = instr.to_ascii_uppercase();
        if upper == "NONE" {
            return Ok(PixFmt::None);
        }
        ALL_PIXFMTS
            .iter()
            .find(|fmt| fmt.as_str() == upper)
            .copied()
            .ok_or_else(|| UnknownPixFmt(instr.to_string()))
    }
}

/// Geometry of one plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneLayout {
    /// bytes between the starts of consecutive rows
    pub stride: usize,
    /// bytes of pixel data in each row
    pub row_bytes: usize,
    /// number of rows
    pub rows: usize,
}

impl PlaneLayout {
    /// Smallest buffer holding every row. The last row needs no padding.
    ///
    /// `None` if the size does not fit in `usize`.
    pub fn min_len(&self) -> Option<usize> {
        match self.rows.checked_sub(1) {
            None => Some(0),
            Some(full_rows) => self
                .stride
                .checked_mul(full_rows)?
                .checked_add(self.row_bytes),
        }
    }

    /// Buffer size with every row padded to `stride`.
    pub fn padded_len(&self) -> usize {
        self.stride * self.rows
    }
}

/// Geometry of every plane of a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLayout {
    planes: Vec<PlaneLayout>,
}

impl FrameLayout {
    pub fn planes(&self) -> &[PlaneLayout] {
        &self.planes
    }

    /// Allocate one zeroed, fully padded buffer per plane.
    ///
    /// Buffers are owned by the caller. Frame views borrow them.
    pub fn alloc_planes(&self) -> Vec<Vec<u8>> {
        self.planes
            .iter()
            .map(|p| vec![0u8; p.padded_len()])
            .collect()
    }

    /// Total bytes of a tightly packed frame, planes concatenated.
    pub fn packed_len(&self) -> usize {
        self.planes.iter().map(|p| p.row_bytes * p.rows).sum()
    }
}
