//! Convert one raw video frame file between pixel formats.
//!
//! Input and output files hold the planes of a single frame one after the
//! other, each row exactly as wide as the pixels it carries.
use std::{
    io::Write,
    path::{Path, PathBuf},
};

use clap::Parser;
use color_eyre::eyre::{self, WrapErr};

use vidconv::{Conversion, FrameConverter, FrameMut, FrameRef, PixFmt, Size};

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Input raw frame filename.
    pub input: PathBuf,

    /// Output filename. Defaults to the input filename with the lowercase
    /// destination format appended, e.g. "frame.rgb32.yuv420p".
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Frame width in pixels.
    #[arg(long)]
    pub width: u32,

    /// Frame height in pixels.
    #[arg(long)]
    pub height: u32,

    /// Pixel format of the input (YUV420P, UYVY422, YUYV422, RGB32, ARGB).
    #[arg(long)]
    pub from: PixFmt,

    /// Pixel format of the output.
    #[arg(long)]
    pub to: PixFmt,
}

fn default_output(input: &Path, fmt: PixFmt) -> PathBuf {
    let mut output = input.as_os_str().to_owned();
    output.push(format!(".{}", fmt.as_str().to_ascii_lowercase()));
    output.into()
}

/// Write the visible rows of each plane of `frame`, dropping row padding.
pub fn write_frame<W: Write>(frame: &FrameRef<'_>, mut wtr: W) -> eyre::Result<()> {
    let layout = frame.format.layout(frame.size);
    for (idx, plane_layout) in layout.planes().iter().enumerate() {
        let data = frame
            .plane(idx)
            .ok_or_else(|| eyre::eyre!("{} frame has no plane {idx}", frame.format))?;
        let stride = frame.stride(idx).unwrap_or(plane_layout.row_bytes);
        for row in 0..plane_layout.rows {
            let start = row * stride;
            let row_data = data
                .get(start..start + plane_layout.row_bytes)
                .ok_or_else(|| eyre::eyre!("plane {idx} too short for row {row}"))?;
            wtr.write_all(row_data)?;
        }
    }
    Ok(())
}

pub fn run_cli(cli: Cli) -> eyre::Result<Conversion> {
    let size = Size::new(cli.width, cli.height);
    let output = cli
        .output
        .unwrap_or_else(|| default_output(&cli.input, cli.to));

    let input = std::fs::read(&cli.input)
        .with_context(|| format!("while reading {}", cli.input.display()))?;
    let src = FrameRef::from_packed(cli.from, size, &input)
        .with_context(|| format!("while parsing {}", cli.input.display()))?;

    let dst_layout = cli.to.layout(size);
    let mut planes = dst_layout.alloc_planes();
    let strides: Vec<usize> = dst_layout.planes().iter().map(|p| p.stride).collect();
    let mut dst = FrameMut::from_planes(
        cli.to,
        size,
        planes.iter_mut().map(|p| &mut p[..]).zip(strides),
    );

    let conversion = FrameConverter::new()
        .try_convert(&mut dst, &src)
        .with_context(|| format!("while converting {}", cli.input.display()))?;
    tracing::info!(
        "{}: {}:{size} -> {}:{size} ({conversion:?})",
        cli.input.display(),
        cli.from,
        cli.to
    );

    let out_fd = std::fs::File::create(&output)
        .with_context(|| format!("while creating {}", output.display()))?;
    let mut out_fd = std::io::BufWriter::new(out_fd);
    write_frame(&dst.as_frame_ref(), &mut out_fd)?;
    out_fd.flush()?;
    tracing::info!("saved {}", output.display());
    Ok(conversion)
}
