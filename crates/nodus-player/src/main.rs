use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};

use nodus_engine::backend::{BYTES_PER_PIXEL, BackendId};
use nodus_engine::driver::FrameDriver;
use nodus_engine::logging::{LogOptions, init_logging};
use nodus_engine::scene::{Arena, NodeId, Registry};
use nodus_engine::viewer::{CaptureBuffer, Viewer, ViewerConfig};

const FPS: u32 = 60;

struct Args {
    duration: f64,
    width: u32,
    height: u32,
    export: Option<PathBuf>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            duration: 3.0,
            width: 320,
            height: 240,
            export: None,
        }
    }
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    for (i, arg) in std::env::args().skip(1).enumerate() {
        match i {
            0 => args.duration = arg.parse().context("duration must be a number of seconds")?,
            1 => {
                let (w, h) = arg
                    .split_once('x')
                    .context("size must look like 320x240")?;
                args.width = w.parse().context("bad width")?;
                args.height = h.parse().context("bad height")?;
            }
            2 => args.export = Some(PathBuf::from(arg)),
            _ => bail!("usage: nodus-player [duration] [WxH] [out.ppm]"),
        }
    }
    Ok(args)
}

/// A small composed graph: two renders sharing one quad under a group.
fn build_scene(arena: &Arena) -> NodeId {
    let quad = arena.quad();
    let left = arena.render(quad);
    let right = arena.render(quad);
    arena.group(&[left, right])
}

/// Binary PPM (P6) export of an RGBA8 frame, alpha dropped.
fn write_ppm(path: &PathBuf, width: u32, height: u32, rgba: &[u8]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write!(out, "P6\n{width} {height}\n255\n")?;
    for px in rgba.chunks_exact(BYTES_PER_PIXEL) {
        out.write_all(&px[..3])?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    init_logging(LogOptions::default());

    println!();
    println!("  nodus player :: offscreen scene-graph playback");
    println!();

    let args = parse_args()?;
    let backend = BackendId::from_env().unwrap_or(BackendId::AUTO);

    let arena = Arc::new(Arena::new());
    let registry = Arc::new(Registry::new());

    let capture = CaptureBuffer::for_size(args.width, args.height);
    let mut viewer = Viewer::new(arena.clone(), registry);
    viewer.configure(
        &ViewerConfig::offscreen(args.width, args.height)
            .with_backend(backend)
            .with_capture(capture.view()),
    )?;
    log::info!(
        "configured {}x{} on the {} backend",
        args.width,
        args.height,
        viewer.backend().map_or("?", |b| b.name())
    );

    let scene = build_scene(&arena);
    let mut driver = FrameDriver::new(viewer);
    driver.bind_scene_with_hud(scene)?;

    let total_frames = (args.duration * f64::from(FPS)).ceil() as u64;
    let started = Instant::now();
    for i in 0..total_frames {
        driver.step(i as f64 / f64::from(FPS))?;
    }
    let elapsed = started.elapsed().as_secs_f64();
    log::info!(
        "drew {} frames in {:.3}s ({:.0} fps)",
        driver.frames(),
        elapsed,
        driver.frames() as f64 / elapsed.max(1e-9)
    );

    if let Some(path) = &args.export {
        write_ppm(path, args.width, args.height, &capture.to_vec())?;
        log::info!("exported last frame to {}", path.display());
    }

    Ok(())
}
