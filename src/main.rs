//! Headless still-frame tool.
//!
//! ```bash
//! cargo run --bin stardrift_rs -- --mode planet --out frame.png
//! ```
//!
//! Composes a scripted session for a few warm-up frames (so trails and
//! smoothing have state) and writes the last frame as a PNG.  Handy for
//! eyeballing composer changes and for CI artifacts.

use std::path::PathBuf;

use clap::Parser;

use stardrift_rs::scene::{Mode, ViewSize};
use stardrift_rs::settings::RenderSettings;
use stardrift_rs::sim::{DemoSim, InputCmd};
use stardrift_rs::sprites::SpriteBank;
use stardrift_rs::{Compositor, RasterSurface};

#[derive(Parser, Debug)]
#[command(about = "Render one composed frame of the demo session to a PNG")]
struct Args {
    /// space | planet | ship
    #[arg(long, default_value = "space")]
    mode: String,

    #[arg(long, default_value = "frame.png")]
    out: PathBuf,

    #[arg(long, default_value_t = 1280)]
    width: usize,

    #[arg(long, default_value_t = 800)]
    height: usize,

    /// Warm-up frames before the capture.
    #[arg(long, default_value_t = 90)]
    frames: u32,

    /// Settings file (missing file = defaults).
    #[arg(long, default_value = "stardrift.toml")]
    settings: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let settings = RenderSettings::load(&args.settings)?;

    let mut sim = DemoSim::new("demo-system");
    sim.set_mode(Mode::parse(&args.mode));

    let bank = SpriteBank::new(settings.assets.as_ref(), settings.theme_config());
    let mut compositor = Compositor::new(bank);
    compositor.set_decor_density(settings.decor_density);

    let mut surface = RasterSurface::new(args.width, args.height);
    let view = ViewSize::new(
        args.width as f32 / settings.pixel_density,
        args.height as f32 / settings.pixel_density,
    );

    // scripted input keeps trails and thruster FX alive in the capture
    let cmd = InputCmd {
        thrust: 1.0,
        turn: 0.15,
        fire: true,
        ..InputCmd::default()
    };
    let frame_ms = 1000.0 / 60.0;
    for i in 0..args.frames.max(1) {
        sim.tick(cmd);
        compositor.render(
            &mut sim,
            &mut surface,
            view,
            settings.pixel_density,
            i as f64 * frame_ms,
        );
    }

    let mut img = image::RgbaImage::new(args.width as u32, args.height as u32);
    for (i, px) in surface.frame().iter().enumerate() {
        let (x, y) = ((i % args.width) as u32, (i / args.width) as u32);
        let [_, r, g, b] = px.to_be_bytes();
        img.put_pixel(x, y, image::Rgba([r, g, b, 0xFF]));
    }
    img.save(&args.out)?;
    println!("wrote {}", args.out.display());
    Ok(())
}
