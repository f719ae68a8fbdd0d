//! Interactive software-rendered demo.
//!
//! ```bash
//! cargo run --release
//! ```
//!
//! W/Up thrusts, A/D or ←/→ turn, Shift boosts, Ctrl fires, Tab cycles
//! space → planet → ship interior, +/- zooms.  Prints average frame time
//! every three seconds.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use stardrift_rs::scene::{Mode, ViewSize};
use stardrift_rs::settings::RenderSettings;
use stardrift_rs::sim::{DemoSim, InputCmd};
use stardrift_rs::sprites::SpriteBank;
use stardrift_rs::{Compositor, RasterSurface};

#[derive(Parser, Debug)]
#[command(about = "Interactive stardrift demo (software renderer)")]
struct Args {
    /// Starting mode: space | planet | ship
    #[arg(long, default_value = "space")]
    mode: String,

    /// Settings file (missing file = defaults).
    #[arg(long, default_value = "stardrift.toml")]
    settings: PathBuf,

    /// Override the sprite asset directory from settings.
    #[arg(long)]
    assets: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut settings = RenderSettings::load(&args.settings)?;
    if let Some(assets) = &args.assets {
        settings.assets = assets.display().to_string();
    }

    let (w, h) = (settings.width, settings.height);
    let mut sim = DemoSim::new("demo-system");
    sim.set_mode(Mode::parse(&args.mode));

    let bank = SpriteBank::new(settings.assets.as_ref(), settings.theme_config());
    let mut compositor = Compositor::new(bank);
    compositor.set_decor_density(settings.decor_density);

    let mut surface = RasterSurface::new(w, h);
    let view = ViewSize::new(
        w as f32 / settings.pixel_density,
        h as f32 / settings.pixel_density,
    );

    let mut win = Window::new("stardrift (software render)", w, h, WindowOptions::default())?;
    win.set_target_fps(60);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();
    let start = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();

        /* --------------- one InputCmd per frame --------------------------- */
        let mut cmd = InputCmd::default();
        if win.is_key_down(Key::W) || win.is_key_down(Key::Up) {
            cmd.thrust = 1.0;
        }
        if win.is_key_down(Key::A) || win.is_key_down(Key::Left) {
            cmd.turn -= 1.0;
        }
        if win.is_key_down(Key::D) || win.is_key_down(Key::Right) {
            cmd.turn += 1.0;
        }
        cmd.boost = win.is_key_down(Key::LeftShift) || win.is_key_down(Key::RightShift);
        cmd.fire = win.is_key_down(Key::LeftCtrl) || win.is_key_down(Key::RightCtrl);
        cmd.cycle_mode = win.is_key_pressed(Key::Tab, KeyRepeat::No); // edge-trigger

        if win.is_key_down(Key::Equal) {
            sim.set_zoom(sim.zoom() * 1.02);
        }
        if win.is_key_down(Key::Minus) {
            sim.set_zoom(sim.zoom() / 1.02);
        }

        sim.tick(cmd);

        /* draw */
        let now_ms = start.elapsed().as_secs_f64() * 1000.0;
        compositor.render(
            &mut sim,
            &mut surface,
            view,
            settings.pixel_density,
            now_ms,
        );
        surface.present(|fb, fw, fh| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            win.update_with_buffer(fb, fw, fh).unwrap()
        });

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames.max(1) as f64;
            println!("avg render: {:.2} ms  ({:.1} FPS)", avg_ms, 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
