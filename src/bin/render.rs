//! Offline renderer: writes frames of the spinning model as numbered PNGs

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use softraster::{scene, Context, Error, Mat4, ViewerConfig};

#[derive(Parser, Debug)]
#[command(name = "softraster-render", version, about = "Render model frames to PNG files")]
struct Args {
    /// RON viewer config; defaults apply when the file is missing
    #[arg(short, long, default_value = "viewer.ron")]
    config: PathBuf,

    /// Number of frames to render
    #[arg(short = 'n', long, default_value_t = 1)]
    frames: usize,

    /// Simulated frames per second, controls spin per frame
    #[arg(long, default_value_t = 30.0)]
    fps: f32,

    /// Output directory
    #[arg(short, long, default_value = "frames")]
    out: PathBuf,

    /// Override the configured width
    #[arg(long)]
    width: Option<usize>,

    /// Override the configured height
    #[arg(long)]
    height: Option<usize>,
}

fn run(args: Args) -> softraster::Result<()> {
    let mut config = ViewerConfig::load_or_default(&args.config)?;
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }

    let model = config.load_model()?;
    let material = config.load_material()?;
    let camera = config.camera();
    let mut context = Context::new(config.width, config.height);

    fs::create_dir_all(&args.out).map_err(|source| Error::Io {
        path: args.out.clone(),
        source,
    })?;

    log::info!(
        "Rendering {} frame(s) at {}x{} into {}",
        args.frames,
        config.width,
        config.height,
        args.out.display()
    );

    let progress = ProgressBar::new(args.frames as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} frames ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    for frame in 0..args.frames {
        let time = frame as f32 / args.fps;
        let model_matrix = Mat4::rotation_y(time * config.spin_speed);

        context.clear();
        scene::draw_model(
            &mut context,
            &camera,
            &model,
            &material,
            &config.lighting,
            &model_matrix,
        );

        let path = args.out.join(format!("frame_{:04}.png", frame));
        context.color_buffer().save(&path)?;
        log::debug!("Wrote {}", path.display());
        progress.inc(1);
    }

    progress.finish();
    log::info!("Done");
    Ok(())
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    if args.fps <= 0.0 {
        log::error!("--fps must be positive");
        std::process::exit(2);
    }

    if let Err(e) = run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
