use anyhow::Context;
use clap::{Parser, Subcommand};
use primview_common::Viewport;
use primview_render::{DebugTextRenderer, tessellate};
use primview_runtime::{Viewer, ViewerConfig};
use primview_scene::{GeometryDesc, Scene, ShapeKind};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "primview-cli", about = "Headless primview viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, scene contents and primitive sizes
    Info,
    /// Run the render loop against the text renderer
    Run {
        /// Number of frames to render
        #[arg(short, long, default_value = "3")]
        frames: u64,
        /// Logical viewport width
        #[arg(long)]
        width: Option<f64>,
        /// Logical viewport height
        #[arg(long)]
        height: Option<f64>,
        /// Device pixel ratio
        #[arg(long, default_value = "1.0")]
        dpr: f64,
        /// Primitive to show: cube, sphere or knot
        #[arg(short, long)]
        shape: Option<ShapeKind>,
        /// YAML or JSON viewer config
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("primview-cli v{}", env!("CARGO_PKG_VERSION"));
            let scene = Scene::default();
            println!("scene: {} nodes", scene.node_count());
            for kind in ShapeKind::ALL {
                let mesh = tessellate(&GeometryDesc::for_shape(kind));
                println!(
                    "  {kind}: {} vertices, {} triangles",
                    mesh.vertex_count(),
                    mesh.triangle_count()
                );
            }
            let panel = primview_tools::shape_options().join(", ");
            println!("panel shapes: {panel}");
        }
        Commands::Run {
            frames,
            width,
            height,
            dpr,
            shape,
            config,
        } => {
            let mut config = match config {
                Some(path) => ViewerConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => ViewerConfig::default(),
            };
            if let Some(shape) = shape {
                config.shape = shape;
            }
            let viewport = Viewport::new(
                width.unwrap_or(config.width as f64),
                height.unwrap_or(config.height as f64),
                dpr,
            )?;

            let mut viewer = Viewer::new(&config, viewport, DebugTextRenderer::new());
            viewer.start()?;
            for _ in 0..frames {
                print!("{}", viewer.frame()?);
            }
            tracing::info!(
                frames = viewer.frames(),
                elapsed_ms = viewer.clock().elapsed().as_millis() as u64,
                "run finished"
            );
        }
    }

    Ok(())
}
