//! Photon CLI - bake visibility volumes from JSON scene files.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use tracing::{debug, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use photon::core::WorkerPool;
use photon::debug::sample_markers;
use photon::scene::SceneFile;
use photon::volume::{MemoryBackend, PhotonVolume};
use photon::World;

/// Keeps the chrome trace file open until exit.
#[cfg(feature = "chrome-trace")]
type TraceGuard = Option<tracing_chrome::FlushGuard>;
#[cfg(not(feature = "chrome-trace"))]
type TraceGuard = ();

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "warn",
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                print_version();
                return;
            }
            _ => filtered_args.push(arg),
        }
    }

    let _guard = init_tracing(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0] {
        "bake" | "b" => cmd_bake(&filtered_args[1..]),
        "info" | "i" => cmd_info(&filtered_args[1..]),
        "markers" | "m" => cmd_markers(&filtered_args[1..]),
        other => {
            eprintln!("Unknown command: {}", other);
            print_help();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env("PHOTON_LOG").unwrap_or_else(|_| EnvFilter::new(level))
}

#[cfg(feature = "chrome-trace")]
fn init_tracing(level: &str) -> TraceGuard {
    let fmt = tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(log_filter(level)).with(fmt);

    if std::env::var("PHOTON_TRACE").ok().as_deref() != Some("1") {
        let _ = tracing::subscriber::set_global_default(registry);
        return None;
    }

    let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
        .file("trace.json")
        .build();
    if tracing::subscriber::set_global_default(registry.with(chrome_layer)).is_err() {
        return None;
    }
    Some(guard)
}

#[cfg(not(feature = "chrome-trace"))]
fn init_tracing(level: &str) -> TraceGuard {
    let fmt = tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(log_filter(level)).with(fmt);
    let _ = tracing::subscriber::set_global_default(registry);
}

fn print_version() {
    println!(
        "photon {} (built {} {})",
        env!("CARGO_PKG_VERSION"),
        env!("PHOTON_BUILD_DATE"),
        env!("PHOTON_BUILD_TIME")
    );
}

fn print_help() {
    println!("Photon - offline light visibility volume baker");
    println!();
    println!("Usage: photon [flags] <command> <scene.json> [options]");
    println!();
    println!("Commands:");
    println!("  bake, b     Bake the scene and write raw RGBA8 voxels");
    println!("                -o, --output <file>      output path (default: <scene>.rgba)");
    println!("                -r, --resolution <n>     override lattice resolution (even)");
    println!("  info, i     Show mesh, triangle and light counts");
    println!("  markers, m  Bake and print debug sample markers as JSON");
    println!();
    println!("Flags:");
    println!("  -v, --verbose   debug logging");
    println!("  -vv, --trace    trace logging");
    println!("  -q, --quiet     warnings only");
    println!("  -V, --version   print version");
    println!();
    println!("Environment:");
    println!("  PHOTON_LOG      tracing filter, overrides the flags");
    println!("  PHOTON_TRACE=1  write trace.json (chrome-trace feature)");
}

/// Options shared by the commands.
struct Options {
    scene: PathBuf,
    output: Option<PathBuf>,
    resolution: Option<u32>,
}

fn parse_options(args: &[&str]) -> anyhow::Result<Options> {
    let mut scene = None;
    let mut output = None;
    let mut resolution = None;
    let mut iter = args.iter();
    while let Some(&arg) = iter.next() {
        match arg {
            "-o" | "--output" => {
                let value = iter.next().context("missing value for --output")?;
                output = Some(PathBuf::from(value));
            }
            "-r" | "--resolution" => {
                let value = iter.next().context("missing value for --resolution")?;
                resolution = Some(value.parse().with_context(|| format!("invalid resolution '{value}'"))?);
            }
            other if scene.is_none() => scene = Some(PathBuf::from(other)),
            other => bail!("unexpected argument '{other}'"),
        }
    }
    let scene = scene.context("missing scene file argument")?;
    Ok(Options { scene, output, resolution })
}

fn load_scene(path: &Path) -> anyhow::Result<SceneFile> {
    info!("Loading scene: {}", path.display());
    SceneFile::load(path).with_context(|| format!("failed to load {}", path.display()))
}

fn build_world(scene: &SceneFile) -> anyhow::Result<World> {
    let pool = WorkerPool::new(scene.settings.worker_threads)?;
    debug!("Extraction pool: {:?}", pool);
    Ok(World::with_pool(scene.provider()?, pool))
}

/// Bake the scene into `volume`, honouring a resolution override.
fn bake_scene(scene: &SceneFile, resolution: Option<u32>, volume: &mut PhotonVolume) -> anyhow::Result<()> {
    let world = build_world(scene)?;
    let tris = world.triangles()?;
    let resolution = resolution.unwrap_or(scene.settings.resolution);
    volume.bake(&tris, &scene.lights, resolution)?;
    Ok(())
}

fn cmd_bake(args: &[&str]) -> anyhow::Result<()> {
    let opts = parse_options(args)?;
    let scene = load_scene(&opts.scene)?;

    let mut volume = PhotonVolume::from_settings(&scene.settings);
    bake_scene(&scene, opts.resolution, &mut volume)?;

    let mut backend = MemoryBackend::new();
    let id = volume.upload(&mut backend)?.context("bake produced no volume")?;
    let stored = backend.volume(id).context("uploaded volume missing from backend")?;

    let output = opts.output.unwrap_or_else(|| opts.scene.with_extension("rgba"));
    std::fs::write(&output, &stored.texels).with_context(|| format!("failed to write {}", output.display()))?;

    let r = stored.resolution;
    println!("Baked {r}x{r}x{r} volume ({} bytes) -> {}", stored.texels.len(), output.display());
    if let Some(result) = volume.result() {
        let p = result.params();
        println!("  origin:    {}", p.origin());
        println!("  step size: {}", p.step_size());
        println!("  extents:   {}", p.extents());
    }
    volume.dispose(&mut backend);
    Ok(())
}

fn cmd_info(args: &[&str]) -> anyhow::Result<()> {
    let opts = parse_options(args)?;
    let scene = load_scene(&opts.scene)?;
    let world = build_world(&scene)?;
    let tris = world.triangles()?;
    let params = scene.settings.volume_parameters();

    println!("Scene: {}", opts.scene.display());
    println!("  meshes:      {}", scene.meshes.len());
    println!("  renderables: {}", scene.renderables.len());
    println!("  triangles:   {}", tris.len());
    println!("  lights:      {}", scene.lights.len());
    match params {
        Ok(p) => {
            println!("  resolution:  {} ({} samples)", p.resolution(), p.sample_count());
            println!("  origin:      {}", p.origin());
            println!("  extents:     {}", p.extents());
        }
        Err(e) => println!("  volume:      invalid ({e})"),
    }
    Ok(())
}

fn cmd_markers(args: &[&str]) -> anyhow::Result<()> {
    let opts = parse_options(args)?;
    let scene = load_scene(&opts.scene)?;

    let mut volume = PhotonVolume::from_settings(&scene.settings);
    bake_scene(&scene, opts.resolution, &mut volume)?;

    let result = volume.result().context("bake produced no result")?;
    let markers = sample_markers(result, volume.global_light_intensity);
    println!("{}", serde_json::to_string_pretty(&markers)?);
    Ok(())
}
