//! Garb texture exporter binary

use clap::Parser;
use garb::packdb::format_v3::texture::{TextureBuffer, TextureSet};
use garb::{ExportOptions, GarbError, exit_codes::*, export_package, export_plain_bundle};
use std::{env, panic, path::Path, path::PathBuf, process};

const VERSION: &str = garb::version::VERSION;

#[derive(Parser, Debug)]
#[command(version = VERSION, about = "Export avatar texture packages")]
struct Args {
    /// Directory holding one <part>.png file per body part
    #[arg(short, long)]
    input: PathBuf,

    /// Output path (defaults to garb-<export-id>.zip)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export a plain bundle of named PNGs instead of a PackDB package
    #[arg(long)]
    plain: bool,

    /// Asset service base URL (overrides GARB_ASSET_BASE)
    #[arg(long)]
    base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    // Set up panic handler to return specific exit code
    panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: {}", panic_info);
        process::exit(EXIT_PANIC);
    }));

    // Wrap main logic in catch_unwind for extra safety
    let result = panic::catch_unwind(run);

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(_) => {
            eprintln!("Fatal: Unhandled panic in exporter");
            process::exit(EXIT_PANIC);
        }
    }
}

fn run() -> i32 {
    // Handle --version before clap
    if env::args().nth(1).as_deref() == Some("--version") {
        println!("garb-export {}", garb::version::full_version());
        return EXIT_SUCCESS;
    }

    let args = Args::parse();

    // Initialize logging with level if provided
    if let Some(ref level) = args.log_level {
        garb::logger::JsonLogger::init_with_level(level, "CLI --log-level");
    } else {
        garb::logger::JsonLogger::init();
    }

    let textures = match load_textures(&args.input) {
        Ok(set) => set,
        Err(e) => {
            eprintln!("Input error: {}", e);
            return match e {
                GarbError::IoError(_) => EXIT_IO_ERROR,
                _ => EXIT_INVALID_ARGS,
            };
        }
    };

    let export_id = garb::ResourceId::generate();
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("garb-{export_id}.zip")));

    if args.plain {
        match export_plain_bundle(textures, &output) {
            Ok(report) => {
                println!(
                    "Exported plain bundle {} ({} files)",
                    output.display(),
                    report.files.len()
                );
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("Export error: {}", e);
                exit_code_for(&e)
            }
        }
    } else {
        let options = ExportOptions {
            base_url: args.base_url,
            export_id: Some(export_id),
        };
        match export_package(textures, &output, options) {
            Ok(report) => {
                println!(
                    "Exported package {} ({} blobs)",
                    output.display(),
                    report.blob_count
                );
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("Export error: {}", e);
                exit_code_for(&e)
            }
        }
    }
}

/// Read every `<part>.png` in the input directory into a texture set
fn load_textures(input: &Path) -> garb::exceptions::Result<TextureSet> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(input)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("png") {
            paths.push(path);
        }
    }
    // Directory order is not stable; sort for a reproducible accumulation order
    paths.sort();

    if paths.is_empty() {
        return Err(GarbError::Generic(format!(
            "No .png textures found in {}",
            input.display()
        )));
    }

    let mut textures = TextureSet::new();
    for path in paths {
        let Some(part) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        log::debug!("🎨 Loading texture '{}' from {:?}", part, path);
        let bytes = std::fs::read(&path)?;
        textures.insert(part, Some(TextureBuffer::Png(bytes)));
    }
    Ok(textures)
}

/// Map an export error onto the exit-code table
fn exit_code_for(error: &GarbError) -> i32 {
    match error {
        GarbError::UnsupportedFormat(_) => EXIT_FORMAT_ERROR,
        GarbError::VerificationFailed(_) => EXIT_VERIFY_ERROR,
        GarbError::Fetch(_) => EXIT_FETCH_ERROR,
        GarbError::UnsupportedImage(_) => EXIT_IMAGE_ERROR,
        GarbError::Serialization(_) | GarbError::JsonError(_) => EXIT_SERIALIZATION_ERROR,
        GarbError::Archive(_) => EXIT_EXPORT_ERROR,
        GarbError::IoError(_) => EXIT_IO_ERROR,
        GarbError::Generic(message) if message.contains("base URL") => EXIT_CONFIG_ERROR,
        GarbError::Generic(_) => EXIT_EXPORT_ERROR,
    }
}
