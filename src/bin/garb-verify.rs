//! Garb package verifier binary

use clap::Parser;
use garb::{GarbError, exit_codes::*, verify_package};
use std::{env, panic, path::PathBuf, process};

const VERSION: &str = garb::version::VERSION;

#[derive(Parser, Debug)]
#[command(version = VERSION, about = "Verify PackDB packages")]
struct Args {
    /// Path to the package archive
    package: PathBuf,

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
            eprintln!("Fatal: Unhandled panic in verifier");
            process::exit(EXIT_PANIC);
        }
    }
}

fn run() -> i32 {
    // Handle --version before clap
    if env::args().nth(1).as_deref() == Some("--version") {
        println!("garb-verify {}", garb::version::full_version());
        return EXIT_SUCCESS;
    }

    let args = Args::parse();

    // Initialize logging with level if provided
    if let Some(ref level) = args.log_level {
        garb::logger::JsonLogger::init_with_level(level, "CLI --log-level");
    } else {
        garb::logger::JsonLogger::init();
    }

    println!("🔍 Verifying package: {:?}", args.package);

    match verify_package(&args.package) {
        Ok(report) => {
            println!("  Format: {} {}", report.format, report.version);
            println!("  Catalog: {}", report.catalog_id);
            println!("  Manifest entries: {}", report.manifest_count);
            println!("  Stored blobs: {}", report.blob_count);
            println!("  Config digest: {}", report.config_digest);
            if report.intact {
                println!("  ✓ Package is intact");
                EXIT_SUCCESS
            } else {
                println!("  ✗ Package contents do not match their record");
                EXIT_VERIFY_ERROR
            }
        }
        Err(e) => {
            eprintln!("Verify error: {}", e);
            match e {
                GarbError::UnsupportedFormat(_) => EXIT_FORMAT_ERROR,
                GarbError::IoError(_) => EXIT_IO_ERROR,
                _ => EXIT_VERIFY_ERROR,
            }
        }
    }
}
