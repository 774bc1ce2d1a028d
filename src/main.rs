//! GitView - a read-only FUSE projection of a Git repository
//!
//! This is the main entry point for the gitview command-line interface.

use std::path::PathBuf;
use std::process::ExitCode;

use gitview::fs;
use gitview::namespace::Namespace;
use gitview::store::GitStore;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    // Parse simple command line args.
    let mut repo = PathBuf::from(".");
    let mut verbose = false;
    let mut mountpoint: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-r" | "--repo" => {
                i += 1;
                if i < args.len() {
                    repo = PathBuf::from(&args[i]);
                }
            }
            "-v" | "--verbose" => {
                verbose = true;
            }
            "-h" | "--help" => {
                print_help();
                return ExitCode::SUCCESS;
            }
            "--version" => {
                println!("gitview v0.1.0");
                return ExitCode::SUCCESS;
            }
            arg => {
                // Treat as mountpoint if no flag.
                if !arg.starts_with('-') {
                    mountpoint = Some(PathBuf::from(arg));
                } else {
                    eprintln!("Unknown option: {}", arg);
                    return ExitCode::FAILURE;
                }
            }
        }
        i += 1;
    }

    let mountpoint = match mountpoint {
        Some(m) => m,
        None => {
            eprintln!("Missing mountpoint");
            print_help();
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    // A repository that cannot be opened is the only fatal condition;
    // everything after this point surfaces per-request errors instead.
    let store = match GitStore::open(&repo) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error opening repository: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        repo = %store.path().display(),
        mount = %mountpoint.display(),
        "mounting read-only"
    );

    if let Err(e) = fs::mount(Namespace::new(store), &mountpoint) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!("unmounted");
    ExitCode::SUCCESS
}

fn print_help() {
    println!("gitview - a read-only FUSE projection of a Git repository");
    println!();
    println!("Usage: gitview [OPTIONS] MOUNTPOINT");
    println!();
    println!("Options:");
    println!("  -r, --repo PATH    Path to the repository (default: working dir)");
    println!("  -v, --verbose      Enable verbose output");
    println!("  -h, --help         Show this help message");
    println!("  --version          Show version");
    println!();
    println!("Examples:");
    println!("  gitview /mnt/repo              Mount the repository in the working dir");
    println!("  gitview -r ~/src/proj /mnt/repo  Mount a specific repository");
}
