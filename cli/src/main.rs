use clap::Parser;
use jamcache::colors::ColorScheme;
use jamcache::display::{format_counts, format_import_report, format_top_track};
use jamcache::*;
use std::error::Error;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();
    let colors = ColorScheme::new(!args.no_color);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run(args, &colors) {
        eprintln!("{}", colors.error(&format!("❌ Error: {}", error)));
        std::process::exit(1);
    }
}

fn run(args: Args, colors: &ColorScheme) -> Result<(), Box<dyn Error>> {
    let app = JamcacheApp::new(args.database)?;
    let store = app.open_store()?;

    match args.command {
        Command::Import { file } => {
            println!("📥 Importing {} into {}", file.display(), app.database_path.display());
            let report = commands::import_file(&store, &file)?;
            println!("{}", format_import_report(&report, colors));
        }
        Command::PurgeCache => {
            let removed = commands::purge_cache(store)?;
            println!(
                "{} Removed {} expired cache entries",
                colors.success("🧹"),
                colors.number(&format_number(removed))
            );
        }
        Command::Stats => {
            let counts = commands::catalog_stats(&store)?;
            println!("📊 {}", app.database_path.display());
            for line in format_counts(&counts, colors) {
                println!("   {}", line);
            }
        }
        Command::Top { limit } => {
            let tracks = commands::top_tracks(&store, limit)?;
            if tracks.is_empty() {
                println!("{}", colors.warning("The catalog is empty"));
            }
            for (index, track) in tracks.iter().enumerate() {
                println!("{}", format_top_track(index + 1, track, colors));
            }
        }
    }

    Ok(())
}
