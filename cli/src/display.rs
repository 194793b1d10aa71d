use jamcache_core::{ImportReport, StoreCounts, StoredTrack};

use crate::colors::ColorScheme;
use crate::utils::format_number;

pub fn format_import_report(report: &ImportReport, colors: &ColorScheme) -> String {
    let mut out = format!(
        "{} Imported {} tracks",
        colors.success("✅"),
        colors.number(&format_number(report.imported))
    );
    if report.skipped > 0 {
        out.push_str(&format!(
            ", {} {}",
            colors.number(&format_number(report.skipped)),
            colors.warning("skipped")
        ));
        for error in &report.errors {
            out.push_str(&format!("\n   {} {}", colors.warning("-"), error));
        }
    }
    out
}

pub fn format_counts(counts: &StoreCounts, colors: &ColorScheme) -> Vec<String> {
    let live = counts.cache_entries.saturating_sub(counts.expired_cache_entries);
    vec![
        count_line("Tracks", counts.tracks, colors),
        count_line("Favorites", counts.favorites, colors),
        count_line("Plays", counts.plays, colors),
        format!(
            "{:<14} {} ({} live, {} expired)",
            colors.label("Cache entries"),
            colors.number(&format_number(counts.cache_entries)),
            format_number(live),
            format_number(counts.expired_cache_entries)
        ),
    ]
}

fn count_line(label: &str, value: usize, colors: &ColorScheme) -> String {
    format!(
        "{:<14} {}",
        colors.label(label),
        colors.number(&format_number(value))
    )
}

pub fn format_top_track(rank: usize, stored: &StoredTrack, colors: &ColorScheme) -> String {
    let track = &stored.track;
    format!(
        "{:>3} {} by {} [{:.1} rating, {} downloads, {} favorites] {}",
        colors.rank(&format!("{rank}.")),
        colors.track_name(&format!("\"{}\"", track.name)),
        colors.artist_name(&track.artist_name),
        track.stats_rate,
        format_number(usize::try_from(track.stats_downloads_total).unwrap_or(0)),
        format_number(usize::try_from(track.stats_playlisted).unwrap_or(0)),
        track.duration_formatted()
    )
}
