//! Rendering of listings for the terminal.

use app_catalog_core::{AppRecord, Listing, ListingSource, SortPreset};

/// Describe where a listing came from.
pub fn describe_source(listing: &Listing) -> String {
    match &listing.source {
        ListingSource::Fixtures => "local fixtures (sorted locally)".to_string(),
        ListingSource::Remote(sel) if sel.presorted => {
            format!("{} (presorted by service)", sel.endpoint)
        }
        ListingSource::Remote(sel) => format!("{} (sorted locally)", sel.endpoint),
    }
}

/// One aligned row per record.
pub fn render_table(records: &[AppRecord]) -> String {
    let mut out = format!(
        "{:>5}  {:<24} {:<12} {:>8} {:>6} {:>10} {:>8}\n",
        "ID", "NAME", "CATEGORY", "PRICE", "RATING", "DOWNLOADS", "REVIEWS"
    );
    for r in records {
        out.push_str(&format!(
            "{:>5}  {:<24} {:<12} {:>8.2} {:>6.1} {:>10} {:>8}\n",
            r.id,
            truncate(r.name().unwrap_or("-"), 24),
            truncate(r.category.as_deref().unwrap_or("-"), 12),
            r.price,
            r.rating,
            r.downloads,
            r.reviews,
        ));
    }
    out
}

/// Preset picker contents.
pub fn render_presets(presets: &[SortPreset]) -> String {
    presets
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{i}: {:<26} {}\n", p.label, p.spec))
        .collect()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
        t.push('…');
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_catalog_core::{sort_presets, AppRecord};
    use serde_json::json;

    #[test]
    fn table_has_header_and_one_row_per_record() {
        let records = vec![
            AppRecord::normalize(&json!({ "id": 1, "name": "Maps", "downloads": "10" })),
            AppRecord::normalize(&json!({ "id": 2 })),
        ];
        let table = render_table(&records);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("DOWNLOADS"));
        assert!(lines[1].contains("Maps"));
        assert!(lines[2].contains('-'));
    }

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }

    #[test]
    fn presets_are_numbered() {
        let text = render_presets(&sort_presets());
        assert!(text.starts_with("0: Default"));
        assert!(text.contains("downloads desc"));
    }
}
