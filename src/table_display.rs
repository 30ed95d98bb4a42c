use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use crossterm::style::Stylize;
use photo_search::{DateFilter, FilterSettings, Photo, SearchState};

pub fn display_photos(photos: &[Photo]) {
    if photos.is_empty() {
        println!("{}", "No photos found.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        ["#", "id", "title", "uploaded", "url"]
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );

    for (i, photo) in photos.iter().enumerate() {
        let uploaded = photo
            .created_at
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        table.add_row(vec![
            (i + 1).to_string(),
            photo.id.to_string(),
            photo.title.clone(),
            uploaded,
            photo.image_url.clone(),
        ]);
    }

    println!("{table}");
    println!("{}", format!("{} photos returned", photos.len()).green());
}

/// The range only shows while the date filter is on
fn date_range_label(filters: &FilterSettings) -> String {
    if filters.date_filter().get() != DateFilter::UploadedBetween {
        return "-".to_string();
    }
    match (filters.min_upload_date().get(), filters.max_upload_date().get()) {
        (Some(min), Some(max)) => format!("{} .. {}", min.to_rfc3339(), max.to_rfc3339()),
        _ => "-".to_string(),
    }
}

pub fn display_state(state: &SearchState, filters: &FilterSettings) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let dates = date_range_label(filters);

    table.add_row(vec!["query".to_string(), format!("{:?}", state.query_text)]);
    table.add_row(vec!["valid".to_string(), state.is_valid.to_string()]);
    table.add_row(vec!["in progress".to_string(), state.in_progress.to_string()]);
    table.add_row(vec!["results".to_string(), state.results.len().to_string()]);
    table.add_row(vec![
        "last error".to_string(),
        state.last_error.clone().unwrap_or_else(|| "-".to_string()),
    ]);
    table.add_row(vec![
        "creative commons".to_string(),
        filters.creative_commons_only().get().to_string(),
    ]);
    table.add_row(vec!["date filter".to_string(), filters.date_filter().get().to_string()]);
    table.add_row(vec!["dates".to_string(), dates]);

    println!("{table}");
}
