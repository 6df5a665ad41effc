use pageport_lib::import::{EntityReport, ImportReport, MediaReport};

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
}

/// Wrap `text` in `color` when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Render an import report as indented plain text
pub fn render_report(report: &ImportReport, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.extend(render_media(&report.media, use_color));
    lines.extend(render_entities("Blocks", &report.blocks, use_color));
    lines.extend(render_entities("Pages", &report.pages, use_color));

    let errors = report.error_count();
    lines.push(String::new());
    if errors == 0 {
        lines.push(paint("Import finished without errors", Color::GREEN, use_color));
    } else {
        lines.push(paint(
            &format!("Import finished with {} errors", errors),
            Color::YELLOW,
            use_color,
        ));
    }

    lines.join("\n")
}

fn render_media(media: &MediaReport, use_color: bool) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} downloaded, {} already local, {} failed",
        paint("Media:", Color::BOLD, use_color),
        media.downloaded,
        media.reused.len(),
        media.errors.len()
    )];

    for (old, new) in &media.uploaded {
        lines.push(format!("  {} {}", paint(old, Color::DIM, use_color), new));
    }
    for error in &media.errors {
        lines.push(format!(
            "  {} {}: {}",
            paint("!", Color::RED, use_color),
            error.url,
            error.error
        ));
    }

    lines
}

fn render_entities(label: &str, report: &EntityReport, use_color: bool) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} created, {} updated, {} failed",
        paint(&format!("{}:", label), Color::BOLD, use_color),
        report.created.len(),
        report.updated.len(),
        report.errors.len()
    )];

    for slug in &report.created {
        lines.push(format!("  {} {}", paint("+", Color::GREEN, use_color), slug));
    }
    for slug in &report.updated {
        lines.push(format!("  {} {}", paint("~", Color::YELLOW, use_color), slug));
    }
    for error in &report.errors {
        lines.push(format!(
            "  {} {}: {}",
            paint("!", Color::RED, use_color),
            error.slug,
            error.error
        ));
    }

    lines
}
