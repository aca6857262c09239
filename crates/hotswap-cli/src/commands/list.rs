use std::path::Path;

use anyhow::{Result, bail};
use clap::ValueEnum;
use hotswap_core::{Bundle, Platform, parse_app_version};
use hotswap_resolver::eligible_bundles;

use super::open_catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// `hotswap list`
///
/// Without `--platform` (and no configured default) every bundle is shown.
pub fn list(
    config_path: &Path,
    platform: Option<Platform>,
    app_version: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let (config, store) = open_catalog(config_path)?;
    let bundles = store.list_bundles()?;
    let app_version = app_version.map(parse_app_version).transpose()?;

    let rows = match platform.or_else(|| config.default_platform()) {
        Some(platform) => {
            let listing = eligible_bundles(&bundles, platform, app_version.as_ref());
            for warning in &listing.warnings {
                eprintln!("warning: {warning}");
            }
            listing.rows
        }
        None if app_version.is_some() => bail!("--app-version needs a platform"),
        None => bundles,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Text => print!("{}", format_table(&rows)),
    }
    Ok(())
}

/// Render bundles as an aligned text table.
pub fn format_table(rows: &[Bundle]) -> String {
    if rows.is_empty() {
        return "No bundles.\n".to_string();
    }

    let headers = ["ID", "PLATFORM", "TARGET", "ENABLED", "FORCE", "MESSAGE"];
    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|b| {
            [
                b.id.to_string(),
                b.platform.to_string(),
                b.target_version.clone(),
                yes_no(b.enabled).to_string(),
                yes_no(b.force_update).to_string(),
                b.message.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &headers.map(str::to_string), &widths);
    for row in &cells {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, row: &[String; 6], widths: &[usize; 6]) {
    let line: Vec<String> = row
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
