mod cache;
mod card;
mod config;
mod i18n;
mod layout;
mod loader;
mod progress;
mod stats;
mod svg;
mod theme;

use anyhow::Result;
use cache::ResponseMeta;
use card::{render_card, render_error};
use chrono::Utc;
use clap::Parser;
use config::{Args, RenderConfig};
use i18n::Locales;
use layout::ColorTable;
use std::path::Path;
use theme::ThemeTable;
use tracing_subscriber::EnvFilter;

/// Sets up stderr logging; `RUST_LOG` overrides the verbosity flag.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(std::io::stderr)
        .init();
}

/// Prints the available theme names.
fn list_themes(themes: &ThemeTable) {
    println!("Available themes:\n");
    for name in themes.names() {
        println!("  {}", name);
    }
    println!("\nUse --theme <NAME> to select one.");
}

/// Writes an error card in place of the statistics card and exits non-zero.
fn fail_with_card(
    output: Option<&Path>,
    meta: Option<&ResponseMeta>,
    message: &str,
    secondary: Option<&str>,
) -> Result<()> {
    let document = render_error(message, secondary);
    loader::write_output(output, meta, &document)?;
    std::process::exit(1);
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut themes = ThemeTable::builtin();
    if let Some(path) = &args.themes {
        themes.merge(loader::load_themes(path)?);
    }

    if args.list_themes {
        list_themes(&themes);
        return Ok(());
    }

    let Some(input) = args.input.as_deref() else {
        anyhow::bail!("No input file given. Use --input <PATH>.");
    };

    let meta = args.headers.then(|| {
        let max_age = cache::cache_seconds(args.cache_seconds.as_deref());
        ResponseMeta::new(max_age, Utc::now())
    });
    let output = args.output.as_deref();

    let locales = Locales::builtin();
    let config_locale = args.locale.trim().to_lowercase();
    if !locales.is_available(&config_locale) {
        tracing::error!("Locale {:?} is not available", args.locale);
        return fail_with_card(
            output,
            meta.as_ref(),
            "Something went wrong",
            Some("Language not found"),
        );
    }

    let records = match loader::load_records(input, &args.stat) {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to load statistics: {:#}", e);
            let cause = e.root_cause().to_string();
            let primary = e.to_string();
            let secondary = (cause != primary).then_some(cause.as_str());
            return fail_with_card(output, meta.as_ref(), &primary, secondary);
        }
    };

    let colors = match &args.colors {
        Some(path) => loader::load_colors(path, &args.stat)?,
        None => ColorTable::new(),
    };

    let config = RenderConfig::from_args(&args, colors);
    let document = render_card(&records, &config, &themes, &locales);

    loader::write_output(output, meta.as_ref(), &document)
}
