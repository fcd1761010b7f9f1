use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, ValueEnum};
use log::info;

use folio::{
    build_plan, parse_columns, with_default_labels, ColumnSpec, ConfigOverrides, JsonRenderer,
    LedgerOptions, Preset, RenderConfig, Renderer, TextRenderer, Theme, DEFAULT_COLUMNS,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Format {
    /// The complete table plan, for a drawing backend.
    Json,
    /// A fixed-width preview of the table.
    Text,
}

/// Lays out a portfolio ledger as a printable table.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Ledger JSON file, `-` for stdin
    #[arg(default_value = "data.json")]
    ledger: PathBuf,

    /// Table variant to start from: landscape, a4-portrait or dark-a4
    #[arg(long, default_value = "a4-portrait")]
    preset: Preset,

    /// Column spec such as `symbol = Sym, quantity = Q`
    #[arg(long, conflicts_with = "columns_file")]
    columns: Option<String>,

    /// File holding a column spec
    #[arg(long)]
    columns_file: Option<PathBuf>,

    /// JSON file with render settings that override the preset
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    theme: Option<Theme>,

    #[arg(long)]
    font_size: Option<f64>,

    /// Horizontal padding per column, in points
    #[arg(long)]
    padding: Option<f64>,

    /// Average glyph width relative to the font size
    #[arg(long)]
    char_width_factor: Option<f64>,

    /// Column that shows the user name on sub-transaction rows
    #[arg(long)]
    identity: Option<String>,

    /// Prefix for the user name on sub-transaction rows
    #[arg(long)]
    marker: Option<String>,

    #[arg(long, default_value = "user_transactions")]
    sub_transactions_key: String,

    #[arg(long, default_value = "user_name")]
    display_name_key: String,

    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Output file, `-` for stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            theme: self.theme,
            font_size: self.font_size,
            padding: self.padding,
            char_width_factor: self.char_width_factor,
            identity_column: self.identity.clone(),
            secondary_marker: self.marker.clone(),
            ..ConfigOverrides::default()
        }
    }

    fn render_config(&self) -> Result<RenderConfig> {
        let mut config = self.preset.config();
        if let Some(path) = &self.config {
            let text = fs::read_to_string(path)
                .with_context(|| format!("could not read config file {}", path.display()))?;
            let overrides: ConfigOverrides = serde_json::from_str(&text)
                .with_context(|| format!("invalid config file {}", path.display()))?;
            config.apply(&overrides);
        }
        config.apply(&self.overrides());
        config.validate()?;
        Ok(config)
    }

    fn ledger_options(&self) -> LedgerOptions {
        LedgerOptions::builder()
            .sub_transactions_key(self.sub_transactions_key.as_str())
            .display_name_key(self.display_name_key.as_str())
            .build()
    }
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_input(path: &Path) -> Result<String> {
    if is_stdio(path) {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("could not read ledger from stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(path).with_context(|| format!("could not read ledger {}", path.display()))
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) if !is_stdio(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("could not create {}", path.display()))?,
        )),
        _ => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn columns(spec: &str) -> Result<ColumnSpec<'_>> {
    let columns = parse_columns(spec).context("invalid column spec")?;
    Ok(with_default_labels(columns)?)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("folio=info")).init();

    let args = Args::parse();
    let config = args.render_config()?;

    let spec_text = match (&args.columns, &args.columns_file) {
        (Some(spec), _) => Some(spec.clone()),
        (None, Some(path)) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("could not read column spec {}", path.display()))?,
        ),
        (None, None) => None,
    };
    let columns = match &spec_text {
        Some(spec) => columns(spec)?,
        None => DEFAULT_COLUMNS.clone(),
    };

    let ledger = read_input(&args.ledger)?;
    let plan = build_plan(
        &ledger,
        &columns,
        &args.ledger_options(),
        &config,
        Local::now().naive_local(),
    )
    .with_context(|| format!("could not lay out {}", args.ledger.display()))?;

    let mut out = open_output(args.output.as_deref())?;
    match args.format {
        Format::Json => JsonRenderer::pretty().render(&plan, &mut out)?,
        Format::Text => TextRenderer::new().render(&plan, &mut out)?,
    }
    out.flush()?;

    info!(
        "{} rows across {} columns ({} preset)",
        plan.rows.len().saturating_sub(1),
        plan.column_widths.len(),
        args.preset
    );
    Ok(())
}
