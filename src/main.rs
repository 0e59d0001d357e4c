use clap::Parser;
use cropgrid::compare::{self, ComparisonRequest};
use cropgrid::config::{self, ConfigOverrides};
use cropgrid::imaging::{CropRect, RustBackend, TextRenderer};
use cropgrid::metadata::InfoField;
use cropgrid::output;
use std::ffi::OsString;
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("CROPGRID_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("CROPGRID_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "cropgrid")]
#[command(about = "Compare the same region of several photos side by side")]
#[command(long_about = "\
Compare the same region of several photos side by side

Every input is cropped to the same rectangle, optionally labelled with
values from its EXIF data, and tiled into one grid image:

  cropgrid a.jpg b.jpg c.jpg d.jpg --output cmp.jpg --info fstop iso
  → cmp_rust.jpg, a 2x2 grid of 1000x500 crops

Up to 16 images are supported. The written file name is the --output stem
with the backend name appended (cmp.jpg → cmp_rust.jpg).

--info takes any number of values, so list the inputs first or end the
field list with --.

Run 'cropgrid --gen-config' to print a documented config file.")]
#[command(version = version_string())]
struct Cli {
    /// Images to compare, tiled in the order given
    #[arg(required_unless_present = "gen_config", num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Base output path; the backend name is appended to its stem
    #[arg(long, required_unless_present = "gen_config")]
    output: Option<PathBuf>,

    /// Metadata fields drawn on each crop, top to bottom
    #[arg(long, value_enum, num_args = 0..)]
    info: Vec<InfoField>,

    /// TOML config file (see --gen-config)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Crop rectangle, overriding the config file
    #[arg(long, value_name = "LEFT,TOP,RIGHT,BOTTOM")]
    crop: Option<CropRect>,

    /// JPEG quality 1-100, overriding the config file
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    quality: Option<u32>,

    /// Font file for annotations, overriding the config file
    #[arg(long)]
    font: Option<PathBuf>,

    /// Print a stock config file with all options documented, then exit
    #[arg(long)]
    gen_config: bool,
}

/// Long flags that older invocations spell with a single dash.
const SINGLE_DASH_FLAGS: &[&str] = &["output", "info", "config"];

/// Rewrite `-output`, `-info` and `-config` to their `--` forms.
///
/// Arguments after a bare `--` are left alone.
fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut past_separator = false;
    args.into_iter()
        .map(|arg| {
            if past_separator {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                past_separator = true;
                return arg;
            }
            let Some(rest) = text.strip_prefix('-').filter(|r| !r.starts_with('-')) else {
                return arg;
            };
            let name = rest.split('=').next().unwrap_or(rest);
            if SINGLE_DASH_FLAGS.contains(&name) {
                OsString::from(format!("-{text}"))
            } else {
                arg
            }
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse_from(normalize_legacy_flags(std::env::args_os()));

    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let overrides = ConfigOverrides {
        crop: cli.crop,
        quality: cli.quality,
        font: cli.font,
    };
    let config = config::load_config(cli.config.as_deref(), &overrides)?;

    let request = ComparisonRequest {
        inputs: cli.inputs,
        output: cli.output.ok_or("--output is required")?,
        fields: cli.info,
    };
    output::print_arguments(&request, &config);

    let renderer = compare::load_renderer(&request, config.annotation.font.as_deref())?;

    let backend = RustBackend::new();
    let written = compare::run(
        &request,
        &config,
        &backend,
        renderer.as_ref().map(|r| r as &dyn TextRenderer),
    )?;
    output::print_saved(&written);

    Ok(())
}
