use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use clap::Parser;
use yaweather_core::{Config, Params, WeatherClient};

const USAGE: &str = "\
Usage: yaweather [OPTIONS] -api <file> -latlon <lat>:<lon> [-limit <days>]

Parameters:
  -api <file>            File holding the API key on a single line
  -latlon <lat>:<lon>    Latitude [-90, 90] and longitude [-180, 180]
  -limit <days>          Number of forecast days (default: 1)
  -help                  Print this help

Options (must come before parameters):
  --config <path>        Config file with defaults (api_key, latitude, longitude, limit)
  --pretty               Print the indented JSON response
  --raw                  Print the raw response body
  --json                 Print the temperature summary as JSON
  --save-raw <path>      Save the raw response body after fetching
  --load-raw <path>      Replay a saved response instead of calling the service

Set RUST_LOG=debug to see request details.";

/// Top-level CLI struct.
///
/// The single-dash forecast parameters are collected verbatim and handed to
/// [`Params::parse`], so clap's own help and version flags are disabled.
#[derive(Debug, Parser)]
#[command(
    name = "yaweather",
    about = "Yandex weather forecast CLI",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub pretty: bool,

    #[arg(long)]
    pub raw: bool,

    #[arg(long)]
    pub json: bool,

    #[arg(long, value_name = "PATH")]
    pub save_raw: Option<PathBuf>,

    #[arg(long, value_name = "PATH", conflicts_with = "save_raw")]
    pub load_raw: Option<PathBuf>,

    /// Forecast parameters: -api, -latlon, -limit, -help.
    #[arg(
        value_name = "PARAMS",
        num_args = 0..,
        allow_hyphen_values = true,
        trailing_var_arg = true
    )]
    pub params: Vec<String>,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let params = Params::parse(&self.params)?;

        if params.help {
            println!("{USAGE}");
            return Ok(());
        }

        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        let mut client = WeatherClient::with_options(config.endpoint(), config.timeout())?;

        match &self.load_raw {
            Some(dump) => {
                client
                    .load_raw_response_from_file(dump)
                    .with_context(|| format!("Failed to load response from {}", dump.display()))?;
            }
            None => {
                self.configure(&mut client, &params, &config)?;
                client.fetch_forecast().await.context("Bad request")?;

                if let Some(path) = &self.save_raw {
                    client
                        .save_raw_response_to_file(path)
                        .with_context(|| format!("Failed to save response to {}", path.display()))?;
                }
            }
        }

        self.report(&client, &mut io::stdout().lock())
    }

    fn configure(&self, client: &mut WeatherClient, params: &Params, config: &Config) -> Result<()> {
        match (&params.api_file, &config.api_key) {
            (Some(file), _) => {
                client.set_api_key_file(file).context("Bad API file format")?;
                self.note(format!("Api file is: {}", file_name(file)));
            }
            (None, Some(key)) => {
                client.set_api_key(key.as_str());
                self.note("Api key is taken from config");
            }
            (None, None) => {
                return Err(anyhow!("API file is mandatory (pass -api <file> or set api_key in config)"));
            }
        }

        let coords = params
            .latlon
            .or_else(|| config.coordinates())
            .ok_or_else(|| anyhow!("LatLon parameter is mandatory"))?;
        client
            .set_coordinates(coords.latitude, coords.longitude)
            .context("LatLon out of range")?;
        self.note(format!("Latitude: {:.4}", coords.latitude));
        self.note(format!("Longitude: {:.4}", coords.longitude));

        if let Some(limit) = params.limit.or(config.limit) {
            client.set_limit(limit).context("Limit out of range")?;
            self.note(format!("Limit: {limit}"));
        }

        Ok(())
    }

    /// Print the response and temperatures. The current temperature is
    /// written before the average is computed, so it survives a bad forecast list.
    fn report(&self, client: &WeatherClient, out: &mut impl Write) -> Result<()> {
        if self.raw {
            writeln!(out, "{}", client.raw_last_response().unwrap_or_default())?;
        }
        if self.pretty {
            writeln!(out, "{}", client.pretty_last_response())?;
        }

        if self.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&client.summary()?)?)?;
            return Ok(());
        }

        if let Ok(at) = client.observation_time() {
            writeln!(out, "Observed: {}", at.with_timezone(&Local).format("%Y-%m-%d %H:%M"))?;
        }
        writeln!(out, "Temp: {}", client.last_temperature()?)?;
        writeln!(out, "AvgTemp: {}", client.average_forecast_temperature()?)?;

        Ok(())
    }

    /// Settings echo; suppressed for JSON output so stdout stays parseable.
    fn note(&self, line: impl AsRef<str>) {
        if !self.json {
            println!("{}", line.as_ref());
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
