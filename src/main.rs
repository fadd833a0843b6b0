use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;

use chuva_core::{Config, PreferenceStore, TemperatureUnit};
use chuva_ui::{client_options, explanation, render, tour, ControllerSettings, WeatherController};
use chuva_weather::{ConfiguredLocation, Coordinates, WeatherClient};

/// Will it rain? Forecast verdict, hourly chances and the week ahead.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// City or address. Without it the configured default place is used.
    query: Option<String>,

    /// Latitude; use together with --lon
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude; use together with --lat
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Use the configured location provider
    #[arg(long, conflicts_with_all = ["query", "lat"])]
    here: bool,

    /// Show one day (YYYY-MM-DD) instead of the next hours
    #[arg(long)]
    day: Option<NaiveDate>,

    /// Display unit (C, F or K). The choice is saved.
    #[arg(long, value_parser = parse_unit)]
    unit: Option<TemperatureUnit>,

    /// List place suggestions for QUERY and exit
    #[arg(long, requires = "query")]
    suggest: bool,

    /// Print the guided tour after the forecast
    #[arg(long)]
    guide: bool,

    /// Print how the rain verdict is scored
    #[arg(long)]
    explain: bool,
}

fn parse_unit(s: &str) -> Result<TemperatureUnit, String> {
    TemperatureUnit::from_code(s).ok_or_else(|| format!("unknown unit '{}', expected C, F or K", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    chuva_core::init()?;
    let (config, _) = Config::load_validated().context("Failed to load configuration")?;

    let store = PreferenceStore::new(&config.config_dir);
    let unit = store.load();
    let provider = ConfiguredLocation::from_position(
        config
            .location
            .fixed_position
            .map(|p| Coordinates::new(p.latitude, p.longitude)),
    );
    let client =
        WeatherClient::new(client_options(&config)).context("Failed to build HTTP client")?;
    let mut controller = WeatherController::new(
        client,
        provider,
        unit,
        &ControllerSettings::from_config(&config),
    )
    .with_preferences(store);

    if let Some(unit) = args.unit {
        controller.set_unit(unit);
        tracing::info!("Temperature unit set to {}", unit.name());
    }

    if args.explain {
        println!("{}", explanation());
    }

    if args.suggest {
        controller.suggest(args.query.as_deref().unwrap_or_default());
        controller.settle().await;
        print!("{}", render::suggestions(controller.suggestions()));
        return Ok(());
    }

    match (args.here, args.lat.zip(args.lon), args.query.as_deref()) {
        (true, _, _) => controller.locate(),
        (false, Some((lat, lon)), name) => {
            controller.run_for_coords(Coordinates::new(lat, lon), name)
        }
        (false, None, Some(query)) => controller.search(query),
        (false, None, None) => {
            let place = &config.location.default_place;
            controller.run_for_coords(
                Coordinates::new(place.latitude, place.longitude),
                Some(place.name.as_str()),
            );
        }
    }
    controller.settle().await;

    if let Some(day) = args.day {
        if !controller.select_day(day) {
            eprintln!("Sem previsão para {}", day.format("%d/%m/%Y"));
        }
    }

    let screen = controller.screen();
    if let Some(status) = controller.status() {
        eprintln!("{}", status);
    }
    let Some(screen) = screen else {
        bail!("Nenhuma previsão disponível");
    };
    print!("{}", screen);

    if args.guide {
        match controller.start_tour() {
            Some(_) => print!("{}", render::tour(controller.tour())),
            None => println!("{}", tour::NOTHING_TO_SHOW),
        }
    }

    Ok(())
}
