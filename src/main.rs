//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

use clap::{App, ArgMatches, SubCommand};
use dotenv::dotenv;
use env_logger::Builder;
use log::Record;
use std::env;
use std::io::Write;
use std::path::Path;
use std::process;
use time;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};
use trailmap_core::config::{parse_config, read_config, ApplicationCfg, DEFAULT_CONFIG};
use trailmap_core::feature::MarkerOptions;
use trailmap_core::raster::RasterOptions;
use trailmap_core::tile_source::TileSource;
use trailmap_core::Config;
use trailmap_view::event_loop::{self, UiEvent};
use trailmap_view::headless::HeadlessEngine;
use trailmap_view::source::{default_decoder, FileFetcher};
use trailmap_view::{MapSettings, MapViewCoordinator};

fn init_logger(args: &ArgMatches<'_>) {
    let mut builder = Builder::new();
    builder.format(|buf, record: &Record<'_>| {
        let t = time::now();
        writeln!(
            buf,
            "{}.{:03} {} {}",
            time::strftime("%Y-%m-%d %H:%M:%S", &t).unwrap_or_default(),
            t.tm_nsec / 1000_000,
            record.level(),
            record.args()
        )
    });

    let rust_log = match (args.value_of("loglevel"), env::var("RUST_LOG")) {
        (None, Ok(rust_log_env)) => rust_log_env,
        (loglevel, _) => match loglevel.unwrap_or("info") {
            "debug" => "debug,tokio=info".to_string(),
            loglevel => loglevel.to_string(),
        },
    };
    builder.parse_filters(&rust_log);

    builder.init();
}

fn exit_with_config_error<T>(err: String) -> T {
    println!("Error reading configuration - {} ", err);
    process::exit(1)
}

fn config_from_args(args: &ArgMatches<'_>) -> ApplicationCfg {
    if let Some(cfgpath) = args.value_of("config") {
        info!("Reading configuration from '{}'", cfgpath);
        read_config(cfgpath).unwrap_or_else(exit_with_config_error)
    } else {
        parse_config(DEFAULT_CONFIG.to_string(), "").unwrap_or_else(exit_with_config_error)
    }
}

/// Overlay paths are relative to the config file
fn fetcher_from_args(args: &ArgMatches<'_>) -> FileFetcher {
    let basedir = args
        .value_of("config")
        .and_then(|cfgpath| Path::new(cfgpath).parent())
        .unwrap_or_else(|| Path::new("."));
    FileFetcher::new(basedir)
}

/// Forward commands from stdin until EOF
async fn read_commands(tx: UnboundedSender<UiEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<UiEvent>() {
                    Ok(event) => {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => println!("{}", e),
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!("Error reading command: {}", e);
                break;
            }
        }
    }
}

fn view(args: &ArgMatches<'_>) {
    let config = config_from_args(args);
    let settings = MapSettings::from_config(&config).unwrap_or_else(exit_with_config_error);
    let raster = config
        .raster
        .as_ref()
        .map(RasterOptions::from_config)
        .transpose()
        .unwrap_or_else(exit_with_config_error);
    let markers = config
        .markers
        .as_ref()
        .map(MarkerOptions::from_config)
        .transpose()
        .unwrap_or_else(exit_with_config_error);
    let mut coordinator = MapViewCoordinator::new(HeadlessEngine::new(), settings)
        .unwrap_or_else(exit_with_config_error);
    let fetcher = fetcher_from_args(args);
    let decoder = default_decoder();

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            println!("Error starting runtime - {}", e);
            process::exit(1)
        });
    let (tx, rx) = mpsc::unbounded_channel();
    rt.block_on(async {
        tokio::spawn(read_commands(tx));
        event_loop::run(
            &mut coordinator,
            &fetcher,
            decoder.as_ref(),
            raster.as_ref(),
            markers.as_ref(),
            rx,
        )
        .await;
    });
    // stdin reader may still be blocked
    rt.shutdown_background();
    print!("{}", coordinator.engine());
}

fn gen_config() -> String {
    let mut config = String::new();
    config.push_str(&MapSettings::gen_config());
    config.push_str(&TileSource::gen_config());
    config.push_str(&RasterOptions::gen_config());
    config.push_str(&MarkerOptions::gen_config());
    config
}

#[cfg(feature = "with-gdal")]
extern crate trailmap_gdal;

fn version_info() -> String {
    #[cfg(feature = "with-gdal")]
    let version = format!(
        "{} (GDAL version {})",
        crate_version!(),
        trailmap_gdal::gdal_version()
    );
    #[cfg(not(feature = "with-gdal"))]
    let version = crate_version!().to_string();
    version
}

fn main() {
    dotenv().ok();
    let version_info = version_info();
    let mut app = App::new("trailmap")
        .version(&version_info as &str)
        .about("Interactive topo map with lidar overlay, markers and geolocation")
        .subcommand(SubCommand::with_name("view")
                        .args_from_usage("-c, --config=[FILE] 'Load from custom config file'
                                              --loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'")
                        .about("Open map view and read commands from stdin"))
        .subcommand(SubCommand::with_name("genconfig")
                        .args_from_usage("--loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'")
                        .about("Generate configuration template"));

    match app.get_matches_from_safe_borrow(env::args()) {
        //app.get_matches() prohibits later call of app.print_help()
        Result::Err(e) => {
            println!("{}", e);
        }
        Result::Ok(matches) => match matches.subcommand() {
            ("view", Some(sub_m)) => {
                init_logger(sub_m);
                view(sub_m);
            }
            ("genconfig", Some(sub_m)) => {
                init_logger(sub_m);
                println!("{}", gen_config());
            }
            _ => {
                let _ = app.print_help();
                println!("");
            }
        },
    }
}
