use anyhow::{anyhow, Result};
use clap::{App as Cli, Arg};
use crm_tui::app::App;
use crm_tui::config::{Config, Overrides};
use log::LevelFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Cli::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Directory holding config.yml")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("base-url")
                .long("base-url")
                .value_name("URL")
                .help("CRM API base URL")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("page-size")
                .long("page-size")
                .value_name("N")
                .help("Rows per page")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("token")
                .long("token")
                .value_name("TOKEN")
                .help("Access token for this session")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Show debug entries in the log panel"),
        )
        .get_matches();

    let page_size = matches
        .value_of("page-size")
        .map(str::parse::<usize>)
        .transpose()
        .map_err(|e| anyhow!("Invalid --page-size: {}", e))?;

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;
    if let Some(path) = config.file_path() {
        if !path.exists() {
            if let Err(e) = config.save() {
                eprintln!("Could not write default config: {}", e);
            }
        }
    }
    config.apply_overrides(Overrides {
        base_url: matches.value_of("base-url").map(str::to_string),
        page_size,
        access_token: matches.value_of("token").map(str::to_string),
    });
    config.validate()?;

    let level = if matches.is_present("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    App::start(config, level).await
}
