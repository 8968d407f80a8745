use std::fs;

use anyhow::{format_err, Error};
use serde::Deserialize;
use structopt::StructOpt;

use crate::theme::Theme;

pub fn resolve_opts() -> Opts {
    let mut opts = get_cli_opts();

    if let Ok(config_opts) = get_config_opts() {
        // Options
        opts.portfolio_url = opts.portfolio_url.or(config_opts.portfolio_url);
        opts.user_url = opts.user_url.or(config_opts.user_url);
        opts.transaction_url = opts.transaction_url.or(config_opts.transaction_url);
        opts.route = opts.route.or(config_opts.route);

        // Flags
        opts.hide_help = opts.hide_help || config_opts.hide_help;

        opts.theme = config_opts.theme;
    }

    opts
}

fn get_cli_opts() -> Opts {
    Opts::from_args()
}

pub fn get_config_opts() -> Result<Opts, Error> {
    let config_dir = dirs_next::config_dir()
        .ok_or_else(|| format_err!("Could not get config directory"))?
        .join("folio");

    let config_path = config_dir.join("config.yml");

    let config = fs::read_to_string(config_path)?;

    let opts = serde_yaml::from_str(&config)?;

    Ok(opts)
}

#[derive(Debug, StructOpt, Clone, Deserialize, Default)]
#[structopt(
    name = "folio",
    about = "Terminal client for the finance portfolio services",
    version = env!("CARGO_PKG_VERSION")
)]
#[serde(default)]
pub struct Opts {
    // Options
    //
    #[structopt(long)]
    /// Base address of the portfolio service
    pub portfolio_url: Option<String>,
    #[structopt(long)]
    /// Base address of the user service
    pub user_url: Option<String>,
    #[structopt(long)]
    /// Base address of the transaction service
    pub transaction_url: Option<String>,
    #[structopt(short, long)]
    /// Path to open at startup, e.g. /dashboard or /portfolio/3
    pub route: Option<String>,

    // Flags
    //
    #[structopt(long)]
    /// Hide help hint in top right
    pub hide_help: bool,

    #[structopt(skip)]
    pub theme: Theme,
}
