use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;
use ted_search_lib::api::query::Direction;
use ted_search_lib::config::DEFAULT_ENDPOINT;

#[derive(Parser, Debug)]
#[command(name = "ted-search", version, about = "Search procurement notices on TED")]
pub struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity (-v info, -vv debug)")]
    pub verbose: u8,

    #[arg(long, default_value = DEFAULT_ENDPOINT, help = "Search endpoint URL")]
    pub endpoint: String,
    #[arg(long, default_value_t = 20, help = "Per-request timeout in seconds")]
    pub timeout: u64,
    #[arg(long, default_value_t = 5, help = "Attempts per request, including the first")]
    pub max_attempts: u32,
    #[arg(long, default_value_t = 1000)]
    pub base_delay_ms: u64,
    #[arg(long, default_value_t = 10_000)]
    pub max_delay_ms: u64,

    #[arg(long, help = "First publication date (YYYY-MM-DD)")]
    pub date_from: String,
    #[arg(long, help = "Last publication date (YYYY-MM-DD)")]
    pub date_to: String,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "Country codes, e.g. DE,FR")]
    pub countries: Vec<String>,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "CPV prefixes, e.g. 33*")]
    pub cpv: Vec<String>,
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub keywords: Vec<String>,
    #[arg(long = "form-type", value_delimiter = ',', num_args = 1..)]
    pub form_types: Vec<String>,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "Fields to return (defaults to a standard set)")]
    pub fields: Vec<String>,

    #[arg(long, value_enum, default_value_t = Mode::Page)]
    pub mode: Mode,
    #[arg(long, default_value_t = 1, help = "First page to fetch (page mode)")]
    pub page: u32,
    #[arg(long, default_value_t = 100, help = "Page size or iteration batch size")]
    pub limit: u32,
    #[arg(long, default_value_t = 1, help = "Number of pages to fetch (page mode)")]
    pub max_pages: u32,
    #[arg(long, default_value = "publication-date")]
    pub sort_field: String,
    #[arg(long, default_value = "desc")]
    pub sort_order: Direction,

    #[arg(long, help = "Write output to a file instead of stdout")]
    pub out: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
    #[arg(long, default_value_t = false, help = "Print the query expression and exit")]
    pub print_query: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Fetch numbered pages.
    Page,
    /// Stream every matching notice using continuation tokens.
    Iteration,
}
