use anyhow::{anyhow, Result};
use clap::{Args, Subcommand, ValueEnum};

use crate::domain::{FuelType, SearchMode, SearchRequest};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Buy,
    Leasing,
}

impl From<ModeArg> for SearchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Buy => SearchMode::Buy,
            ModeArg::Leasing => SearchMode::Leasing,
        }
    }
}

/// Search criteria shared by `search` and `direct-search`.
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    #[arg(long, value_enum, default_value = "buy")]
    pub mode: ModeArg,

    /// Vehicle make, repeatable or comma separated
    #[arg(long = "make", value_delimiter = ',')]
    pub makes: Vec<String>,

    #[arg(long = "model", value_delimiter = ',')]
    pub models: Vec<String>,

    #[arg(long)]
    pub year_from: Option<u32>,

    #[arg(long)]
    pub year_to: Option<u32>,

    /// benzin, diesel, ev, hybrid or phev
    #[arg(long = "fuel", value_delimiter = ',')]
    pub fuel_types: Vec<String>,

    /// Equipment codes such as `laeder` or `traekkrog`
    #[arg(long, value_delimiter = ',')]
    pub equipment: Vec<String>,

    #[arg(long)]
    pub max_price: Option<f64>,

    #[arg(long)]
    pub monthly_max: Option<f64>,

    #[arg(long)]
    pub downpayment_max: Option<f64>,

    #[arg(long)]
    pub tax_paid: Option<bool>,

    #[arg(short, long)]
    pub optimization: Option<String>,

    /// Site domain or group (`group:DK`, `group:EU`), repeatable
    #[arg(long = "site", value_delimiter = ',')]
    pub sites: Vec<String>,
}

impl SearchArgs {
    pub fn into_request(self) -> Result<SearchRequest> {
        let fuel_types = self
            .fuel_types
            .iter()
            .map(|f| FuelType::from_str(f).ok_or_else(|| anyhow!("Unknown fuel type: {f}")))
            .collect::<Result<Vec<_>>>()?;

        let mut request = SearchRequest::new(self.mode.into())
            .with_makes(self.makes)
            .with_models(self.models)
            .with_years(self.year_from, self.year_to)
            .with_sites(self.sites);

        request.fuel_types = fuel_types;
        request.equipment = self.equipment;
        request.max_price = self.max_price;
        request.monthly_max = self.monthly_max;
        request.downpayment_max = self.downpayment_max;
        request.tax_paid = self.tax_paid;
        request.optimization = self.optimization;

        Ok(request)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,
    },

    /// Search through the LLM search API
    Search {
        #[command(flatten)]
        criteria: SearchArgs,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Search the marketplace integrations directly
    DirectSearch {
        #[command(flatten)]
        criteria: SearchArgs,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List vehicle makes
    Makes {
        /// `vpic` to skip CarQuery
        #[arg(long)]
        provider: Option<String>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List models for a make
    Models {
        make: String,

        #[arg(long)]
        provider: Option<String>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the form option tables
    Options {
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}
