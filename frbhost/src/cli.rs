// frbhost/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use frbhost_core::domain::sed::{DEFAULT_CONFIG_FILE, DEFAULT_DATA_FILE};

#[derive(Parser)]
#[command(name = "frbhost")]
#[command(about = "CIGALE glue for FRB hosts and FRB record builder", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by `configure` and `fit`.
#[derive(clap::Args, Debug, Clone)]
pub struct SedArgs {
    /// CIGALE config file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: PathBuf,

    /// Number of cores (default: every logical core)
    #[arg(long)]
    pub cores: Option<usize>,

    /// SED modules, comma separated (ex: "sfhdelayed,bc03,redshifting")
    #[arg(long, value_delimiter = ',')]
    pub sed_modules: Option<Vec<String>>,

    /// YAML file with per-module parameter overrides
    #[arg(long)]
    pub params: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🔭 Translates a photometric catalog into a CIGALE data file
    Translate {
        /// Photometric table (CSV, Parquet, FITS or text)
        input: PathBuf,

        /// Redshift column of the input table
        #[arg(long)]
        zcol: String,

        #[arg(long, default_value = DEFAULT_DATA_FILE)]
        data_file: PathBuf,

        /// Fail instead of replacing an existing data file
        #[arg(long, default_value = "false")]
        no_overwrite: bool,
    },

    /// ⚙️  Writes pcigale.ini (and pcigale.ini.spec)
    Configure {
        #[arg(long, default_value = DEFAULT_DATA_FILE)]
        data_file: PathBuf,

        #[command(flatten)]
        sed: SedArgs,
    },

    /// 🚀 Runs the full CIGALE fit (translate -> configure -> fit -> plots)
    Fit {
        /// Photometric table of the host(s)
        input: PathBuf,

        #[arg(long)]
        zcol: String,

        #[arg(long, default_value = DEFAULT_DATA_FILE)]
        data_file: PathBuf,

        #[command(flatten)]
        sed: SedArgs,

        /// Pause after writing the config so it can be edited by hand
        #[arg(long, default_value = "false")]
        wait: bool,

        /// Skip pcigale-plots
        #[arg(long, default_value = "false")]
        no_plot: bool,

        /// Move CIGALE's out/ directory here
        #[arg(long)]
        outdir: Option<PathBuf>,

        /// Write photo_observed_model.dat after the fit
        #[arg(long, default_value = "false")]
        compare: bool,

        /// Project directory (frbhost.yaml)
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 📡 Builds FRB JSON records from the base table
    BuildFrbs {
        /// "all" or a comma separated list (ex: "FRB20180924B,121102")
        #[arg(long, default_value = "all")]
        frbs: String,

        /// FRB base table (default: `base-table` of frbhost.yaml)
        #[arg(long)]
        base_table: Option<PathBuf>,

        /// Output directory (default: `records-dir` of frbhost.yaml)
        #[arg(long)]
        out_path: Option<PathBuf>,

        /// Skip FRBs whose DM_ISM cannot be computed
        #[arg(long = "override", default_value = "false")]
        override_failures: bool,

        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
}
