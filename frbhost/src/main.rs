// frbhost/src/main.rs

use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::build_frbs::BuildArgs;
use commands::fit::FitArgs;

fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug frbhost fit ... to see the details
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        // --- USE CASE: TRANSLATE CATALOG ---
        Commands::Translate {
            input,
            zcol,
            data_file,
            no_overwrite,
        } => commands::translate::execute(input, zcol, data_file, no_overwrite)?,

        // --- USE CASE: WRITE PCIGALE.INI ---
        Commands::Configure { data_file, sed } => commands::configure::execute(data_file, sed)?,

        // --- USE CASE: FULL CIGALE RUN ---
        Commands::Fit {
            input,
            zcol,
            data_file,
            sed,
            wait,
            no_plot,
            outdir,
            compare,
            project_dir,
        } => commands::fit::execute(FitArgs {
            input,
            zcol,
            data_file,
            sed,
            wait,
            no_plot,
            outdir,
            compare,
            project_dir,
        })?,

        // --- USE CASE: FRB RECORDS ---
        Commands::BuildFrbs {
            frbs,
            base_table,
            out_path,
            override_failures,
            project_dir,
        } => commands::build_frbs::execute(BuildArgs {
            frbs,
            base_table,
            out_path,
            override_failures,
            project_dir,
        })?,
    }

    Ok(())
}
