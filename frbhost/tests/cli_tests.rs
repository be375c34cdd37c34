use anyhow::Result;
use assert_cmd::prelude::*;
use frbhost_core::domain::photometry::{Column, PhotometryTable};
use frbhost_core::infrastructure::codec::write_fits_table;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Scratch directory the binary runs in.
struct HostTestEnv {
    tmp: TempDir,
}

impl HostTestEnv {
    fn new() -> Result<Self> {
        Ok(Self {
            tmp: tempfile::tempdir()?,
        })
    }

    fn root(&self) -> &Path {
        self.tmp.path()
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    fn write(&self, name: &str, content: &str) -> Result<()> {
        fs::write(self.path(name), content)?;
        Ok(())
    }

    fn frbhost(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("frbhost"));
        cmd.current_dir(self.root());
        cmd
    }
}

const HOSTS_CSV: &str = "\
ID,ra,dec,z,DES_g,DES_g_err,DES_Y,DES_Y_err,W1,W1_err
1,326.1052,-40.9000,0.3214,20.0,0.05,19.1,0.08,16.2,0.1
2,326.2000,-40.8000,0.1500,21.3,0.07,20.4,0.09,17.0,0.2
";

const BASE_TABLE_CSV: &str = "\
FRB,ra,dec,DM,z,repeater
FRB20180924B,326.1052,-40.9000,362.4,0.3214,false
FRB20121102A,82.9946,33.1479,557.0,0.19273,true
";

#[test]
fn test_translate_writes_cigale_input() -> Result<()> {
    let env = HostTestEnv::new()?;
    env.write("hosts.csv", HOSTS_CSV)?;

    env.frbhost()
        .args(["translate", "hosts.csv", "--zcol", "z"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "DES_g, DES_g_err, DES_y, DES_y_err, WISE1, WISE1_err",
        ))
        .stdout(predicate::str::contains("2 objects written"));

    assert!(env.path("cigale_in.fits").exists());
    Ok(())
}

#[test]
fn test_translate_text_output_refuses_overwrite() -> Result<()> {
    let env = HostTestEnv::new()?;
    env.write("hosts.csv", HOSTS_CSV)?;
    env.write("cigale_in.dat", "already here\n")?;

    env.frbhost()
        .args([
            "translate",
            "hosts.csv",
            "--zcol",
            "z",
            "--data-file",
            "cigale_in.dat",
            "--no-overwrite",
        ])
        .assert()
        .failure();

    assert_eq!(fs::read_to_string(env.path("cigale_in.dat"))?, "already here\n");
    Ok(())
}

#[test]
fn test_translate_missing_zcol_fails() -> Result<()> {
    let env = HostTestEnv::new()?;
    env.write("hosts.csv", HOSTS_CSV)?;

    env.frbhost()
        .args(["translate", "hosts.csv", "--zcol", "photo_z"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("photo_z"));

    assert!(!env.path("cigale_in.fits").exists());
    Ok(())
}

#[test]
fn test_configure_uses_data_file_bands() -> Result<()> {
    let env = HostTestEnv::new()?;
    env.write("hosts.csv", HOSTS_CSV)?;

    env.frbhost()
        .args(["translate", "hosts.csv", "--zcol", "z"])
        .assert()
        .success();
    env.frbhost()
        .args(["configure", "--cores", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration written to pcigale.ini"));

    let ini = fs::read_to_string(env.path("pcigale.ini"))?;
    assert!(ini.contains("data_file = cigale_in.fits"));
    assert!(ini.contains("cores = 2"));
    assert!(ini.contains(
        "sed_modules = sfhdelayed, bc03, nebular, dustatt_calzleit, dale2014, restframe_parameters, redshifting"
    ));
    assert!(ini.contains("bands = DES_g, DES_g_err, DES_y, DES_y_err, WISE1, WISE1_err"));
    assert!(env.path("pcigale.ini.spec").exists());
    Ok(())
}

#[test]
fn test_configure_custom_modules_need_params() -> Result<()> {
    let env = HostTestEnv::new()?;

    env.frbhost()
        .args(["configure", "--sed-modules", "sfhdelayed,bc03"])
        .assert()
        .failure();
    assert!(!env.path("pcigale.ini").exists());

    env.write(
        "params.yaml",
        "sfhdelayed:\n  tau_main: [10.0, 100.0]\nbc03:\n  imf: 0\n",
    )?;
    env.frbhost()
        .args([
            "configure",
            "--sed-modules",
            "sfhdelayed,bc03",
            "--params",
            "params.yaml",
        ])
        .assert()
        .success();

    let ini = fs::read_to_string(env.path("pcigale.ini"))?;
    assert!(ini.contains("sed_modules = sfhdelayed, bc03"));
    assert!(ini.contains("tau_main = 10.0, 100.0"));
    Ok(())
}

#[test]
fn test_build_frbs_with_project_config() -> Result<()> {
    let env = HostTestEnv::new()?;
    env.write("frbs.csv", BASE_TABLE_CSV)?;
    env.write(
        "frbhost.yaml",
        "ne2001: echo 123.4\nbase-table: frbs.csv\nrecords-dir: records\n",
    )?;

    env.frbhost()
        .args(["build-frbs", "--frbs", "FRB20180924B,FRB20990101A"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FRB20180924B"))
        .stdout(predicate::str::contains("1 record(s) written"))
        .stderr(predicate::str::contains("FRB20990101A not in the base table"));

    let json = fs::read_to_string(env.path("records/FRB20180924B.json"))?;
    let record: serde_json::Value = serde_json::from_str(&json)?;
    assert_eq!(record["DMISM"]["value"], 123.4);
    assert_eq!(record["repeater"], false);
    assert!(!env.path("records/FRB20121102A.json").exists());
    Ok(())
}

#[test]
fn test_build_frbs_needs_a_base_table() -> Result<()> {
    let env = HostTestEnv::new()?;

    env.frbhost()
        .args(["build-frbs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No base table"));
    Ok(())
}

// --- FIT (stub CIGALE) ---

const HOST_CSV: &str = "\
ID,z,DES_g,DES_g_err
7,0.3214,21.0,0.1
";

/// Stands in for `pcigale -c <ini> run`: checks that the data file named in
/// the ini exists from the config directory, then drops a canned results.fits.
const FAKE_PCIGALE: &str = r#"#!/bin/sh
set -e
data=$(sed -n 's/^data_file = //p' "$2")
test -f "$data"
mkdir -p out
cp "$MODEL" out/results.fits
"#;

fn fit_env() -> Result<HostTestEnv> {
    let env = HostTestEnv::new()?;
    env.write("host.csv", HOST_CSV)?;

    let model = PhotometryTable::from_columns(vec![Column::floats(
        "best.DES_g",
        vec![Some(0.0135)],
    )])?;
    write_fits_table(&env.path("model.fits"), &model, true)?;

    let script = FAKE_PCIGALE.replace("$MODEL", &env.path("model.fits").display().to_string());
    env.write("fake_pcigale.sh", &script)?;
    env.write(
        "frbhost.yaml",
        &format!(
            "pcigale: sh {}\npcigale-plots: \"true\"\npivot-wavelengths:\n  DES_g: 481.0\n",
            env.path("fake_pcigale.sh").display()
        ),
    )?;
    Ok(env)
}

fn step_status(summary: &serde_json::Value, step: &str) -> Option<String> {
    summary["steps"]
        .as_array()?
        .iter()
        .find(|s| s["step"] == step)
        .and_then(|s| s["status"].as_str())
        .map(str::to_string)
}

#[test]
fn test_fit_pauses_relocates_and_compares() -> Result<()> {
    let env = fit_env()?;

    assert_cmd::Command::from_std(env.frbhost())
        .args([
            "fit",
            "host.csv",
            "--zcol",
            "z",
            "--data-file",
            "runs/cigale_in.fits",
            "--config-file",
            "runs/pcigale.ini",
            "--wait",
            "--compare",
            "--outdir",
            "results/host",
        ])
        .write_stdin("\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("press Enter"))
        .stdout(predicate::str::contains("lambda_filter"))
        .stdout(predicate::str::contains("SUCCESS"));

    let ini = fs::read_to_string(env.path("runs/pcigale.ini"))?;
    assert!(ini.contains("data_file = cigale_in.fits"));

    let host = env.path("results/host");
    assert!(host.join("results.fits").exists());
    assert!(host.join("photo_observed_model.dat").exists());
    assert!(!env.path("runs/out").exists());

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(env.path("runs/run_summary.json"))?)?;
    assert_eq!(step_status(&summary, "pause").as_deref(), Some("done"));
    assert_eq!(step_status(&summary, "fit").as_deref(), Some("done"));
    assert_eq!(step_status(&summary, "plot").as_deref(), Some("done"));
    assert_eq!(step_status(&summary, "relocate").as_deref(), Some("done"));
    assert_eq!(step_status(&summary, "compare").as_deref(), Some("done"));
    assert!(summary["output_dir"].as_str().unwrap().ends_with("results/host"));
    Ok(())
}

#[test]
fn test_fit_overlapping_outdir_keeps_results() -> Result<()> {
    let env = fit_env()?;

    env.frbhost()
        .args([
            "fit",
            "host.csv",
            "--zcol",
            "z",
            "--no-plot",
            "--outdir",
            ".",
        ])
        .assert()
        .success();

    assert!(env.path("out/results.fits").exists());
    assert!(env.path("cigale_in.fits").exists());

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(env.path("run_summary.json"))?)?;
    assert_eq!(step_status(&summary, "relocate").as_deref(), Some("warning"));
    assert_eq!(step_status(&summary, "plot").as_deref(), Some("skipped"));
    assert_eq!(summary["output_dir"], "./out");
    Ok(())
}

#[test]
fn test_fit_failure_exits_non_zero() -> Result<()> {
    let env = fit_env()?;
    env.write("frbhost.yaml", "pcigale: \"false\"\n")?;

    env.frbhost()
        .args(["fit", "host.csv", "--zcol", "z", "--no-plot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CIGALE RUN FAILED"));

    assert!(!env.path("run_summary.json").exists());
    Ok(())
}
