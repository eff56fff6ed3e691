use clap::Parser as _;
use procure::BaseArgs;
use procure_core::models::{Allocation, SearchStatus};
use rust_decimal_macros::dec;
use std::{fs::File, io::BufReader, path::Path};

fn sample() -> String {
    format!(
        "{}/../procure-solver/tests/samples/workstation.json",
        env!("CARGO_MANIFEST_DIR")
    )
}

fn read_allocation(path: &Path) -> anyhow::Result<Allocation> {
    Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
}

#[tokio::test]
async fn optimize_writes_the_allocation() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("allocation.json");

    BaseArgs::try_parse_from([
        "procure",
        "optimize",
        &sample(),
        "--output",
        output.to_str().unwrap(),
        "--deadline",
        "10s",
    ])?
    .evaluate()
    .await?;

    let allocation = read_allocation(&output)?;
    assert_eq!(allocation.status, SearchStatus::Optimal);
    assert_eq!(allocation.total, dec!(722.77));
    Ok(())
}

#[tokio::test]
async fn plan_reports_missing_builds() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = dir.path().join("procure.toml");
    std::fs::write(
        &config,
        format!(
            "[database]\ndatabase_path = {:?}\n",
            dir.path().join("catalog.db").display().to_string()
        ),
    )?;

    let result = BaseArgs::try_parse_from([
        "procure",
        "--config",
        config.to_str().unwrap(),
        "plan",
        "garage",
    ])?
    .evaluate()
    .await;

    let error = result.expect_err("an empty catalog has no builds");
    assert!(error.to_string().contains("garage"), "{error}");
    Ok(())
}
