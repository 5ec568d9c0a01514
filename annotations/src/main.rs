use anyhow::{Context, bail};
use pathcollab_annotations::LayerConfig;
use pathcollab_annotations::scenario::{self, Scenario};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr, the report to stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pathcollab_annotations=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: pathcollab-annotate <scenario.json>");
    };

    let config = LayerConfig::from_env();
    info!(
        "Loaded configuration: read_only={}, headless={}, touch_input={}",
        config.read_only, config.headless, config.touch_input
    );

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read scenario {}", path))?;
    let scenario: Scenario = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse scenario {}", path))?;
    info!(
        "Replaying {} steps over {} annotations",
        scenario.steps.len(),
        scenario.annotations.len()
    );

    let report = scenario::run(scenario, config).context("Scenario failed")?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
