#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use log::info;
use signal_inference::ReplayDetectSession;
use signal_starlight::config::{AppConfig, LoggingConfig};
use signal_starlight::driver::{BatchSummary, FrameDriver};
use signal_starlight::render::overlay_filters;
use std::fs;

fn init_logging(config: &LoggingConfig) -> Result<()> {
    let level = config.level_filter()?;
    tracing_subscriber::fmt().with_max_level(level).init();
    Ok(())
}

fn write_overlays(config: &AppConfig, summary: &BatchSummary) -> Result<()> {
    let result_path = &config.output.result_path;
    fs::create_dir_all(result_path)
        .with_context(|| format!("failed to create {}", result_path.display()))?;

    for report in &summary.reports {
        let path = result_path.join(format!("result_{}.txt", report.name));
        let filters = overlay_filters(&report.overlay).join(",\n");
        fs::write(&path, filters).with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./data/config.yaml".to_string());
    let config = AppConfig::load(&config_path)?;
    init_logging(&config.logging)?;
    info!("Loaded config from {}", config_path);

    let detector = ReplayDetectSession::open(&config.detector.detections_path)?;
    let mut driver = FrameDriver::new(&detector, &config)?;

    let summary = if config.parallel {
        driver.run_parallel(detector.frames())?
    } else {
        driver.run_sequential(detector.frames())?
    };

    for report in &summary.reports {
        println!(
            "Frame: {:<10}{}Times: {:.3}s",
            report.name,
            report.signal,
            report.elapsed.as_secs_f64()
        );
    }
    println!("\nAverage Times: {:.3}s\n", summary.average_time().as_secs_f64());

    if config.output.write_overlays {
        write_overlays(&config, &summary)?;
    }

    Ok(())
}
