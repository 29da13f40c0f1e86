use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use oralscan::{ModelArtifact, ModelManager, OnnxClassifier, RuntimeConfig, ScanPipeline};

#[derive(Parser)]
#[command(author, version, about = "Scan oral-cavity photos and print a JSON health report", long_about = None)]
struct Args {
    /// Image files to scan
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Path to an ONNX classifier model
    #[arg(short, long, conflicts_with = "model_url")]
    model: Option<PathBuf>,

    /// URL of a managed model artifact, downloaded into the cache when missing
    #[arg(long, requires = "sha256")]
    model_url: Option<String>,

    /// Expected SHA-256 of the managed model artifact
    #[arg(long)]
    sha256: Option<String>,

    /// Name of the managed model artifact
    #[arg(long, default_value = "oral-mobilenet")]
    model_name: String,

    /// Force a fresh download of the managed model
    #[arg(short, long)]
    fresh: bool,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,
}

async fn resolve_model(args: &Args) -> Result<PathBuf> {
    if let Some(path) = &args.model {
        return Ok(path.clone());
    }

    let manager = ModelManager::new_default()?;
    let artifact = match (&args.model_url, &args.sha256) {
        (Some(url), Some(sha)) => ModelArtifact::new(args.model_name.clone(), url.clone(), sha.clone()),
        _ => {
            let path = manager.get_model_path(&args.model_name);
            if !path.exists() {
                bail!(
                    "No model available: pass --model, or --model-url with --sha256, or place one at {}",
                    path.display()
                );
            }
            return Ok(path);
        }
    };

    if args.fresh {
        info!("Fresh download requested - removing any existing model file...");
        manager.remove_download(&artifact.name)?;
    }
    Ok(manager.ensure_model_downloaded(&artifact).await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let model_path = resolve_model(&args).await?;
    let start_time = Instant::now();
    info!("Loading classifier from {:?}", model_path);

    let classifier = OnnxClassifier::builder()
        .with_runtime_config(RuntimeConfig::from_env()?)
        .with_model_path(&model_path)?
        .build()?;
    let pipeline = ScanPipeline::builder().with_classifier(classifier).build()?;
    info!("Classifier loaded in {:.2?}", start_time.elapsed());

    let scan_start = Instant::now();
    let results = tokio::task::spawn_blocking({
        let pipeline = pipeline.clone();
        let images = args.images.clone();
        move || pipeline.analyze_batch(&images)
    })
    .await
    .context("scan worker panicked")?;

    let mut failures = 0;
    for (path, result) in args.images.iter().zip(results) {
        match result {
            Ok(outcome) => {
                let json = if args.pretty {
                    outcome.report.to_json_pretty()?
                } else {
                    outcome.report.to_json()?
                };
                println!("{}", json);
            }
            Err(e) => {
                failures += 1;
                eprintln!("{}: {}", path.display(), e);
            }
        }
    }
    info!("Scanned {} image(s) in {:.2?}", args.images.len(), scan_start.elapsed());

    if failures > 0 {
        bail!("{} of {} scan(s) failed", failures, args.images.len());
    }
    Ok(())
}
