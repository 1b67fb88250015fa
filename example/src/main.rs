mod codemod;

use std::path::Path;

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use walkdir::WalkDir;

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let root = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "templates/".to_string());

    let mut failures = 0;
    for entry in WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "hbs") {
            continue;
        }
        match convert_file(path) {
            Ok(code) => {
                println!("--- {}", path.display());
                print!("{code}");
            }
            Err(err) => {
                error!(path = %path.display(), %err, "cannot convert template");
                failures += 1;
            }
        }
    }
    if failures > 0 {
        std::process::exit(1);
    }
}

fn convert_file(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let out = hbs_recast::transform(&source, |_| codemod::angle_brackets())?;
    info!(path = %path.display(), changed = out.code != source, "converted template");
    Ok(out.code)
}
