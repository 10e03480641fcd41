use std::path::Path;

use log::info;
use probing::{config::SortConfig, extsort::ExternalSorter};

fn main() -> Result<(), probing::Error> {
    env_logger::builder().init();

    let cfg = SortConfig::from_args(std::env::args().skip(1))?;
    let work_dir = match cfg.output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let stats = ExternalSorter::new(work_dir)
        .with_ways(cfg.ways)
        .with_run_size(cfg.run_size)
        .sort_file(&cfg.input, &cfg.output)?;

    info!(
        target: "extsort",
        "sorted {} values from {} runs in {} passes into {}",
        stats.values,
        stats.runs,
        stats.passes,
        cfg.output.display()
    );
    Ok(())
}
