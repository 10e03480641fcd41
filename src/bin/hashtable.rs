use std::io;

use collections::ProbingTable;
use log::info;
use probing::{config::TableConfig, driver};

fn main() -> Result<(), probing::Error> {
    env_logger::builder().init();

    let cfg = TableConfig::from_args(std::env::args().skip(1))?;
    info!(target: "hashtable", "starting with {} slots", cfg.capacity);

    let mut table = ProbingTable::with_capacity(cfg.capacity);
    driver::run_table(
        &mut table,
        io::stdin().lock(),
        &mut io::stdout().lock(),
        &mut io::stderr(),
    )?;

    info!(target: "hashtable", "finished with {} records in {} slots", table.len(), table.capacity());
    Ok(())
}
