use std::io;

use collections::CircularQueue;
use log::info;
use probing::{config::QueueConfig, driver};

fn main() -> Result<(), probing::Error> {
    env_logger::builder().init();

    let cfg = QueueConfig::from_args(std::env::args().skip(1))?;
    info!(target: "queue", "starting with capacity {}", cfg.capacity);

    let mut queue = CircularQueue::with_capacity(cfg.capacity);
    driver::run_queue(
        &mut queue,
        io::stdin().lock(),
        &mut io::stdout().lock(),
        &mut io::stderr(),
    )?;
    Ok(())
}
