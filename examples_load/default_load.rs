use std::sync::Arc;
use std::time::Instant;
use tracing::error;

use tracing_ecs_logs::init::{init_tracing_with_config, LayerConfig};
use tracing_ecs_logs::noop_sink::NoopSink;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(NoopSink);
    init_tracing_with_config(sink, LayerConfig::default().with_source())?;

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        error!(iteration = i, "default load test error");
    }

    let elapsed = start.elapsed();
    println!("default config: built {} events in {:?} (~{:.0} ev/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}
