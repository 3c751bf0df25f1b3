use std::time::Instant;

use fieldroad::{
    app::logging::init_file_logging,
    carver::{CarveConfig, CarveError, PathGenerator, get_rng, painter::NullPainter},
};

/// Carve many levels headless with consecutive seeds and report how long it took.
/// Usage: profile [iterations] [width] [height]
fn main() -> std::io::Result<()> {
    let _log_guard = init_file_logging(tracing::Level::INFO);

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(1000);
    let width = args.next().and_then(|s| s.parse::<u16>().ok()).unwrap_or(25);
    let height = args.next().and_then(|s| s.parse::<u16>().ok()).unwrap_or(20);

    let mut rng = get_rng(None);
    let (mut carved, mut exhausted, mut forced, mut total_steps) = (0u64, 0u64, 0u64, 0u64);
    let started_at = Instant::now();
    for seed in 0..num_iters {
        let mut generator = PathGenerator::new(CarveConfig::new(seed, width, height));
        match generator.generate(&mut rng, &mut NullPainter) {
            Ok(_) => carved += 1,
            Err(CarveError::SearchExhausted { .. }) => exhausted += 1,
            Err(e) => {
                eprintln!("{}", e);
                return Ok(());
            }
        }
        if generator.forced_descent() {
            forced += 1;
        }
        total_steps += generator.steps_taken();
    }
    let elapsed = started_at.elapsed();

    let summary = format!(
        "{} levels of {}x{} in {:.3}s: {} carved, {} exhausted, {} forced descents, {:.1} steps on average",
        num_iters,
        width,
        height,
        elapsed.as_secs_f64(),
        carved,
        exhausted,
        forced,
        total_steps as f64 / num_iters.max(1) as f64
    );
    tracing::info!("{}", summary);
    println!("{}", summary);
    Ok(())
}
