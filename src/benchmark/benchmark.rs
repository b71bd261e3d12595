use std::time::Instant;

use crate::simulation::derivation::{compute_eccentricity, normalized_pressure, normalized_speed, sample_pressure_field};
use crate::simulation::particles::{advance_particles, seed_particles, FlowStep};

/// Time one frame of particle motion for growing cloud sizes
pub fn bench_particles() {
    // Cloud sizes, the default scene uses 5000
    let ns = [1000, 5000, 20000, 80000];
    let frames = 120; // two seconds at 60 Hz

    let step = FlowStep::new(normalized_pressure(0.45), normalized_speed(15000));

    for n in ns {
        let mut positions = seed_particles(n, 42);

        // Warm up
        advance_particles(&mut positions, &step);

        let t0 = Instant::now();
        for _ in 0..frames {
            advance_particles(&mut positions, &step);
        }
        let per_frame_ms = t0.elapsed().as_secs_f64() * 1000.0 / frames as f64;

        println!("N = {n:6}, particle frame = {per_frame_ms:8.4} ms");
    }
}

/// Time a full walk of the pressure ring at several angular steps
/// Paste output directly into a spreadsheet to graph
pub fn bench_pressure_field() {
    println!("step_deg,samples,us_per_walk");

    let e = compute_eccentricity(600.0);
    let walks = 1000;

    for step in [4.0, 2.0, 1.0, 0.5, 0.1] {
        let field = sample_pressure_field(0.8, e, step);

        let t0 = Instant::now();
        let mut acc = 0.0;
        for _ in 0..walks {
            acc += field.iter().map(|s| s.pressure).sum::<f64>();
        }
        let us = t0.elapsed().as_secs_f64() * 1.0e6 / walks as f64;

        // keep the sum alive so the loop is not optimized away
        std::hint::black_box(acc);
        println!("{},{},{:.3}", field.step_deg(), field.len(), us);
    }
}
