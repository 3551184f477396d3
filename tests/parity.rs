//! Reference timeslips from the legacy calculator.

use dragstrip::simulate;
use dragstrip_config::{BenchmarkConfig, load_benchmarks};
use dragstrip_vehicle::RaceLength;

fn fixtures() -> Vec<BenchmarkConfig> {
    load_benchmarks(concat!(env!("CARGO_MANIFEST_DIR"), "/data/benchmarks")).expect("fixtures")
}

fn named(name: &str) -> BenchmarkConfig {
    fixtures()
        .into_iter()
        .find(|b| b.name == name)
        .expect("fixture present")
}

fn assert_close(bench: &BenchmarkConfig, length: RaceLength, tol_et: f64, tol_mph: f64) {
    let vehicle = bench.vehicle().expect("vehicle");
    let env = bench.environment().expect("env");
    let target = bench.targets.get(length).expect("target");
    let result = simulate(&vehicle, &env, length).expect("run");
    assert!(
        (result.et_s - target.et_s).abs() <= tol_et,
        "{} {}: ET {:.3} vs {:.3}",
        bench.name,
        length,
        result.et_s,
        target.et_s
    );
    assert!(
        (result.mph - target.mph).abs() <= tol_mph,
        "{} {}: MPH {:.2} vs {:.2}",
        bench.name,
        length,
        result.mph,
        target.mph
    );
}

#[test]
fn supergas_quarter_matches_printout() {
    assert_close(&named("SuperGas_Pro"), RaceLength::Quarter, 0.05, 1.0);
}

#[test]
fn prostock_eighth_matches_printout() {
    assert_close(&named("ProStock_Pro"), RaceLength::Eighth, 0.05, 1.0);
}

#[test]
fn every_fixture_within_its_tolerance() {
    let mut misses = Vec::new();
    for bench in fixtures() {
        let vehicle = bench.vehicle().expect("vehicle");
        let env = bench.environment().expect("env");
        for length in [RaceLength::Eighth, RaceLength::Quarter] {
            let Some(target) = bench.targets.get(length) else {
                continue;
            };
            let result = simulate(&vehicle, &env, length).expect("run");
            if !(target.et_within(result.et_s) && target.mph_within(result.mph)) {
                misses.push(format!(
                    "{} {}: {:.3}s/{:.2}mph vs {:.3}s/{:.2}mph",
                    bench.name,
                    length.as_str(),
                    result.et_s,
                    result.mph,
                    target.et_s,
                    target.mph
                ));
            }
        }
    }
    assert!(misses.is_empty(), "outside tolerance:\n{}", misses.join("\n"));
}

#[test]
fn supergas_sixty_foot_matches_printout() {
    let bench = named("SuperGas_Pro");
    let vehicle = bench.vehicle().expect("vehicle");
    let env = bench.environment().expect("env");
    let t60 = bench
        .targets
        .eighth
        .and_then(|t| t.t60_s)
        .expect("60 ft target");
    let result = simulate(&vehicle, &env, RaceLength::Eighth).expect("run");
    let split = result.split(60.0).expect("60 ft split");
    assert!((split.t_s - t60).abs() <= 0.05, "60 ft {:.3} vs {t60:.2}", split.t_s);
}

#[test]
fn every_fixture_finishes() {
    for bench in fixtures() {
        let vehicle = bench.vehicle().expect("vehicle");
        let env = bench.environment().expect("env");
        let result = simulate(&vehicle, &env, RaceLength::Eighth).expect("run");
        assert!(result.finished(), "{} did not reach 660 ft", bench.name);
        assert!(result.et_s.is_finite() && result.mph.is_finite());
    }
}
