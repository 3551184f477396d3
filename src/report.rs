//! Conversion of run results into export rows and console summaries.

use std::io::{self, Write};

use dragstrip_config::RaceTarget;
use dragstrip_export::{benchmark, timeslip, trace};
use dragstrip_vehicle::RaceLength;

use crate::kernel::SimResult;

/// Write every timeslip checkpoint of `result` as CSV rows (no header).
pub fn write_timeslip_rows(
    writer: &mut dyn Write,
    vehicle: &str,
    length: RaceLength,
    result: &SimResult,
) -> io::Result<()> {
    let model = result.meta.model.as_str();
    for entry in &result.timeslip {
        timeslip::Record {
            model,
            vehicle,
            length: length.as_str(),
            d_ft: entry.d_ft,
            t_s: entry.t_s,
            v_mph: entry.v_mph,
        }
        .write_to(writer)?;
    }
    Ok(())
}

/// Write the trace CSV, header included. Does nothing useful when traces were not recorded.
pub fn write_trace(writer: &mut dyn Write, result: &SimResult) -> io::Result<()> {
    trace::write_header(writer)?;
    for sample in result.traces.iter().flatten() {
        trace::Record {
            t_s: sample.t_s,
            s_ft: sample.s_ft,
            v_mph: sample.v_mph,
            a_g: sample.a_g,
            rpm: sample.rpm,
            gear: sample.gear,
        }
        .write_to(writer)?;
    }
    Ok(())
}

/// Outcome of checking one run against a reference printout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub et_s: f64,
    pub mph: f64,
    pub target: RaceTarget,
    pub et_pass: bool,
    pub mph_pass: bool,
}

impl Comparison {
    pub fn new(result: &SimResult, target: &RaceTarget) -> Self {
        Self {
            et_s: result.et_s,
            mph: result.mph,
            target: *target,
            et_pass: target.et_within(result.et_s),
            mph_pass: target.mph_within(result.mph),
        }
    }

    pub fn passed(&self) -> bool {
        self.et_pass && self.mph_pass
    }

    pub fn write_row(
        &self,
        writer: &mut dyn Write,
        name: &str,
        length: RaceLength,
        model: &str,
    ) -> io::Result<()> {
        benchmark::Record {
            name,
            length: length.as_str(),
            model,
            et_s: self.et_s,
            target_et_s: self.target.et_s,
            mph: self.mph,
            target_mph: self.target.mph,
            et_pass: self.et_pass,
            mph_pass: self.mph_pass,
        }
        .write_to(writer)
    }
}

/// Human-readable timeslip for the console.
pub fn print_timeslip(result: &SimResult) {
    for entry in &result.timeslip {
        println!(
            "{:>6.0} ft  {:>7.3} s  {:>7.2} mph",
            entry.d_ft, entry.t_s, entry.v_mph
        );
    }
    println!("ET  {:.3} s", result.et_s);
    println!("MPH {:.2}", result.mph);
    if !result.meta.warnings.is_empty() {
        println!("warnings: {}", result.meta.warnings.join(", "));
    }
}
