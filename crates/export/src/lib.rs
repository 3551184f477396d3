//! Export helpers for CSV and JSON artifacts.
//!
//! Reported times are rounded to three decimals and speeds to two, matching the legacy
//! timeslip printouts. Rounding happens here and nowhere in the kernel.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use dragstrip_core::exact::vb6_round;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

#[inline]
fn time3(t: f64) -> f64 {
    vb6_round(t, 3)
}

#[inline]
fn speed2(v: f64) -> f64 {
    vb6_round(v, 2)
}

pub mod timeslip {
    use std::io::{self, Write};

    use super::{speed2, time3};

    const HEADER: &str = "model,vehicle,length,d_ft,t_s,v_mph";

    /// Write the timeslip CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// One checkpoint row.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub model: &'a str,
        pub vehicle: &'a str,
        pub length: &'a str,
        pub d_ft: f64,
        pub t_s: f64,
        pub v_mph: f64,
    }

    impl<'a> Record<'a> {
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            writeln!(
                writer,
                "{},{},{},{:.0},{:.3},{:.2}",
                self.model,
                self.vehicle,
                self.length,
                self.d_ft,
                time3(self.t_s),
                speed2(self.v_mph),
            )
        }
    }
}

pub mod trace {
    use std::io::{self, Write};

    const HEADER: &str = "t_s,s_ft,v_mph,a_g,rpm,gear";

    /// Column names, shared with readers of the trace CSV.
    pub const COLUMNS: [&str; 6] = ["t_s", "s_ft", "v_mph", "a_g", "rpm", "gear"];

    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// One trace sample. Gear is 1-based in the file.
    #[derive(Debug, Clone, Copy)]
    pub struct Record {
        pub t_s: f64,
        pub s_ft: f64,
        pub v_mph: f64,
        pub a_g: f64,
        pub rpm: f64,
        pub gear: usize,
    }

    impl Record {
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            writeln!(
                writer,
                "{:.3},{:.3},{:.3},{:.4},{:.0},{}",
                self.t_s, self.s_ft, self.v_mph, self.a_g, self.rpm, self.gear,
            )
        }
    }
}

pub mod benchmark {
    use std::io::{self, Write};

    use super::{speed2, time3};

    const HEADER: &str = "name,length,model,et_s,target_et_s,mph,target_mph,et_pass,mph_pass";

    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// Benchmark comparison row.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub name: &'a str,
        pub length: &'a str,
        pub model: &'a str,
        pub et_s: f64,
        pub target_et_s: f64,
        pub mph: f64,
        pub target_mph: f64,
        pub et_pass: bool,
        pub mph_pass: bool,
    }

    impl<'a> Record<'a> {
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            writeln!(
                writer,
                "{},{},{},{:.3},{:.3},{:.2},{:.2},{},{}",
                self.name,
                self.length,
                self.model,
                time3(self.et_s),
                self.target_et_s,
                speed2(self.mph),
                self.target_mph,
                self.et_pass,
                self.mph_pass,
            )
        }
    }
}

pub mod json {
    use std::io::{self, Write};
    use std::path::Path;

    use serde::Serialize;
    use serde_json::to_writer_pretty;

    /// Write `value` as pretty JSON to `path` (`-` for stdout).
    pub fn write_json<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
        let mut writer = super::writer_for_path(path)?;
        to_writer_pretty(&mut writer, value)?;
        writeln!(writer)?;
        writer.flush()
    }
}
