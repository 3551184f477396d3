//! Engine output lookup from a dyno sheet or a flat HP rating.
//!
//! A sheet is interpolated in the column it was recorded in: HP sheets linearly in HP, torque
//! sheets linearly in torque. Outside the recorded RPM span the end rows' torque is held, except
//! by [`EngineModel::power_hp_extended`], which carries the end segments' HP slope on.

use dragstrip_core::constants::HP_TORQUE;
use dragstrip_core::exact;
use dragstrip_core::exact::lerp_f32;
use dragstrip_core::math::{inverse_lerp, lerp};
use dragstrip_vehicle::PowerSource;
use thiserror::Error;

/// Floor applied to RPM when deriving torque from a flat rating.
const FLAT_RATING_MIN_RPM: f64 = 1000.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("power curve has no samples")]
    MissingCurve,
    #[error("flat HP rating must be positive (got {0})")]
    ZeroRating(f64),
    #[error("HP sample at {0} rpm cannot be converted to torque")]
    NonPositiveRpm(f64),
    #[error("curve sample at {rpm} rpm has neither torque nor HP")]
    MissingValue { rpm: f64 },
    #[error("curve mixes HP and torque rows")]
    MixedColumns,
    #[error("a QuarterJr rating must be expanded into a curve before lookup")]
    UnexpandedRating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Hp,
    Torque,
}

#[derive(Debug, Clone)]
enum Source {
    /// `(rpm, value)` sorted by rpm, where value is in `column` units.
    Sheet { rows: Vec<(f64, f64)>, column: Column },
    Flat { hp: f64 },
}

/// Engine output as a function of RPM.
#[derive(Debug, Clone)]
pub struct EngineModel {
    source: Source,
    correction: f64,
}

impl EngineModel {
    /// Build a model from the vehicle power source. `hp_torque_mult` scales the sheet and
    /// `correction` is the atmospheric power multiplier applied at lookup.
    pub fn new(
        power: &PowerSource,
        hp_torque_mult: f64,
        correction: f64,
    ) -> Result<Self, EngineError> {
        let source = match power {
            PowerSource::Flat { hp } => {
                if !(*hp > 0.0) {
                    return Err(EngineError::ZeroRating(*hp));
                }
                Source::Flat {
                    hp: hp * hp_torque_mult,
                }
            }
            PowerSource::QuarterJr(_) => return Err(EngineError::UnexpandedRating),
            PowerSource::Curve(samples) => {
                let first = samples.first().ok_or(EngineError::MissingCurve)?;
                let column = if first.torque_lbft.is_some() {
                    Column::Torque
                } else {
                    Column::Hp
                };
                let mut rows = Vec::with_capacity(samples.len());
                for sample in samples {
                    let value = match (column, sample.torque_lbft, sample.hp) {
                        (Column::Torque, Some(tq), _) => tq,
                        (Column::Hp, None, Some(hp)) => {
                            if !(sample.rpm > 0.0) {
                                return Err(EngineError::NonPositiveRpm(sample.rpm));
                            }
                            hp
                        }
                        (_, None, None) => {
                            return Err(EngineError::MissingValue { rpm: sample.rpm });
                        }
                        _ => return Err(EngineError::MixedColumns),
                    };
                    rows.push((sample.rpm, value * hp_torque_mult));
                }
                rows.sort_by(|a, b| a.0.total_cmp(&b.0));
                Source::Sheet { rows, column }
            }
        };
        Ok(Self { source, correction })
    }

    pub fn correction(&self) -> f64 {
        self.correction
    }

    /// Corrected crank horsepower.
    pub fn power_hp(&self, rpm: f64) -> f64 {
        self.power_with(rpm, lookup)
    }

    /// Same lookup as [`power_hp`](Self::power_hp), interpolated in single precision.
    pub fn power_hp_legacy(&self, rpm: f64) -> f64 {
        self.power_with(rpm, exact::table_lookup_f32)
    }

    /// Corrected horsepower with the sheet's HP extended linearly along the first or last
    /// segment outside the recorded span. Inside the span this is [`power_hp`](Self::power_hp),
    /// or [`power_hp_legacy`](Self::power_hp_legacy) with `single_precision`. Flat ratings and
    /// one-row sheets have no segment to extend.
    pub fn power_hp_extended(&self, rpm: f64, single_precision: bool) -> f64 {
        let inside = |rpm| {
            if single_precision {
                self.power_hp_legacy(rpm)
            } else {
                self.power_hp(rpm)
            }
        };
        let Source::Sheet { rows, column } = &self.source else {
            return inside(rpm);
        };
        let n = rows.len();
        if n < 2 {
            return inside(rpm);
        }
        let (a, b) = if rpm < rows[0].0 {
            (rows[0], rows[1])
        } else if rpm > rows[n - 1].0 {
            (rows[n - 2], rows[n - 1])
        } else {
            return inside(rpm);
        };
        let hp = |(x, y): (f64, f64)| match column {
            Column::Hp => y,
            Column::Torque => y * x / HP_TORQUE,
        };
        let raw = if single_precision {
            lerp_f32(rpm, a.0, b.0, hp(a), hp(b))
        } else {
            lerp(hp(a), hp(b), inverse_lerp(a.0, b.0, rpm))
        };
        raw.max(0.0) * self.correction
    }

    /// Corrected torque (lb-ft).
    pub fn torque_at(&self, rpm: f64) -> f64 {
        match &self.source {
            Source::Flat { hp } => HP_TORQUE * hp / rpm.max(FLAT_RATING_MIN_RPM) * self.correction,
            Source::Sheet { rows, column } => {
                sheet_torque(rows, *column, rpm, lookup) * self.correction
            }
        }
    }

    /// Same lookup as [`torque_at`](Self::torque_at), interpolated in single precision.
    pub fn torque_at_legacy(&self, rpm: f64) -> f64 {
        let raw = match &self.source {
            Source::Flat { hp } => exact::div(
                exact::mul(HP_TORQUE, *hp),
                rpm.max(FLAT_RATING_MIN_RPM),
            ),
            Source::Sheet { rows, column } => {
                sheet_torque(rows, *column, rpm, exact::table_lookup_f32)
            }
        };
        exact::mul(raw, self.correction)
    }

    fn power_with(&self, rpm: f64, interpolate: fn(f64, &[(f64, f64)]) -> f64) -> f64 {
        let raw = match &self.source {
            Source::Flat { hp } => {
                if rpm < FLAT_RATING_MIN_RPM {
                    hp * rpm.max(0.0) / FLAT_RATING_MIN_RPM
                } else {
                    *hp
                }
            }
            Source::Sheet { rows, column } => {
                let (lo, hi) = match (rows.first(), rows.last()) {
                    (Some(lo), Some(hi)) => (lo.0, hi.0),
                    _ => return 0.0,
                };
                if rpm < lo {
                    end_torque(rows, *column, true) * rpm / HP_TORQUE
                } else if rpm > hi {
                    end_torque(rows, *column, false) * rpm / HP_TORQUE
                } else {
                    let value = interpolate(rpm, rows);
                    match column {
                        Column::Hp => value,
                        Column::Torque => value * rpm / HP_TORQUE,
                    }
                }
            }
        };
        raw * self.correction
    }

    /// `(rpm, hp)` at peak power. For a flat rating the RPM is zero.
    pub fn peak_power(&self) -> (f64, f64) {
        match &self.source {
            Source::Flat { hp } => (0.0, hp * self.correction),
            Source::Sheet { rows, .. } => rows
                .iter()
                .map(|&(rpm, _)| (rpm, self.power_hp(rpm)))
                .fold((0.0, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best }),
        }
    }

    /// `(rpm, lb-ft)` at peak torque.
    pub fn peak_torque(&self) -> (f64, f64) {
        match &self.source {
            Source::Flat { hp } => (
                FLAT_RATING_MIN_RPM,
                HP_TORQUE * hp / FLAT_RATING_MIN_RPM * self.correction,
            ),
            Source::Sheet { rows, .. } => rows
                .iter()
                .map(|&(rpm, _)| (rpm, self.torque_at(rpm)))
                .fold((0.0, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best }),
        }
    }

    /// RPM span of the sheet, if there is one.
    pub fn rpm_range(&self) -> Option<(f64, f64)> {
        match &self.source {
            Source::Flat { .. } => None,
            Source::Sheet { rows, .. } => Some((rows.first()?.0, rows.last()?.0)),
        }
    }
}

fn sheet_torque(
    rows: &[(f64, f64)],
    column: Column,
    rpm: f64,
    interpolate: fn(f64, &[(f64, f64)]) -> f64,
) -> f64 {
    let (lo, hi) = match (rows.first(), rows.last()) {
        (Some(lo), Some(hi)) => (lo.0, hi.0),
        _ => return 0.0,
    };
    if rpm <= lo {
        return end_torque(rows, column, true);
    }
    if rpm >= hi {
        return end_torque(rows, column, false);
    }
    let value = interpolate(rpm, rows);
    match column {
        Column::Torque => value,
        Column::Hp => value * HP_TORQUE / rpm,
    }
}

/// Uncorrected torque of the first (`low`) or last row.
fn end_torque(rows: &[(f64, f64)], column: Column, low: bool) -> f64 {
    let row = if low { rows.first() } else { rows.last() };
    match (row, column) {
        (Some(&(_, tq)), Column::Torque) => tq,
        (Some(&(rpm, hp)), Column::Hp) if rpm > 0.0 => hp * HP_TORQUE / rpm,
        _ => 0.0,
    }
}

fn lookup(rpm: f64, rows: &[(f64, f64)]) -> f64 {
    let (first, last) = match (rows.first(), rows.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return 0.0,
    };
    if rpm <= first.0 {
        return first.1;
    }
    if rpm >= last.0 {
        return last.1;
    }
    let idx = rows.partition_point(|&(x, _)| x <= rpm);
    let (x0, y0) = rows[idx - 1];
    let (x1, y1) = rows[idx];
    lerp(y0, y1, inverse_lerp(x0, x1, rpm))
}
