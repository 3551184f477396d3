use dragstrip::kernel::result::{SimMeta, SimResult, TimeslipEntry, TraceSample};
use dragstrip::report::{Comparison, write_timeslip_rows, write_trace};
use dragstrip::ModelId;
use dragstrip_config::RaceTarget;
use dragstrip_vehicle::RaceLength;

fn sample_result() -> SimResult {
    SimResult {
        et_s: 9.9046,
        mph: 135.155,
        timeslip: vec![
            TimeslipEntry {
                d_ft: 60.0,
                t_s: 1.34649,
                v_mph: 41.23501,
            },
            TimeslipEntry {
                d_ft: 1320.0,
                t_s: 9.9046,
                v_mph: 136.0,
            },
        ],
        traces: Some(vec![TraceSample {
            t_s: 0.01,
            v_mph: 0.2,
            a_g: 1.8,
            s_ft: 0.001,
            rpm: 5200.0,
            gear: 1,
        }]),
        meta: SimMeta::bare(ModelId::RsaClassic, 4952),
    }
}

#[test]
fn timeslip_rows_carry_model_and_length() {
    let mut out = Vec::new();
    write_timeslip_rows(&mut out, "SuperGas_Pro", RaceLength::Quarter, &sample_result())
        .expect("write");
    let text = String::from_utf8(out).expect("utf-8");
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], "RSACLASSIC,SuperGas_Pro,QUARTER,60,1.346,41.24");
    assert!(rows[1].starts_with("RSACLASSIC,SuperGas_Pro,QUARTER,1320,9.905,"));
}

#[test]
fn trace_csv_has_header_and_one_based_gear() {
    let mut out = Vec::new();
    write_trace(&mut out, &sample_result()).expect("write");
    let text = String::from_utf8(out).expect("utf-8");
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("t_s,s_ft,v_mph,a_g,rpm,gear"));
    let row = lines.next().expect("row");
    assert!(row.ends_with(",5200,1"), "{row}");
}

#[test]
fn comparison_applies_target_tolerances() {
    let target = RaceTarget {
        et_s: 9.90,
        mph: 135.1,
        tol_et_s: 0.05,
        tol_mph: 1.0,
        t60_s: None,
    };
    let cmp = Comparison::new(&sample_result(), &target);
    assert!(cmp.et_pass && cmp.mph_pass && cmp.passed());

    let tight = RaceTarget {
        mph: 130.0,
        ..target
    };
    let miss = Comparison::new(&sample_result(), &tight);
    assert!(miss.et_pass);
    assert!(!miss.passed());

    let mut out = Vec::new();
    miss.write_row(&mut out, "SuperGas_Pro", RaceLength::Quarter, "RSACLASSIC")
        .expect("row");
    let text = String::from_utf8(out).expect("utf-8");
    assert!(text.trim_end().ends_with(",true,false"), "{text}");
}
