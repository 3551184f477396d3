use dragstrip_powertrain::ShiftController;
use dragstrip_vehicle::{Drivetrain, ShiftPolicy};

fn three_speed(shift: ShiftPolicy) -> Drivetrain {
    Drivetrain {
        final_drive: 4.56,
        gear_ratios: vec![1.85, 1.3, 1.0],
        gear_efficiencies: Vec::new(),
        transmission_efficiency: 0.97,
        shift,
        rev_limiter_rpm: None,
    }
}

#[test]
fn request_engages_on_the_following_step() {
    let mut ctl = ShiftController::new(&three_speed(ShiftPolicy::Rpm(vec![9200.0, 9400.0])));
    assert!(ctl.update(0.5, 9100.0).is_none());
    assert!(ctl.update(0.6, 9250.0).is_none(), "request only");
    assert!(ctl.pending());
    assert_eq!(ctl.gear(), 0);

    let ev = ctl.update(0.65, 9300.0).expect("engages one step later");
    assert_eq!((ev.from, ev.to), (0, 1));
    assert_eq!(ev.rpm, 9250.0);
    assert_eq!(ctl.gear(), 1);
    assert_eq!(ctl.last_shift_s(), 0.65);
}

#[test]
fn engaged_step_holds_off_the_next_request() {
    let mut ctl = ShiftController::new(&three_speed(ShiftPolicy::Rpm(vec![9200.0, 9400.0])));
    ctl.update(0.6, 9250.0);
    ctl.update(0.65, 9300.0);
    assert!(ctl.update(0.9, 9500.0).is_none(), "hold after engagement");
    assert!(!ctl.pending());
    assert!(ctl.update(0.95, 9500.0).is_none());
    assert!(ctl.pending());
    assert_eq!(ctl.update(1.0, 9000.0).map(|e| e.to), Some(2));
    assert!(ctl.in_top_gear());
    ctl.update(1.1, 12000.0);
    assert!(ctl.update(1.2, 12000.0).is_none(), "top gear is terminal");
    assert!(!ctl.pending());
}

#[test]
fn single_speed_never_shifts() {
    let mut dt = three_speed(ShiftPolicy::Rpm(vec![100.0]));
    dt.gear_ratios = vec![1.0];
    let mut ctl = ShiftController::new(&dt);
    assert!(ctl.update(1.0, 8000.0).is_none());
    assert!(!ctl.pending());
}

#[test]
fn time_policy_requests_on_schedule() {
    let mut ctl = ShiftController::new(&three_speed(ShiftPolicy::Time(vec![1.1, 2.4])));
    assert!(ctl.update(1.0, 9999.0).is_none());
    assert!(ctl.update(1.1, 0.0).is_none());
    assert_eq!(ctl.update(1.15, 0.0).map(|e| e.to), Some(1));
    ctl.update(1.2, 0.0);
    assert!(ctl.update(2.39, 0.0).is_none());
    assert!(ctl.update(2.4, 0.0).is_none());
    assert_eq!(ctl.update(2.45, 0.0).map(|e| e.to), Some(2));
}
