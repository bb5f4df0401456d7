use chrono::{DateTime, TimeZone, Utc};
use todoflow::kernel::HasHistory;
use todoflow::models::{Todo, TodoId};
use todoflow::time;

fn fixed() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
}

fn later() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
}

// One test per binary: the clock can only be installed once per process.
#[test]
fn test_first_installed_clock_wins() {
    assert!(time::init(fixed));
    assert!(!time::init(later));

    assert_eq!(time::now(), fixed());

    let todo = Todo::new(TodoId::generate(), "Stamped by the fixed clock");
    assert_eq!(todo.created(), Some(fixed()));
    assert_eq!(todo.modified(), None);
}
