use epigrid::manager::Manager;
use std::path::PathBuf;

#[test]
fn default_sweep_is_reproducible() {
    let mgr = Manager::new(None::<PathBuf>).expect("failed to construct mgr");

    let first = mgr.run_sweep().expect("failed to run sweep");
    let second = mgr.run_sweep().expect("failed to run sweep");

    assert_eq!(first.n_vals, 40);
    assert_eq!(first.mean, second.mean);
    assert_eq!(first.conf_int, second.conf_int);
    assert!(first.mean >= 0.0 && first.mean <= 100.0);
    assert!(first.conf_int.0 <= first.mean && first.mean <= first.conf_int.1);
}

#[test]
fn lone_trial_from_default_config() {
    let mgr = Manager::new(None::<PathBuf>).expect("failed to construct mgr");

    let census = mgr.run_trial(1, 0).expect("failed to run trial");
    assert_eq!(census.incubating, 1);
    assert_eq!(census.healthy, 99);
    assert_eq!(census.n_infected(), 0);
}
