use std::{env, fs, path::PathBuf, process::Command};

fn write_config(test_name: &str, config_contents: &str) -> PathBuf {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(test_name);

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");

    let config_path = test_dir.join("config.toml");
    fs::write(&config_path, config_contents).expect("failed to write config file");
    config_path
}

fn run_bin(args: &[&str]) -> (bool, String) {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_epigrid"));

    let output = Command::new(bin)
        .args(args)
        .output()
        .expect("failed to execute command");

    let stdout_str =
        String::from_utf8(output.stdout).expect("failed to convert stdout to string");
    (output.status.success(), stdout_str)
}

fn run_bin_ok(args: &[&str]) -> String {
    let (success, stdout_str) = run_bin(args);
    assert!(success, "failed to run binary with {args:?}\nstdout:\n{stdout_str}\n");
    stdout_str
}

const SMALL_CONFIG: &str = "[model]\n\
    grid_size = 20\n\
    n_agents = 60\n\
    \n\
    [sweep]\n\
    initial_infected = [1, 3, 5]\n\
    days = [10, 40]\n\
    \n\
    [rng]\n\
    seed = 20240101\n";

#[test]
fn sweep_workflow() {
    let config_path = write_config("sweep_workflow", SMALL_CONFIG);
    let config_str = config_path.to_str().expect("failed to convert path to string");

    let first = run_bin_ok(&["--config", config_str, "sweep"]);
    let lines: Vec<_> = first.lines().collect();
    assert_eq!(lines.len(), 2, "unexpected output:\n{first}");
    assert!(lines[0].starts_with("Mean: "));
    assert!(lines[1].starts_with("95% Confidence interval: ["));
    assert!(lines[1].ends_with(']'));

    let second = run_bin_ok(&["--config", config_str, "sweep"]);
    assert_eq!(first, second);
}

#[test]
fn single_trial() {
    let config_path = write_config("single_trial", SMALL_CONFIG);
    let config_str = config_path.to_str().expect("failed to convert path to string");

    let stdout_str = run_bin_ok(&[
        "--config",
        config_str,
        "trial",
        "--n-infected",
        "0",
        "--n-days",
        "30",
    ]);
    assert!(stdout_str.contains("Healthy: 60"));
    assert!(stdout_str.contains("Infected: 0"));
}

#[test]
fn invalid_config_fails() {
    let config_path = write_config(
        "invalid_config_fails",
        "[model]\ngrid_size = 3\nn_agents = 10\n\n[sweep]\ninitial_infected = [1]\ndays = [1]\n",
    );
    let config_str = config_path.to_str().expect("failed to convert path to string");

    let (success, _) = run_bin(&["--config", config_str, "sweep"]);
    assert!(!success);
}

#[test]
fn too_many_infected_fails() {
    let config_path = write_config("too_many_infected_fails", SMALL_CONFIG);
    let config_str = config_path.to_str().expect("failed to convert path to string");

    let (success, _) = run_bin(&[
        "--config",
        config_str,
        "trial",
        "--n-infected",
        "61",
        "--n-days",
        "1",
    ]);
    assert!(!success);
}
