mod common;

use std::time::Duration;

use common::{DEFAULT_TIMEOUT, FAST, SwanclockProcess, run_with_input};

fn run_args<'a>(extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec!["run"];
    args.extend_from_slice(&FAST);
    args.extend_from_slice(extra);
    args
}

#[test]
fn countdown_expires_and_says_goodbye() {
    let output = run_with_input(&run_args(&["--timer", "3", "2", "1"]), "");
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    // the expiry banner is shown on the display, not the console
    assert!(!stdout.contains("BOOOM!"), "{stdout}");
    let order = [
        "World dispatching stopped!",
        "Critical mass reached...",
        "The world ends now!",
        "Good bye!",
        "Ok, just a joke. Only the program stops.",
    ];
    let mut from = 0;
    for line in order {
        let at = stdout[from..]
            .find(line)
            .unwrap_or_else(|| panic!("missing or out of order: {line}\n{stdout}"));
        from += at + line.len();
    }
}

#[test]
fn early_code_is_refused() {
    let output = run_with_input(
        &run_args(&["--timer", "5", "2", "1"]),
        "4 8 15 16 23 42\n",
    );
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(">: Input is actually not open!"), "{stdout}");
    assert!(!stdout.contains("Correct world parameter entered!"));
}

#[test]
fn silent_run_hides_gate_messages() {
    let output = run_with_input(
        &run_args(&["--timer", "5", "2", "1", "--silent"]),
        "4 8 15 16 23 42\n",
    );
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("not open"));
    assert!(stdout.contains("Good bye!"));
}

#[test]
fn events_file_records_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let path_str = path.to_str().unwrap();

    let output = run_with_input(
        &run_args(&["--timer", "3", "2", "1", "--events-file", path_str]),
        "hello\n",
    );
    assert_eq!(output.status.code(), Some(0));

    let raw = std::fs::read_to_string(&path).unwrap();
    let events: Vec<serde_json::Value> = raw
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    let types: Vec<&str> = events.iter().map(|e| e["type"].as_str().unwrap()).collect();
    assert_eq!(types.first(), Some(&"CountdownStarted"));
    assert!(types.contains(&"GateEvaluated"));
    assert_eq!(types.last(), Some(&"CountdownEnded"));

    let phases: Vec<&str> = events
        .iter()
        .filter(|e| e["type"] == "PhaseEntered")
        .map(|e| e["phase"].as_str().unwrap())
        .collect();
    assert_eq!(phases, ["attention", "warning", "ended"]);

    for (i, event) in events.iter().enumerate() {
        assert_eq!(event["sequence"], i);
        assert!(event["timestamp"].is_string());
    }
}

#[tokio::test]
async fn code_inside_window_restarts_countdown() {
    let mut proc = SwanclockProcess::spawn_run(&[
        "--timer",
        "30",
        "20",
        "1",
        "--tick-interval",
        "50ms",
        "--no-pacing",
        "--display",
        "terminal",
        "--color",
        "never",
        "--quiet",
    ]);

    // remaining 19..10: inside the attention window
    proc.wait_for_stderr("[ 000:1", DEFAULT_TIMEOUT).await;
    proc.send_line("4 8 15 16 23 42").await;

    // restarted at the full duration, then down to zero again
    proc.wait_for_stderr("[ 000:30 ]", DEFAULT_TIMEOUT).await;
    proc.wait_for_stderr("[ BOOOM! ]", DEFAULT_TIMEOUT).await;
    let (code, stdout) = proc.finish().await;

    assert_eq!(code, Some(0));
    assert!(stdout.contains(">: World parameters: 4 8 15 16 23 42"), "{stdout}");
    assert!(stdout.contains(">: Correct world parameter entered!"), "{stdout}");
    assert!(stdout.contains(">: Countdown restarted!"), "{stdout}");
    assert!(stdout.contains("Good bye!"));
}

#[cfg(unix)]
#[tokio::test]
async fn sigterm_plays_interrupt_farewell_and_exits_zero() {
    let mut proc = SwanclockProcess::spawn_run(&[
        "--timer",
        "600",
        "10",
        "5",
        "--no-pacing",
        "--display",
        "terminal",
        "--color",
        "never",
        "--quiet",
    ]);

    proc.wait_for_stderr("[ 010:00 ]", DEFAULT_TIMEOUT).await;
    // give the signal listener a moment to install
    tokio::time::sleep(Duration::from_millis(300)).await;

    let pid = proc.id().expect("child still running").to_string();
    let status = std::process::Command::new("kill")
        .args(["-TERM", &pid])
        .status()
        .unwrap();
    assert!(status.success());

    let (code, stdout) = proc.finish().await;
    assert_eq!(code, Some(0));
    assert!(stdout.contains(">: Stop <countdown>... OK"), "{stdout}");
    assert!(stdout.contains(">: BOOOOM!"));
    assert!(!stdout.contains("World dispatching stopped!"));
}
