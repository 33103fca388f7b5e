use super::*;

fn os_args(args: &[&str]) -> Vec<OsString> {
    args.iter().map(OsString::from).collect()
}

#[test]
fn missing_program_is_a_spawn_failure() {
    let err = run_tool(
        Path::new("lorereel-definitely-not-a-real-binary"),
        &[],
        &RunOpts::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ToolFailure::Spawn { .. }));
    assert!(matches!(
        err.into_reel(ReelError::render),
        ReelError::Render(_)
    ));
}

#[test]
fn pre_cancelled_token_never_spawns() {
    let opts = RunOpts::default();
    opts.cancel.cancel();
    let err = run_tool(Path::new("true"), &[], &opts).unwrap_err();
    assert!(matches!(err, ToolFailure::Cancelled(_)));
    assert!(matches!(
        err.into_reel(ReelError::render),
        ReelError::Cancelled(_)
    ));
}

#[cfg(unix)]
#[test]
fn captures_exit_status_and_streams() {
    let out = run_tool(
        Path::new("sh"),
        &os_args(&["-c", "echo out; echo err 1>&2; exit 3"]),
        &RunOpts::default(),
    )
    .unwrap();
    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(3));
    assert_eq!(out.stdout_text(), "out");
    assert_eq!(out.stderr_text(), "err");
}

#[cfg(unix)]
#[test]
fn deadline_kills_long_running_child() {
    let opts = RunOpts::new(CancelToken::new(), Some(0.2)).unwrap();
    let started = Instant::now();
    let err = run_tool(Path::new("sleep"), &os_args(&["5"]), &opts).unwrap_err();
    assert!(matches!(err, ToolFailure::TimedOut { .. }));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[cfg(unix)]
#[test]
fn cancel_while_running_kills_child() {
    let opts = RunOpts::default();
    let token = opts.cancel.clone();
    let canceller = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(100));
        token.cancel();
    });
    let started = Instant::now();
    let err = run_tool(Path::new("sleep"), &os_args(&["5"]), &opts).unwrap_err();
    canceller.join().unwrap();
    assert!(matches!(err, ToolFailure::Cancelled(_)));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[test]
fn unusable_deadlines_are_config_errors() {
    for sec in [-1.0, 0.0, f64::NAN, f64::INFINITY, 1e30] {
        let err = RunOpts::new(CancelToken::new(), Some(sec)).unwrap_err();
        assert!(matches!(err, ReelError::Config(_)), "{sec}: {err}");
    }
    let opts = RunOpts::new(CancelToken::new(), Some(1.5)).unwrap();
    assert_eq!(opts.timeout, Some(Duration::from_millis(1500)));
    assert!(RunOpts::new(CancelToken::new(), None).unwrap().timeout.is_none());
}

#[test]
fn describe_command_quotes_graph_arguments() {
    let line = describe_command(
        Path::new("ffmpeg"),
        &os_args(&["-y", "-filter_complex", "[0:v]null[vout]"]),
    );
    assert_eq!(line, "ffmpeg -y -filter_complex '[0:v]null[vout]'");
}

#[test]
fn discard_partial_ignores_missing_files() {
    discard_partial(Path::new("target/lorereel-unit/does-not-exist.mp4"));
}
