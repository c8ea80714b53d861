//! End-to-end tests that drive the smallsh binary through a piped stdin.

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

fn shell(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_smallsh"));
    cmd.current_dir(dir)
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

fn run_script(mut cmd: Command, script: &str) -> Output {
    let mut child = cmd.spawn().expect("failed to start smallsh");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(script.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn background_pid(stdout: &str) -> u32 {
    stdout
        .split(": ")
        .find_map(|chunk| chunk.trim().strip_prefix("background pid is "))
        .and_then(|pid| pid.lines().next())
        .expect("no background pid printed")
        .parse()
        .unwrap()
}

/// Single-letter scheduler state from /proc, `None` once the pid is gone
fn process_state(pid: u32) -> Option<char> {
    let stat = fs::read_to_string(format!("/proc/{}/stat", pid)).ok()?;
    stat.rsplit(')')
        .next()
        .and_then(|rest| rest.trim_start().chars().next())
}

/// A process counts as gone once it has exited, even if nobody reaped it yet
fn is_running(pid: u32) -> bool {
    !matches!(process_state(pid), Some('Z') | Some('X') | None)
}

/// Read the child's stdout up to and including the next newline
fn read_line_from(stdout: &mut impl Read) -> String {
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    while stdout.read(&mut byte).unwrap() == 1 {
        line.push(byte[0]);
        if byte[0] == b'\n' {
            break;
        }
    }
    String::from_utf8_lossy(&line).into_owned()
}

#[test]
fn status_starts_at_zero_and_tracks_exit_codes() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_script(shell(dir.path()), "status\nfalse\nstatus\nexit\n");
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), ": exit value 0\n: : exit value 1\n: ");
}

#[test]
fn redirection_round_trips_through_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("words.txt"), "pear\napple\n").unwrap();

    let script = "sort < words.txt > sorted.txt\ncat sorted.txt\nexit\n";
    let output = run_script(shell(dir.path()), script);

    assert_eq!(
        fs::read_to_string(dir.path().join("sorted.txt")).unwrap(),
        "apple\npear\n"
    );
    assert_eq!(stdout_of(&output), ": : apple\npear\n: ");
}

#[test]
fn bad_redirection_is_reported_and_the_shell_continues() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_script(shell(dir.path()), "cat < missing.txt\nstatus\nexit\n");

    assert_eq!(
        stdout_of(&output),
        ": cannot open missing.txt for input\n: exit value 1\n: "
    );
}

#[test]
fn unknown_command_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_script(shell(dir.path()), "smallsh-no-such-cmd\nstatus\nexit\n");

    assert_eq!(
        stdout_of(&output),
        ": smallsh-no-such-cmd: no such file or directory\n: exit value 2\n: "
    );
    assert!(output.status.success());
}

#[test]
fn signal_termination_is_reported_twice() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("suicide.sh"), "kill -TERM $$\n").unwrap();

    let output = run_script(shell(dir.path()), "sh suicide.sh\nstatus\nexit\n");
    assert_eq!(
        stdout_of(&output),
        ": terminated by signal 15\n: terminated by signal 15\n: "
    );
}

#[test]
fn cd_without_arguments_goes_home() {
    let dir = tempfile::tempdir().unwrap();
    let home = tempfile::tempdir().unwrap();
    let home_path = home.path().canonicalize().unwrap();

    let mut cmd = shell(dir.path());
    cmd.env("HOME", &home_path);
    let output = run_script(cmd, "cd /\ncd\npwd\nexit\n");

    assert_eq!(
        stdout_of(&output),
        format!(": : : {}\n: ", home_path.display())
    );
}

#[test]
fn cd_to_missing_directory_keeps_cwd() {
    let dir = tempfile::tempdir().unwrap();
    let cwd = dir.path().canonicalize().unwrap();

    let output = run_script(shell(&cwd), "cd /nonexistent/smallsh\npwd\nexit\n");

    assert_eq!(
        stdout_of(&output),
        format!(
            ": cd: /nonexistent/smallsh: no such file or directory\n: {}\n: ",
            cwd.display()
        )
    );
}

#[test]
fn background_job_is_reported_once_when_done() {
    let dir = tempfile::tempdir().unwrap();
    let script = "sleep 0.2 &\nsleep 1\n\n\nexit\n";

    let started = Instant::now();
    let output = run_script(shell(dir.path()), script);
    assert!(started.elapsed() < Duration::from_secs(10));

    let stdout = stdout_of(&output);
    let pid = background_pid(&stdout);
    let done = format!("background pid {} is done: exit value 0", pid);
    assert_eq!(stdout.matches(&done).count(), 1);
    // reported at the start of the iteration after the foreground sleep
    assert!(stdout.starts_with(&format!(": background pid is {}\n: : {}\n", pid, done)));
}

#[test]
fn background_output_goes_to_null_device() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_script(shell(dir.path()), "echo hidden &\nsleep 0.5\n\nexit\n");

    let stdout = stdout_of(&output);
    assert!(!stdout.contains("hidden"));
    assert!(stdout.contains("is done: exit value 0"));
}

#[test]
fn exit_terminates_background_jobs() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_script(shell(dir.path()), "sleep 30 &\nexit\n");
    assert!(output.status.success());

    let pid = background_pid(&stdout_of(&output));
    let deadline = Instant::now() + Duration::from_secs(5);
    while is_running(pid) && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(50));
    }
    assert!(!is_running(pid), "background job {} survived exit", pid);
}

#[test]
fn stop_signal_toggles_foreground_only_mode() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = shell(dir.path()).spawn().unwrap();
    let mut stdout = child.stdout.take().unwrap();

    // handlers are installed before the first prompt appears
    let mut prompt = [0u8; 2];
    stdout.read_exact(&mut prompt).unwrap();
    assert_eq!(&prompt, b": ");

    let shell_pid = Pid::from_raw(child.id() as i32);
    kill(shell_pid, Signal::SIGTSTP).unwrap();
    thread::sleep(Duration::from_millis(100));

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(b"sleep 0.1 &\n").unwrap();
    stdin.flush().unwrap();
    thread::sleep(Duration::from_millis(300));

    kill(shell_pid, Signal::SIGTSTP).unwrap();
    thread::sleep(Duration::from_millis(100));
    stdin.write_all(b"\nexit\n").unwrap();
    drop(stdin);

    let mut rest = String::new();
    stdout.read_to_string(&mut rest).unwrap();
    assert!(child.wait().unwrap().success());

    assert!(!rest.contains("background pid is"));
    assert_eq!(
        rest,
        "Entering foreground-only mode (& is now ignored)\n: \
         Exiting foreground-only mode\n: "
    );
}

#[test]
fn interrupt_does_not_kill_the_shell() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = shell(dir.path()).spawn().unwrap();
    let mut stdout = child.stdout.take().unwrap();

    let mut prompt = [0u8; 2];
    stdout.read_exact(&mut prompt).unwrap();

    kill(Pid::from_raw(child.id() as i32), Signal::SIGINT).unwrap();
    thread::sleep(Duration::from_millis(100));

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(b"status\nexit\n").unwrap();
    drop(stdin);

    let mut rest = String::new();
    stdout.read_to_string(&mut rest).unwrap();
    assert!(child.wait().unwrap().success());
    // the notice is printed on the iteration after the signal arrived
    assert_eq!(rest, "exit value 0\n\n: ");
}

#[test]
fn single_command_mode_has_no_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = shell(dir.path());
    cmd.args(["-c", "status"]);
    let output = run_script(cmd, "");
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "exit value 0\n");
}

#[test]
fn invalid_utf8_line_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = shell(dir.path()).spawn().unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"echo \xff\xfe\nstatus\nexit\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), ": : exit value 0\n: ");
}

#[test]
fn background_children_ignore_interrupt_and_stop() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = shell(dir.path()).spawn().unwrap();
    let mut stdin = child.stdin.take().unwrap();
    let mut stdout = child.stdout.take().unwrap();

    stdin.write_all(b"sleep 3 &\n").unwrap();
    stdin.flush().unwrap();
    let pid = background_pid(&read_line_from(&mut stdout));

    let job = Pid::from_raw(pid as i32);
    kill(job, Signal::SIGINT).unwrap();
    kill(job, Signal::SIGTSTP).unwrap();
    thread::sleep(Duration::from_millis(200));

    // neither killed nor stopped
    assert!(
        matches!(process_state(pid), Some('S') | Some('R')),
        "background job {} state {:?}",
        pid,
        process_state(pid)
    );

    stdin.write_all(b"exit\n").unwrap();
    drop(stdin);
    assert!(child.wait().unwrap().success());
}

#[test]
fn foreground_child_dies_from_interrupt() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("interrupt.sh"), "kill -INT $$\n").unwrap();

    let output = run_script(shell(dir.path()), "sh interrupt.sh\nstatus\nexit\n");
    assert_eq!(
        stdout_of(&output),
        ": terminated by signal 2\n: terminated by signal 2\n: "
    );
}
