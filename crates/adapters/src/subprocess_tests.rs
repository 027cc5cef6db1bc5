use super::*;

#[tokio::test]
async fn succeeds_and_captures_stdout() {
    let runner = CmdRunner::new("echo -n hello", Duration::from_secs(5));
    let out = runner.run().await.unwrap();
    assert_eq!(out, b"hello");
}

#[tokio::test]
async fn nonzero_exit_is_an_error() {
    let runner = CmdRunner::new("exit 3", Duration::from_secs(5));
    let err = runner.run().await.unwrap_err();
    assert!(err.contains("exit"));
}

#[tokio::test]
async fn slow_command_times_out() {
    let runner = CmdRunner::new("sleep 5", Duration::from_millis(50));
    let err = runner.run().await.unwrap_err();
    assert!(err.contains("timed out"));
}
