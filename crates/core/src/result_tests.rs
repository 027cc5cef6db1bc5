use super::*;

#[test]
fn success_has_empty_error_msg() {
    let r = JobResult::success(JobId(1), 10, 12, b"out".to_vec());
    assert!(r.is_success());
    assert_eq!(r.extra, b"out");
}

#[test]
fn failure_has_nonempty_error_msg() {
    let r = JobResult::failure(JobId(1), 10, 12, "boom");
    assert!(!r.is_success());
    assert_eq!(r.error_msg, "boom");
}
