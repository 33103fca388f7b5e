use super::*;

#[test]
fn clones_share_the_flag() {
    let a = CancelToken::new();
    let b = a.clone();
    assert!(!b.is_cancelled());
    a.cancel();
    assert!(b.is_cancelled());
}

#[test]
fn cancel_is_idempotent_and_visible_across_threads() {
    let token = CancelToken::new();
    let remote = token.clone();
    std::thread::spawn(move || {
        remote.cancel();
        remote.cancel();
    })
    .join()
    .unwrap();
    assert!(token.is_cancelled());
    assert!(!CancelToken::new().is_cancelled());
}
