use super::*;

#[test]
fn first_acquire_locks_and_last_release_unlocks() {
    let scope = ScrollLockScope::new();
    let outer = scope.register();
    let inner = scope.register();
    assert_ne!(outer, inner);

    assert!(scope.acquire(outer));
    assert!(!scope.acquire(inner));
    assert!(scope.is_innermost(inner));
    assert!(!scope.is_innermost(outer));
    assert_eq!(scope.depth(), 2);

    assert!(!scope.release(inner));
    assert!(scope.is_innermost(outer));
    assert!(scope.release(outer));
    assert_eq!(scope.depth(), 0);
}

#[test]
fn acquire_and_release_are_idempotent() {
    let scope = ScrollLockScope::new();
    let token = scope.register();
    assert!(scope.acquire(token));
    assert!(!scope.acquire(token));
    assert_eq!(scope.depth(), 1);
    assert!(scope.release(token));
    assert!(!scope.release(token));
    assert!(!scope.is_held(token));
}

#[test]
fn clones_share_the_stack() {
    let a = ScrollLockScope::new();
    let b = a.clone();
    let token = b.register();
    a.acquire(token);
    assert!(b.is_held(token));
}

#[test]
fn separate_scopes_do_not_contend() {
    let a = ScrollLockScope::new();
    let b = ScrollLockScope::new();
    let ta = a.register();
    let tb = b.register();
    assert!(a.acquire(ta));
    assert!(b.acquire(tb));
    assert!(a.is_innermost(ta) && b.is_innermost(tb));
}
