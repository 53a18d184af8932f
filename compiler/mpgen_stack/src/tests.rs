use super::*;

#[test]
fn test_deep_recursion() {
    // A linked chain of 100k types would overflow a typical 8MB stack
    fn walk_chain(n: u64) -> u64 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { walk_chain(n - 1) + 1 })
    }

    assert_eq!(walk_chain(100_000), 100_000);
}

#[test]
fn test_works_with_result_type() {
    let result: Result<i32, &str> = ensure_sufficient_stack(|| Ok(123));
    assert_eq!(result, Ok(123));
}

#[test]
fn test_depth_tracking() {
    let tracker = DepthTracker::new();
    {
        let _outer = tracker.enter();
        {
            let _inner = tracker.enter();
            assert_eq!(tracker.depth(), 2);
        }
        assert_eq!(tracker.depth(), 1);
        let _sibling = tracker.enter();
        assert_eq!(tracker.depth(), 2);
    }
    assert_eq!(tracker.depth(), 0);
    assert_eq!(tracker.max_depth(), 2);
}

#[test]
fn test_depth_tracking_through_recursion() {
    fn nest(tracker: &DepthTracker, n: usize) {
        let _guard = tracker.enter();
        if n > 0 {
            ensure_sufficient_stack(|| nest(tracker, n - 1));
        }
    }

    let tracker = DepthTracker::new();
    nest(&tracker, 500);
    assert_eq!(tracker.max_depth(), 501);
    assert_eq!(tracker.depth(), 0);
}
