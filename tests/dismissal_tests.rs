//! Integration tests for dismissal within one router
//!
//! Unwinding, presented flags and surface-driven garbage collection.

mod common;

use common::*;
use route_stack::*;

#[test]
fn test_dismiss_up_to_keeps_target_presented() {
    let (router, surface, root) = with_root("r0");
    let b = router.push(page("B")).unwrap();
    let c = router
        .navigate(page("C"), (), &PushPresenter, Some(b))
        .unwrap();

    let result = router.dismiss_up_to(b);

    assert_eq!(result, DismissResult::Dismissed { top: Some(b) });
    assert_eq!(router.top_id(), Some(b));
    assert!(router.is_presenting(b));
    assert!(!router.is_presenting(c));
    assert_eq!(router.stack_ids(), vec![root, b]);
    assert_eq!(visible(&surface), vec!["B"]);
}

#[test]
fn test_dismiss_up_to_including_removes_target() {
    let (router, surface, root) = with_root("r0");
    let b = router.push(page("B")).unwrap();
    router.push(page("C")).unwrap();

    let result = router.dismiss_up_to_including(b);

    assert_eq!(result, DismissResult::Dismissed { top: Some(root) });
    assert!(!router.is_presenting(b));
    assert_eq!(surface.frame_count(), 1);
    assert_eq!(visible(&surface), vec!["r0"]);
}

#[test]
fn test_dismiss_up_to_is_idempotent() {
    let (router, surface, root) = with_root("r0");
    let b = router.push(page("B")).unwrap();
    router.push(page("C")).unwrap();
    router.push(page("D")).unwrap();

    router.dismiss_up_to(b);
    let once = (router.stack_ids(), visible(&surface), surface.frame_count());
    let again = router.dismiss_up_to(b);
    let twice = (router.stack_ids(), visible(&surface), surface.frame_count());

    assert_eq!(once, twice);
    assert_eq!(again, DismissResult::Dismissed { top: Some(b) });
    assert_eq!(router.stack_ids(), vec![root, b]);
}

#[test]
fn test_push_then_dismiss_equals_replace_root() {
    let (router, surface, root) = with_root("A");
    let b = router.push(page("B")).unwrap();
    router.dismiss_up_to_including(b);

    let (reference, reference_surface, reference_root) = with_root("A");

    assert_eq!(router.stack_ids(), vec![root]);
    assert_eq!(reference.stack_ids(), vec![reference_root]);
    assert_eq!(visible(&surface), visible(&reference_surface));
    assert_eq!(surface.frame_count(), reference_surface.frame_count());
    assert_eq!(router.depth(), reference.depth());
}

#[test]
fn test_dismiss_unknown_id_changes_nothing() {
    let (router, surface, root) = with_root("r0");
    let b = router.push(page("B")).unwrap();
    let unknown = router.generator().next();

    let result = router.dismiss_up_to_including(unknown);

    assert_eq!(result, DismissResult::NotFound { id: unknown });
    assert_eq!(
        result.as_error(),
        Some(NavigationError::RouteNotFound { id: unknown })
    );
    assert_eq!(router.stack_ids(), vec![root, b]);
    assert_eq!(visible(&surface), vec!["B"]);
}

#[test]
fn test_dismiss_root_of_root_router_empties_it() {
    let (router, surface, root) = with_root("r0");
    router.push(page("B")).unwrap();

    let result = router.dismiss_up_to_including(root);

    assert_eq!(result, DismissResult::Dismissed { top: None });
    assert_eq!(router.depth(), 0);
    assert_eq!(surface.frame_count(), 0);
}

#[test]
fn test_dismissed_hosts_report_not_presented() {
    let (router, _surface, _root) = with_root("r0");
    let b = router.push(page("B")).unwrap();
    let flag = router.presented_flag(b).unwrap();

    router.dismiss_up_to_including(b);

    assert!(!flag.get());
    assert!(router.presented_flag(b).is_none());
}

#[test]
fn test_sibling_flag_false_reverts_anchor() {
    let (router, surface, root) = with_root("r0");
    let b = router.push(page("B")).unwrap();
    let sheet = router
        .navigate(page("D"), (), &SiblingPresenter::new(false), Some(b))
        .unwrap();
    assert!(router.is_presenting(sheet));
    assert_eq!(visible(&surface), vec!["B", "D"]);

    router.presented_flag(sheet).unwrap().set(false);

    assert!(!router.is_presenting(sheet));
    assert_eq!(visible(&surface), vec!["B"]);
    assert_eq!(router.stack_ids(), vec![root, b]);
}

#[test]
fn test_replace_parent_flag_false_restores_parent() {
    let (router, surface, root) = with_root("r0");
    let alert = router
        .navigate(page("alert"), (), &ReplaceParentPresenter, Some(root))
        .unwrap();

    router.presented_flag(alert).unwrap().dismiss();
    // The overlay hides as soon as the flag flips.
    assert_eq!(visible(&surface), vec!["r0"]);

    router.reconcile();
    assert_eq!(router.stack_ids(), vec![root]);
    let frame = surface.current_top_frame().unwrap();
    assert_eq!(surface.content_of(frame).unwrap().visible(), vec![&"r0"]);
}

#[test]
fn test_push_flag_false_dismisses_including() {
    let (router, surface, root) = with_root("r0");
    let b = router.push(page("B")).unwrap();
    let c = router.push(page("C")).unwrap();

    router.presented_flag(b).unwrap().set(false);

    assert!(!router.is_presenting(b));
    assert!(!router.is_presenting(c));
    assert_eq!(router.stack_ids(), vec![root]);
    assert_eq!(visible(&surface), vec!["r0"]);
}

#[test]
fn test_closing_anchor_overlay_closes_overlays_on_it() {
    let (router, surface, root) = with_root("r0");
    let sheet = router
        .navigate(page("sheet"), (), &SiblingPresenter::new(false), Some(root))
        .unwrap();
    let nested = router
        .navigate(page("popover"), (), &SiblingPresenter::new(false), Some(sheet))
        .unwrap();
    assert_eq!(visible(&surface), vec!["r0", "sheet", "popover"]);

    router.presented_flag(sheet).unwrap().dismiss();
    // The popover lives inside the sheet and hides with it.
    assert_eq!(visible(&surface), vec!["r0"]);
    router.reconcile();

    assert!(!router.is_presenting(sheet));
    assert!(!router.is_presenting(nested));
    assert_eq!(visible(&surface), vec!["r0"]);
}

#[test]
fn test_dismiss_overlay_anchored_below_top() {
    let (router, surface, root) = with_root("r0");
    let b = router.push(page("B")).unwrap();
    let sheet = router
        .navigate(page("sheet"), (), &SiblingPresenter::new(false), Some(root))
        .unwrap();

    router.dismiss_up_to(b);

    assert!(!router.is_presenting(sheet));
    let root_frame = surface.frames()[0];
    assert!(surface.overlay_of(root_frame).is_none());
    assert_eq!(visible(&surface), vec!["B"]);
}

#[test]
fn test_surface_tear_down_is_garbage_collected() {
    let (router, surface, root) = with_root("r0");
    let b = router.push(page("B")).unwrap();
    let alert = router
        .navigate(page("alert"), (), &ReplaceParentPresenter, Some(b))
        .unwrap();
    let flag = router.presented_flag(b).unwrap();

    // Back gesture handled by the platform.
    surface.tear_down_top();

    assert!(!router.is_presenting(b));
    assert!(!router.is_presenting(alert));
    assert!(!flag.get());
    assert_eq!(router.stack_ids(), vec![root]);

    let c = router.push(page("C")).unwrap();
    assert_eq!(router.stack_ids(), vec![root, c]);
    assert_eq!(surface.frame_count(), 2);
}

#[test]
fn test_presented_flag_gone_after_tear_down() {
    let (router, surface, root) = with_root("r0");
    let b = router.push(page("B")).unwrap();
    assert!(router.presented_flag(b).is_some());

    surface.tear_down_top();

    assert!(router.presented_flag(b).is_none());
    assert!(router.presented_flag(root).is_some());
    assert_eq!(router.depth(), 1);
}
