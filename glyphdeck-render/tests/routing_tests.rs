// glyphdeck-render/tests/routing_tests.rs
//
// Integration tests for mouse routing over a console tree: topmost-first
// hit-testing, exclusive locks, and the lost-mouse transition contract.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use glyphdeck_core::Rect;
use glyphdeck_render::{
    ConsoleId, ConsoleTree, MouseConsoleState, MouseTarget, MouseTracker, PointerDevice,
    RawPointerState,
};

// ════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Asked(char),
    Accepted(char),
    Lost(char),
}

type Log = Rc<RefCell<Vec<Event>>>;

/// A console that accepts delivery whenever the cursor is over it.
struct TestConsole {
    name: char,
    bounds: Rect,
    visible: bool,
    wants_mouse: bool,
    exclusive: bool,
    log: Log,
}

impl TestConsole {
    fn new(name: char, bounds: Rect, log: &Log) -> Self {
        Self {
            name,
            bounds,
            visible: true,
            wants_mouse: true,
            exclusive: false,
            log: Rc::clone(log),
        }
    }

    fn boxed(name: char, bounds: Rect, log: &Log) -> Box<dyn MouseTarget> {
        Box::new(Self::new(name, bounds, log))
    }
}

impl MouseTarget for TestConsole {
    fn is_visible(&self) -> bool {
        self.visible
    }

    fn wants_mouse(&self) -> bool {
        self.wants_mouse
    }

    fn exclusive_mouse(&self) -> bool {
        self.exclusive
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn process_mouse(&mut self, state: &MouseConsoleState) -> bool {
        self.log.borrow_mut().push(Event::Asked(self.name));
        if state.is_over {
            self.log.borrow_mut().push(Event::Accepted(self.name));
        }
        state.is_over
    }

    fn lost_mouse(&mut self, _state: &MouseConsoleState) {
        self.log.borrow_mut().push(Event::Lost(self.name));
    }
}

struct FixedDevice(RawPointerState);

impl PointerDevice for FixedDevice {
    fn sample(&mut self) -> RawPointerState {
        self.0
    }
}

const FRAME: Duration = Duration::from_millis(16);

fn move_to(tracker: &mut MouseTracker, x: f32, y: f32) {
    let mut dev = FixedDevice(RawPointerState {
        position: (x, y),
        ..Default::default()
    });
    tracker.update(&mut dev, FRAME);
}

fn rect(x: i32, y: i32, w: i32, h: i32) -> Rect {
    Rect::new(x, y, w, h)
}

/// Make routing logs visible under RUST_LOG=glyphdeck_render=trace.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .compact()
        .try_init();
}

fn log() -> Log {
    init_logging();
    Rc::new(RefCell::new(Vec::new()))
}

fn drain(log: &Log) -> Vec<Event> {
    log.borrow_mut().drain(..).collect()
}

fn lost_count(events: &[Event], name: char) -> usize {
    events.iter().filter(|e| **e == Event::Lost(name)).count()
}

// ════════════════════════════════════════════════════════════════════
// Hit-testing order
// ════════════════════════════════════════════════════════════════════

#[test]
fn test_topmost_nested_console_gets_the_event() {
    let log = log();
    let mut tree = ConsoleTree::new();
    // A contains B contains C; all overlap at (5, 5). C paints last.
    let a = tree.insert_root(TestConsole::boxed('a', rect(0, 0, 100, 100), &log));
    let b = tree.insert_child(a, TestConsole::boxed('b', rect(0, 0, 50, 50), &log));
    let _c = tree.insert_child(b, TestConsole::boxed('c', rect(0, 0, 25, 25), &log));

    let mut tracker = MouseTracker::default();
    move_to(&mut tracker, 5.0, 5.0);
    tracker.process(&mut tree, None);

    // C is asked first and accepts; A and B are never consulted.
    assert_eq!(
        drain(&log),
        vec![Event::Asked('c'), Event::Accepted('c')]
    );
}

#[test]
fn test_declining_console_falls_through_to_next() {
    let log = log();
    let mut tree = ConsoleTree::new();
    let a = tree.insert_root(TestConsole::boxed('a', rect(0, 0, 100, 100), &log));
    // B does not cover (80, 80), so it declines and A is asked next.
    let _b = tree.insert_child(a, TestConsole::boxed('b', rect(0, 0, 50, 50), &log));

    let mut tracker = MouseTracker::default();
    move_to(&mut tracker, 80.0, 80.0);
    tracker.process(&mut tree, None);

    assert_eq!(
        drain(&log),
        vec![Event::Asked('b'), Event::Asked('a'), Event::Accepted('a')]
    );
    assert_eq!(tracker.lock_holder(), Some(a));
}

#[test]
fn test_later_sibling_is_on_top() {
    let log = log();
    let mut tree = ConsoleTree::new();
    let _a = tree.insert_root(TestConsole::boxed('a', rect(0, 0, 50, 50), &log));
    let b = tree.insert_root(TestConsole::boxed('b', rect(0, 0, 50, 50), &log));

    let mut tracker = MouseTracker::default();
    move_to(&mut tracker, 10.0, 10.0);
    tracker.process(&mut tree, None);

    assert_eq!(
        drain(&log),
        vec![Event::Asked('b'), Event::Accepted('b')]
    );
    assert_eq!(tracker.lock_holder(), Some(b));
}

#[test]
fn test_invisible_console_hides_its_subtree() {
    let log = log();
    let mut tree = ConsoleTree::new();
    let a = tree.insert_root(TestConsole::boxed('a', rect(0, 0, 100, 100), &log));
    let mut hidden = TestConsole::new('b', rect(0, 0, 100, 100), &log);
    hidden.visible = false;
    let b = tree.insert_child(a, Box::new(hidden));
    let _c = tree.insert_child(b, TestConsole::boxed('c', rect(0, 0, 100, 100), &log));

    let mut tracker = MouseTracker::default();
    move_to(&mut tracker, 10.0, 10.0);
    tracker.process(&mut tree, None);

    // Neither B nor its child C is a candidate.
    assert_eq!(
        drain(&log),
        vec![Event::Asked('a'), Event::Accepted('a')]
    );
}

#[test]
fn test_mouse_disabled_console_is_skipped_but_children_route() {
    let log = log();
    let mut tree = ConsoleTree::new();
    let mut deaf = TestConsole::new('a', rect(0, 0, 100, 100), &log);
    deaf.wants_mouse = false;
    let a = tree.insert_root(Box::new(deaf));
    let b = tree.insert_child(a, TestConsole::boxed('b', rect(0, 0, 50, 50), &log));

    let mut tracker = MouseTracker::default();
    move_to(&mut tracker, 10.0, 10.0);
    tracker.process(&mut tree, None);

    assert_eq!(
        drain(&log),
        vec![Event::Asked('b'), Event::Accepted('b')]
    );
    assert_eq!(tracker.lock_holder(), Some(b));
}

// ════════════════════════════════════════════════════════════════════
// Lock transitions
// ════════════════════════════════════════════════════════════════════

#[test]
fn test_moving_between_consoles_notifies_old_holder_once() {
    let log = log();
    let mut tree = ConsoleTree::new();
    let a = tree.insert_root(TestConsole::boxed('a', rect(0, 0, 50, 50), &log));
    let b = tree.insert_root(TestConsole::boxed('b', rect(50, 0, 50, 50), &log));

    let mut tracker = MouseTracker::default();
    move_to(&mut tracker, 10.0, 10.0);
    tracker.process(&mut tree, None);
    assert_eq!(tracker.lock_holder(), Some(a));
    drain(&log);

    move_to(&mut tracker, 60.0, 10.0);
    tracker.process(&mut tree, None);
    let events = drain(&log);
    assert_eq!(lost_count(&events, 'a'), 1);
    assert_eq!(tracker.lock_holder(), Some(b));

    // Staying on B produces no further loss.
    move_to(&mut tracker, 61.0, 10.0);
    tracker.process(&mut tree, None);
    let events = drain(&log);
    assert_eq!(lost_count(&events, 'a'), 0);
    assert_eq!(lost_count(&events, 'b'), 0);
}

#[test]
fn test_no_acceptor_notifies_holder_once_then_stays_silent() {
    let log = log();
    let mut tree = ConsoleTree::new();
    let a = tree.insert_root(TestConsole::boxed('a', rect(0, 0, 50, 50), &log));

    let mut tracker = MouseTracker::default();
    move_to(&mut tracker, 10.0, 10.0);
    tracker.process(&mut tree, None);
    assert_eq!(tracker.lock_holder(), Some(a));
    drain(&log);

    // Cursor leaves every console.
    move_to(&mut tracker, 200.0, 200.0);
    tracker.process(&mut tree, None);
    let events = drain(&log);
    assert_eq!(lost_count(&events, 'a'), 1);
    assert_eq!(tracker.lock_holder(), None);

    tracker.process(&mut tree, None);
    tracker.process(&mut tree, None);
    let events = drain(&log);
    assert_eq!(lost_count(&events, 'a'), 0);
}

#[test]
fn test_reentering_after_leaving_reacquires_lock() {
    let log = log();
    let mut tree = ConsoleTree::new();
    let a = tree.insert_root(TestConsole::boxed('a', rect(0, 0, 50, 50), &log));

    let mut tracker = MouseTracker::default();
    move_to(&mut tracker, 10.0, 10.0);
    tracker.process(&mut tree, None);
    move_to(&mut tracker, 200.0, 200.0);
    tracker.process(&mut tree, None);
    assert_eq!(tracker.lock_holder(), None);

    move_to(&mut tracker, 10.0, 10.0);
    tracker.process(&mut tree, None);
    assert_eq!(tracker.lock_holder(), Some(a));
}

#[test]
fn test_removed_lock_holder_drops_lock_silently() {
    let log = log();
    let mut tree = ConsoleTree::new();
    let a = tree.insert_root(TestConsole::boxed('a', rect(0, 0, 50, 50), &log));
    let b = tree.insert_root(TestConsole::boxed('b', rect(50, 0, 50, 50), &log));

    let mut tracker = MouseTracker::default();
    move_to(&mut tracker, 10.0, 10.0);
    tracker.process(&mut tree, None);
    assert_eq!(tracker.lock_holder(), Some(a));
    drain(&log);

    tree.remove(a);
    move_to(&mut tracker, 60.0, 10.0);
    tracker.process(&mut tree, None);
    let events = drain(&log);
    // Nobody left to notify; B simply becomes the new holder.
    assert_eq!(lost_count(&events, 'a'), 0);
    assert_eq!(tracker.lock_holder(), Some(b));
}

#[test]
fn test_clear_lock_notifies_holder() {
    let log = log();
    let mut tree = ConsoleTree::new();
    let a = tree.insert_root(TestConsole::boxed('a', rect(0, 0, 50, 50), &log));

    let mut tracker = MouseTracker::default();
    move_to(&mut tracker, 10.0, 10.0);
    tracker.process(&mut tree, None);
    assert_eq!(tracker.lock_holder(), Some(a));
    drain(&log);

    tracker.clear_lock(&mut tree);
    let events = drain(&log);
    assert_eq!(lost_count(&events, 'a'), 1);
    assert_eq!(tracker.lock_holder(), None);

    // Idempotent.
    tracker.clear_lock(&mut tree);
    assert_eq!(lost_count(&drain(&log), 'a'), 0);
}

// ════════════════════════════════════════════════════════════════════
// Exclusive routing
// ════════════════════════════════════════════════════════════════════

#[test]
fn test_locked_exclusive_console_receives_everything() {
    let log = log();
    let mut tree = ConsoleTree::new();
    let _a = tree.insert_root(TestConsole::boxed('a', rect(0, 0, 50, 50), &log));
    let mut excl = TestConsole::new('x', rect(50, 0, 50, 50), &log);
    excl.exclusive = true;
    let x = tree.insert_root(Box::new(excl));

    let mut tracker = MouseTracker::default();
    // Focused exclusive console takes the lock.
    move_to(&mut tracker, 60.0, 10.0);
    tracker.process(&mut tree, Some(x));
    assert_eq!(tracker.lock_holder(), Some(x));
    drain(&log);

    // Cursor moves over A; X still owns delivery and A is never asked,
    // even with focus gone.
    move_to(&mut tracker, 10.0, 10.0);
    tracker.process(&mut tree, None);
    assert_eq!(drain(&log), vec![Event::Asked('x')]);
    assert_eq!(tracker.lock_holder(), Some(x));
}

#[test]
fn test_focused_exclusive_takes_lock_from_holder() {
    let log = log();
    let mut tree = ConsoleTree::new();
    let a = tree.insert_root(TestConsole::boxed('a', rect(0, 0, 50, 50), &log));
    let mut excl = TestConsole::new('x', rect(50, 0, 50, 50), &log);
    excl.exclusive = true;
    let x = tree.insert_root(Box::new(excl));

    let mut tracker = MouseTracker::default();
    move_to(&mut tracker, 10.0, 10.0);
    tracker.process(&mut tree, None);
    assert_eq!(tracker.lock_holder(), Some(a));
    drain(&log);

    tracker.process(&mut tree, Some(x));
    let events = drain(&log);
    assert_eq!(lost_count(&events, 'a'), 1);
    assert!(events.contains(&Event::Asked('x')));
    assert_eq!(tracker.lock_holder(), Some(x));
}

#[test]
fn test_non_exclusive_lock_does_not_pin_delivery() {
    // A plain (non-exclusive) holder is not branch (a): normal hit-testing
    // continues and delivery follows the cursor.
    let log = log();
    let mut tree = ConsoleTree::new();
    let a = tree.insert_root(TestConsole::boxed('a', rect(0, 0, 50, 50), &log));
    let b = tree.insert_root(TestConsole::boxed('b', rect(50, 0, 50, 50), &log));

    let mut tracker = MouseTracker::default();
    move_to(&mut tracker, 10.0, 10.0);
    tracker.process(&mut tree, None);
    assert_eq!(tracker.lock_holder(), Some(a));

    move_to(&mut tracker, 60.0, 10.0);
    tracker.process(&mut tree, None);
    assert_eq!(tracker.lock_holder(), Some(b));
}

#[test]
fn test_exclusive_holder_losing_exclusivity_resumes_hit_testing() {
    // Branch (a) checks exclusivity on the current frame. A console that
    // stops being exclusive releases its grip without an explicit clear.
    struct Switchable {
        inner: TestConsole,
        exclusive_now: Rc<RefCell<bool>>,
    }
    impl MouseTarget for Switchable {
        fn is_visible(&self) -> bool {
            self.inner.is_visible()
        }
        fn wants_mouse(&self) -> bool {
            self.inner.wants_mouse()
        }
        fn exclusive_mouse(&self) -> bool {
            *self.exclusive_now.borrow()
        }
        fn bounds(&self) -> Rect {
            self.inner.bounds()
        }
        fn process_mouse(&mut self, state: &MouseConsoleState) -> bool {
            self.inner.process_mouse(state)
        }
        fn lost_mouse(&mut self, state: &MouseConsoleState) {
            self.inner.lost_mouse(state)
        }
    }

    let log = log();
    let exclusive_now = Rc::new(RefCell::new(true));
    let mut tree = ConsoleTree::new();
    let a = tree.insert_root(TestConsole::boxed('a', rect(0, 0, 50, 50), &log));
    let x = tree.insert_root(Box::new(Switchable {
        inner: TestConsole::new('x', rect(50, 0, 50, 50), &log),
        exclusive_now: Rc::clone(&exclusive_now),
    }));

    let mut tracker = MouseTracker::default();
    move_to(&mut tracker, 60.0, 10.0);
    tracker.process(&mut tree, Some(x));
    assert_eq!(tracker.lock_holder(), Some(x));

    *exclusive_now.borrow_mut() = false;
    move_to(&mut tracker, 10.0, 10.0);
    tracker.process(&mut tree, None);
    assert_eq!(tracker.lock_holder(), Some(a));
}

// ════════════════════════════════════════════════════════════════════
// Tree structure
// ════════════════════════════════════════════════════════════════════

#[test]
fn test_remove_takes_subtree_with_it() {
    let log = log();
    let mut tree = ConsoleTree::new();
    let a = tree.insert_root(TestConsole::boxed('a', rect(0, 0, 100, 100), &log));
    let b = tree.insert_child(a, TestConsole::boxed('b', rect(0, 0, 50, 50), &log));
    let c = tree.insert_child(b, TestConsole::boxed('c', rect(0, 0, 25, 25), &log));

    tree.remove(b);
    assert!(tree.contains(a));
    assert!(!tree.contains(b));
    assert!(!tree.contains(c));
    assert_eq!(tree.flatten_interactive(), vec![a]);
}

#[test]
fn test_console_ids_stay_stable_across_removal() {
    let log = log();
    let mut tree = ConsoleTree::new();
    let a = tree.insert_root(TestConsole::boxed('a', rect(0, 0, 10, 10), &log));
    let b = tree.insert_root(TestConsole::boxed('b', rect(10, 0, 10, 10), &log));

    tree.remove(a);
    assert!(tree.contains(b));
    assert_eq!(tree.get(b).map(|t| t.bounds()), Some(rect(10, 0, 10, 10)));
}

#[test]
fn test_insert_child_under_unknown_parent_becomes_root() {
    let log = log();
    let mut tree = ConsoleTree::new();
    let a = tree.insert_root(TestConsole::boxed('a', rect(0, 0, 10, 10), &log));
    tree.remove(a);

    let b = tree.insert_child(a, TestConsole::boxed('b', rect(0, 0, 10, 10), &log));
    assert!(tree.contains(b));
    assert_eq!(tree.flatten_interactive(), vec![b]);
}
