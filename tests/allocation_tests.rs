// Heap accounting around whole runs: every token, tree node and message a
// run allocates must be released by the time the caller has drained the
// diagnostics, whichever way the run ended.

use dew::Script;
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

struct CountingAllocator;

thread_local! {
    static LIVE_BYTES: Cell<isize> = const { Cell::new(0) };
}

fn track(delta: isize) {
    let _ = LIVE_BYTES.try_with(|live| live.set(live.get() + delta));
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            track(layout.size() as isize);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        track(-(layout.size() as isize));
    }
}

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

fn live_bytes() -> isize {
    LIVE_BYTES.with(|live| live.get())
}

/// Net bytes still held after one run of `source` and a full drain.
fn retained_by_run(script: &mut Script, source: &str) -> isize {
    // Warm up so the diagnostics queue already has its capacity
    let _ = script.run(source);
    script.reset();

    let before = live_bytes();
    let outcome = script.run(source);
    drop(outcome);
    let errors = script.drain_errors();
    drop(errors);
    live_bytes() - before
}

#[test]
fn runs_release_everything_they_allocate() {
    let sources = [
        "(1 + 2;",
        "1 + 2 * 3;",
        "(((1 + 2) * 3) - 4) % 5 == \"str\";",
        "1; 2; (3 + ;",
        "\"abc",
        "1 # 2;",
        "-\"a\"; 1 / 0; int x = \"y\";",
        "",
    ];

    let mut script = Script::new();
    for source in sources {
        assert_eq!(retained_by_run(&mut script, source), 0, "leak in {:?}", source);
    }
}

#[test]
fn failed_parse_leaves_only_its_diagnostic() {
    let mut script = Script::new();
    let _ = script.run("(1 + 2;");
    script.reset();

    let before = live_bytes();
    assert!(script.run("(1 + (2 * 3);").is_err());
    assert_eq!(script.error_count(), 1);

    let error = script.pop_error().unwrap();
    assert!(error.message.contains("expected ')'"));
    drop(error);
    assert_eq!(live_bytes(), before);
}
