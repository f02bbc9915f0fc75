//! Cross-thread invariants of the frame bridge.
//!
//! 1. **No torn view reads**: the engine's view-rect query racing a host
//!    resize always sees a width and height written together.
//! 2. **Whole frames only**: a renderer polling while the paint thread
//!    publishes never sees a frame mixing two paints.
//! 3. **Monotonic sequence**: successive polls never go back in time.
//! 4. **Last paint wins**: after any burst of paints, only the final
//!    buffer is visible downstream.

use std::sync::{Arc, Barrier};
use std::thread;

use osr_core::geometry::ViewGeometry;
use osr_frame::{BYTES_PER_PIXEL, FrameBridge, PaintElement};
use proptest::prelude::*;

const W: u32 = 16;
const H: u32 = 8;

fn fill(value: u8) -> Vec<u8> {
    vec![value; W as usize * H as usize * BYTES_PER_PIXEL]
}

// ── 1. View geometry ────────────────────────────────────────────────────

#[test]
fn view_rect_is_never_torn() {
    let bridge = Arc::new(FrameBridge::new(ViewGeometry::new(2, 1, 1.0), false));
    let barrier = Arc::new(Barrier::new(5));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let b = Arc::clone(&bridge);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..20_000 {
                    let rect = b.view_rect();
                    assert_eq!(rect.width, rect.height * 2, "torn view rect {rect:?}");
                }
            })
        })
        .collect();

    let writer = {
        let b = Arc::clone(&bridge);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for k in 1..=5_000u32 {
                b.resize(ViewGeometry::new(k * 2, k, 1.0));
            }
        })
    };

    writer.join().expect("writer panicked");
    for r in readers {
        r.join().expect("reader panicked");
    }
    assert_eq!(bridge.view().width, 10_000);
}

// ── 2 + 3. Frames under concurrent paint ────────────────────────────────

#[test]
fn renderer_sees_whole_frames_in_order() {
    let bridge = Arc::new(FrameBridge::new(ViewGeometry::new(W, H, 1.0), false));
    let barrier = Arc::new(Barrier::new(2));

    let renderer = {
        let b = Arc::clone(&bridge);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            let mut reader = b.reader();
            let mut last_seq = 0;
            barrier.wait();
            for _ in 0..50_000 {
                let Some(plan) = reader.poll(&b) else {
                    continue;
                };
                let Some(main) = plan.main else { continue };
                assert!(main.seq >= last_seq, "sequence went backwards");
                last_seq = main.seq;
                let frame = main.value.as_software().expect("software frame");
                let first = frame.pixels()[0];
                assert!(
                    frame.pixels().iter().all(|b| *b == first),
                    "frame {} mixes paints",
                    main.seq
                );
            }
        })
    };

    let painter = {
        let b = Arc::clone(&bridge);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for i in 0..2_000u32 {
                b.on_paint(PaintElement::View, &[], &fill((i % 251) as u8), W, H)
                    .expect("valid paint");
            }
        })
    };

    painter.join().expect("painter panicked");
    renderer.join().expect("renderer panicked");
    assert_eq!(bridge.stats().paints, 2_000);
}

// ── 4. Last paint wins ──────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn only_last_paint_is_visible(values in prop::collection::vec(any::<u8>(), 1..20)) {
        let bridge = FrameBridge::new(ViewGeometry::new(W, H, 1.0), false);
        for v in &values {
            bridge.on_paint(PaintElement::View, &[], &fill(*v), W, H).expect("valid paint");
        }
        let mut reader = bridge.reader();
        let plan = reader.poll(&bridge).expect("a frame");
        let main = plan.main.expect("main frame");
        let last = *values.last().expect("non-empty");
        prop_assert_eq!(main.seq, values.len() as u64);
        prop_assert!(main.value.as_software().expect("software").pixels().iter().all(|b| *b == last));
        prop_assert_eq!(bridge.stats().superseded, values.len() as u64 - 1);
        prop_assert!(reader.poll(&bridge).is_none());
    }
}
