use super::*;

fn cfg(w: u32, h: u32) -> SinkConfig {
    SinkConfig {
        width: w,
        height: h,
        fps: Fps::new(30, 1).unwrap(),
    }
}

#[test]
fn in_memory_sink_keeps_call_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(2, 2)).unwrap();
    for i in 0..4u64 {
        sink.push_frame(FrameIndex(i), &FrameRgb8::filled(2, 2, [i as u8, 0, 0]))
            .unwrap();
    }
    sink.end().unwrap();
    assert!(sink.is_finished());
    let order: Vec<u8> = sink.frames().iter().map(|(_, f)| f.pixel(0, 0)[0]).collect();
    assert_eq!(order, vec![0, 1, 2, 3]);
}

#[test]
fn in_memory_sink_enforces_contract() {
    let mut sink = InMemorySink::new();
    let frame = FrameRgb8::filled(2, 2, [0, 0, 0]);
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());

    sink.begin(cfg(2, 2)).unwrap();
    assert!(
        sink.push_frame(FrameIndex(0), &FrameRgb8::filled(4, 2, [0, 0, 0]))
            .is_err()
    );
    sink.push_frame(FrameIndex(1), &frame).unwrap();
    assert!(sink.push_frame(FrameIndex(1), &frame).is_err());
    sink.end().unwrap();
    assert!(sink.end().is_err());
}
