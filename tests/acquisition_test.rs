#[cfg(test)]
mod tests {
    use ov2640_snapshot_cam::core::CameraError;
    use ov2640_snapshot_cam::hardware::video::{
        AcquisitionTimeouts, CaptureBuffer, CaptureSignal, DriverSignal, FrameAcquisition,
        IsrSignal, PollingWait, TransferMode,
    };
    use ov2640_snapshot_cam::sim::{PortCall, SignalEvent, SimClock, SimVideoPort};

    const BUFFER_BYTES: usize = 16 * 1024;

    struct Rig {
        clock: SimClock,
        port: SimVideoPort,
        isr: IsrSignal,
        signal: DriverSignal,
        wait: PollingWait<SimClock>,
        buffer: CaptureBuffer,
    }

    // ヘルパー：仮想時計・ポート・シグナルを結線する
    fn rig(poll_interval_ms: u32) -> Rig {
        let clock = SimClock::new();
        let (isr, signal) = CaptureSignal::channel();
        clock.attach(isr.clone());
        Rig {
            port: SimVideoPort::new(clock.clone()),
            wait: PollingWait::new(clock.clone(), poll_interval_ms),
            clock,
            isr,
            signal,
            buffer: CaptureBuffer::new(BUFFER_BYTES).unwrap(),
        }
    }

    fn capture(rig: &mut Rig) -> Result<(), CameraError> {
        FrameAcquisition::new(AcquisitionTimeouts::default()).capture(
            &mut rig.port,
            &rig.signal,
            &mut rig.wait,
            &mut rig.buffer,
        )
    }

    #[test]
    fn test_capture_completes_after_start_and_complete() {
        let mut rig = rig(1);
        rig.port.set_timing(Some(50), Some(200));
        let frame: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();
        rig.port.set_raw_frame(frame.clone());

        capture(&mut rig).unwrap();

        assert!(rig.buffer.is_ready());
        assert_eq!(rig.buffer.ready_count(), 1);
        assert_eq!(&rig.buffer.as_slice()[..frame.len()], &frame[..]);
        assert!(rig.buffer.as_slice()[frame.len()..].iter().all(|&b| b == 0));
        assert_eq!(rig.clock.now_ms(), 200);
        assert_eq!(
            rig.clock.fired(),
            vec![(50, SignalEvent::FrameStart), (200, SignalEvent::FrameComplete)]
        );

        // 開始前にキャッシュを書き出して無効化、停止後にもう一度無効化する
        assert_eq!(
            rig.port.calls(),
            vec![
                PortCall::Clean(BUFFER_BYTES),
                PortCall::Invalidate(BUFFER_BYTES),
                PortCall::Start {
                    mode: TransferMode::OneShot,
                    length_units: (BUFFER_BYTES / 4) as u32,
                },
                PortCall::Stop,
                PortCall::Invalidate(BUFFER_BYTES),
            ]
        );
    }

    #[test]
    fn test_stale_buffer_contents_are_zeroed() {
        let mut rig = rig(1);
        rig.buffer.as_mut_slice().fill(0xAB);
        rig.port.set_timing(Some(1), Some(2));

        capture(&mut rig).unwrap();
        assert!(rig.buffer.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_start_timeout_stops_transfer_within_bound() {
        for poll_interval_ms in [1, 7] {
            let mut rig = rig(poll_interval_ms);
            rig.port.set_timing(None, None);
            let before = rig.clock.now_ms();

            let result = capture(&mut rig);

            let waited = rig.clock.now_ms() - before;
            assert!(matches!(result, Err(CameraError::StartTimeout { waited_ms }) if waited_ms >= 1000));
            assert!(waited >= 1000 && waited <= 1000 + poll_interval_ms as u64);
            assert_eq!(rig.port.stop_count(), 1);
            assert!(!rig.buffer.is_ready());
            assert_eq!(rig.clock.pending_events(), 0);
        }
    }

    #[test]
    fn test_completion_timeout_stops_transfer() {
        let mut rig = rig(1);
        rig.port.set_timing(Some(10), None);

        let result = capture(&mut rig);

        assert!(matches!(result, Err(CameraError::CompletionTimeout { waited_ms: 3000 })));
        assert_eq!(rig.port.stop_count(), 1);
        assert!(!rig.buffer.is_ready());
        assert_eq!(rig.clock.now_ms(), 3010);
    }

    #[test]
    fn test_stale_signal_is_cleared_on_arm() {
        let mut rig = rig(1);
        rig.isr.on_frame_start();
        rig.isr.on_frame_complete();
        rig.port.set_timing(None, None);

        let result = capture(&mut rig);
        assert!(matches!(result, Err(CameraError::StartTimeout { .. })));
    }

    #[test]
    fn test_start_failure_leaves_port_stopped() {
        let mut rig = rig(1);
        rig.port.set_fail_start(true);

        let result = capture(&mut rig);
        assert!(matches!(result, Err(CameraError::Port(_))));
        assert_eq!(rig.port.stop_count(), 1);
        assert_eq!(rig.buffer.ready_count(), 0);
    }

    #[test]
    fn test_consecutive_captures_count_cycles() {
        let mut rig = rig(1);
        rig.port.set_timing(Some(5), Some(40));

        capture(&mut rig).unwrap();
        capture(&mut rig).unwrap();

        assert_eq!(rig.buffer.ready_count(), 2);
        assert_eq!(rig.signal.frame_count(), 2);
        assert_eq!(rig.port.start_count(), 2);
    }

    #[test]
    fn test_continuous_arm_keeps_buffer_and_repeats_frames() {
        let mut rig = rig(1);
        rig.buffer.as_mut_slice().fill(0x11);
        rig.port.set_timing(Some(5), Some(40));

        FrameAcquisition::default()
            .arm(
                &mut rig.port,
                &rig.signal,
                &mut rig.buffer,
                TransferMode::Continuous,
            )
            .unwrap();
        assert!(!rig.port.calls().contains(&PortCall::Clean(BUFFER_BYTES)));
        assert!(rig.buffer.as_slice().iter().all(|&b| b == 0x11));

        rig.clock.advance_ms(200);
        assert_eq!(rig.signal.frame_count(), 5);
        assert!(rig.signal.take_frame_complete());
        assert!(!rig.signal.take_frame_complete());
    }
}
