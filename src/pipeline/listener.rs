//! Continuous wake listening pipeline.
//!
//! Two threads connected by a bounded frame queue: a capture thread that
//! polls the audio source and assembles fixed-size frames, and a
//! recognition thread that feeds frames through the streaming recognizer
//! and publishes transcript events with a running snapshot of the
//! transcript log.
//!
//! The frame queue never blocks the capture side: when recognition lags
//! and the queue fills, the oldest queued frame is dropped. Recognition
//! latency degrades; capture cadence does not.

use crate::audio::AudioSource;
use crate::clock::Clock;
use crate::error::Result;
use crate::pipeline::types::{AudioFrame, TranscriptEvent, TranscriptLog};
use crate::stt::StreamingRecognizer;
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(16);
const MAX_CONSECUTIVE_ERRORS: u32 = 10;
const EVENT_BUFFER: usize = 32;

/// Configuration for the wake listener.
#[derive(Debug, Clone, Copy)]
pub struct ListenerConfig {
    /// Samples per frame handed to the recognizer.
    pub frame_samples: usize,
    /// Bounded frame queue depth between capture and recognition.
    pub queue_capacity: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            frame_samples: crate::defaults::FRAME_SAMPLES,
            queue_capacity: crate::defaults::FRAME_QUEUE_CAPACITY,
        }
    }
}

/// A transcript event paired with the transcript-log snapshot taken
/// right after applying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerEvent {
    pub event: TranscriptEvent,
    pub snapshot: String,
}

/// Handle to a running wake listener.
pub struct ListenerHandle {
    running: Arc<AtomicBool>,
    threads: Vec<JoinHandle<()>>,
    events: Receiver<ListenerEvent>,
}

impl ListenerHandle {
    /// Receiver for transcript events, in capture order.
    pub fn events(&self) -> &Receiver<ListenerEvent> {
        &self.events
    }

    /// True until `stop` is called or the pipeline fails.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stops both threads, waiting up to a second before detaching.
    pub fn stop(mut self) {
        self.running.store(false, Ordering::SeqCst);

        let deadline = Instant::now() + Duration::from_secs(1);
        loop {
            let mut remaining = Vec::new();
            for handle in self.threads.drain(..) {
                if handle.is_finished() {
                    if let Err(panic_info) = handle.join() {
                        let msg = panic_info
                            .downcast_ref::<&str>()
                            .copied()
                            .or_else(|| panic_info.downcast_ref::<String>().map(|s| s.as_str()))
                            .unwrap_or("unknown panic");
                        eprintln!("aryavoice: listener thread panicked: {msg}");
                    }
                } else {
                    remaining.push(handle);
                }
            }
            self.threads = remaining;

            if self.threads.is_empty() {
                break;
            }
            if Instant::now() >= deadline {
                eprintln!(
                    "aryavoice: listener shutdown timeout, detaching {} thread(s)",
                    self.threads.len()
                );
                break;
            }
            thread::sleep(Duration::from_millis(50));
        }
    }
}

/// Starts the wake listening pipeline.
///
/// Takes ownership of the audio source (returned to the OS when the
/// capture thread exits) and the recognizer. The source's sample rate
/// is checked against the recognizer before any thread spawns.
pub fn start<C>(
    mut source: Box<dyn AudioSource>,
    mut recognizer: StreamingRecognizer<C>,
    config: ListenerConfig,
) -> Result<ListenerHandle>
where
    C: Clock + 'static,
{
    recognizer.check_source_rate(&*source)?;
    recognizer.reset();
    source.start()?;

    let running = Arc::new(AtomicBool::new(true));
    let (frame_tx, frame_rx) = bounded::<AudioFrame>(config.queue_capacity);
    let (event_tx, event_rx) = bounded::<ListenerEvent>(EVENT_BUFFER);

    // Capture thread: poll source, assemble frames, enqueue
    let capture_running = Arc::clone(&running);
    let capture_rx = frame_rx.clone();
    let capture_handle = thread::spawn(move || {
        let mut assembler = FrameAssembler::new(config.frame_samples);
        let mut sequence = 0u64;
        let mut consecutive_errors = 0u32;
        let mut frames_sent = 0u64;

        while capture_running.load(Ordering::SeqCst) {
            let samples = match source.read_samples() {
                Ok(s) => {
                    consecutive_errors = 0;
                    s
                }
                Err(e) => {
                    consecutive_errors += 1;
                    if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                        eprintln!(
                            "aryavoice: audio capture failed {consecutive_errors} times in a row: {e}"
                        );
                        eprintln!("aryavoice: check your microphone connection and try again");
                        capture_running.store(false, Ordering::SeqCst);
                        break;
                    }
                    thread::sleep(POLL_INTERVAL);
                    continue;
                }
            };

            if samples.is_empty() {
                // Normal at startup while the device initializes
                thread::sleep(POLL_INTERVAL);
                continue;
            }

            for chunk in assembler.push(&samples) {
                let frame = AudioFrame::new(chunk, Instant::now(), sequence);
                sequence += 1;
                if enqueue_drop_oldest(&frame_tx, &capture_rx, frame) {
                    eprintln!("aryavoice: recognition lagging, dropped oldest queued frame");
                }
                frames_sent += 1;
            }

            thread::sleep(POLL_INTERVAL);
        }

        if frames_sent == 0 {
            eprintln!("aryavoice: no audio frames captured from microphone");
            eprintln!("  - Check that your microphone is connected and selected");
            eprintln!("  - Run: aryavoice devices");
        }

        if let Err(e) = source.stop() {
            eprintln!("aryavoice: failed to stop audio capture: {e}");
        }
    });

    // Recognition thread: owns the transcript log, publishes events
    let recognize_running = Arc::clone(&running);
    let recognize_handle = thread::spawn(move || {
        let mut log = TranscriptLog::new();
        let mut consecutive_errors = 0u32;

        while recognize_running.load(Ordering::SeqCst) {
            let frame = match frame_rx.recv_timeout(Duration::from_millis(100)) {
                Ok(frame) => frame,
                Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
                Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
            };

            let event = match recognizer.accept(&frame) {
                Ok(Some(event)) => {
                    consecutive_errors = 0;
                    event
                }
                Ok(None) => {
                    consecutive_errors = 0;
                    continue;
                }
                Err(e) => {
                    consecutive_errors += 1;
                    eprintln!("aryavoice: recognition error: {e}");
                    if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                        eprintln!("aryavoice: recognition failing persistently, stopping listener");
                        recognize_running.store(false, Ordering::SeqCst);
                        break;
                    }
                    continue;
                }
            };

            log.apply(&event);
            let listener_event = ListenerEvent {
                snapshot: log.snapshot(),
                event,
            };
            if event_tx.try_send(listener_event).is_err() {
                // Consumer is not draining; events are advisory, drop
                eprintln!("aryavoice: event queue full, dropping transcript event");
            }
        }
    });

    Ok(ListenerHandle {
        running,
        threads: vec![capture_handle, recognize_handle],
        events: event_rx,
    })
}

/// Enqueues a frame, dropping the oldest queued frame when full.
///
/// Returns true when a frame was dropped. Never blocks.
fn enqueue_drop_oldest(
    tx: &Sender<AudioFrame>,
    rx: &Receiver<AudioFrame>,
    frame: AudioFrame,
) -> bool {
    match tx.try_send(frame) {
        Ok(()) => false,
        Err(TrySendError::Disconnected(_)) => false,
        Err(TrySendError::Full(frame)) => {
            let _ = rx.try_recv();
            // Single competing consumer: a second Full here means the
            // consumer raced us to refill, so give the frame up.
            let _ = tx.try_send(frame);
            true
        }
    }
}

/// Accumulates raw capture reads into fixed-size frames.
struct FrameAssembler {
    pending: Vec<i16>,
    frame_samples: usize,
}

impl FrameAssembler {
    fn new(frame_samples: usize) -> Self {
        Self {
            pending: Vec::with_capacity(frame_samples * 2),
            frame_samples,
        }
    }

    /// Feeds raw samples, returning zero or more complete frames.
    fn push(&mut self, samples: &[i16]) -> Vec<Vec<i16>> {
        self.pending.extend_from_slice(samples);
        let mut frames = Vec::new();
        while self.pending.len() >= self.frame_samples {
            let rest = self.pending.split_off(self.frame_samples);
            frames.push(std::mem::replace(&mut self.pending, rest));
        }
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MockAudioSource;
    use crate::clock::MockClock;
    use crate::stt::recognizer::RecognizerConfig;
    use crate::stt::segmenter::SegmenterConfig;
    use crate::stt::transcriber::MockTranscriber;

    fn test_recognizer(transcriber: MockTranscriber) -> StreamingRecognizer<MockClock> {
        let config = RecognizerConfig {
            sample_rate: 16000,
            partial_interval_ms: 500,
            max_segment_ms: 15_000,
            segmenter: SegmenterConfig {
                speech_threshold: 0.02,
                silence_duration_ms: 1000,
                min_speech_ms: 100,
            },
        };
        StreamingRecognizer::with_clock(Arc::new(transcriber), config, MockClock::new()).unwrap()
    }

    #[test]
    fn assembler_produces_fixed_size_frames() {
        let mut assembler = FrameAssembler::new(100);

        assert!(assembler.push(&[1i16; 60]).is_empty());

        let frames = assembler.push(&[2i16; 60]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].len(), 100);
        assert_eq!(frames[0][..60], [1i16; 60]);
        assert_eq!(frames[0][60..], [2i16; 40]);

        // 20 samples pending; a big read can yield several frames
        let frames = assembler.push(&[3i16; 280]);
        assert_eq!(frames.len(), 3);
        assert!(frames.iter().all(|f| f.len() == 100));
    }

    #[test]
    fn enqueue_drops_oldest_when_full() {
        let (tx, rx) = bounded::<AudioFrame>(2);
        let make = |seq| AudioFrame::new(vec![0i16; 4], Instant::now(), seq);

        assert!(!enqueue_drop_oldest(&tx, &rx, make(0)));
        assert!(!enqueue_drop_oldest(&tx, &rx, make(1)));
        assert!(enqueue_drop_oldest(&tx, &rx, make(2)));

        // Frame 0 was sacrificed; 1 and 2 survive in order
        assert_eq!(rx.try_recv().unwrap().sequence, 1);
        assert_eq!(rx.try_recv().unwrap().sequence, 2);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn enqueue_never_blocks_when_nobody_drains() {
        let (tx, rx) = bounded::<AudioFrame>(1);
        for seq in 0..50 {
            let frame = AudioFrame::new(vec![0i16; 4], Instant::now(), seq);
            enqueue_drop_oldest(&tx, &rx, frame);
        }
        // Only the newest frame remains
        assert_eq!(rx.try_recv().unwrap().sequence, 49);
    }

    #[test]
    fn listener_rejects_mismatched_source_rate() {
        let source = Box::new(MockAudioSource::new().with_sample_rate(44100));
        let recognizer = test_recognizer(MockTranscriber::new("mock"));
        let result = start(source, recognizer, ListenerConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn listener_fails_when_source_cannot_start() {
        let source = Box::new(MockAudioSource::new().with_start_failure());
        let recognizer = test_recognizer(MockTranscriber::new("mock"));
        let result = start(source, recognizer, ListenerConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn listener_publishes_partials_with_snapshots() {
        // Continuous speech: partials appear without any clock advance
        let source = Box::new(MockAudioSource::new().with_samples(vec![3000i16; 1600]));
        let recognizer = test_recognizer(MockTranscriber::new("mock").with_response("hello arya"));

        let handle = start(
            source,
            recognizer,
            ListenerConfig {
                frame_samples: 1600,
                queue_capacity: 8,
            },
        )
        .unwrap();

        let event = handle
            .events()
            .recv_timeout(Duration::from_secs(5))
            .expect("expected a transcript event");
        assert_eq!(event.event, TranscriptEvent::Partial("hello arya".to_string()));
        assert_eq!(event.snapshot, "hello arya");

        handle.stop();
    }

    #[test]
    fn events_arrive_in_capture_order() {
        let source = Box::new(MockAudioSource::new().with_samples(vec![3000i16; 1600]));
        let recognizer = test_recognizer(
            MockTranscriber::new("mock").with_responses(&["one", "one two", "one two three"]),
        );

        let handle = start(
            source,
            recognizer,
            ListenerConfig {
                frame_samples: 1600,
                queue_capacity: 8,
            },
        )
        .unwrap();

        let mut seen = Vec::new();
        for _ in 0..3 {
            if let Ok(event) = handle.events().recv_timeout(Duration::from_secs(5)) {
                seen.push(event.event.text().to_string());
            }
        }
        handle.stop();

        assert_eq!(seen, vec!["one", "one two", "one two three"]);
    }

    #[test]
    fn stop_terminates_both_threads() {
        let source = Box::new(MockAudioSource::new());
        let recognizer = test_recognizer(MockTranscriber::new("mock"));
        let handle = start(source, recognizer, ListenerConfig::default()).unwrap();

        assert!(handle.is_running());
        handle.stop();
        // stop() only returns once threads are joined or detached
    }
}
