//! Speech-to-text: segmentation, the transcriber seam, and the
//! streaming recognizer built on top of both.

pub mod cloud;
pub mod recognizer;
pub mod segmenter;
pub mod transcriber;

pub use cloud::CloudTranscriber;
pub use recognizer::{RecognizerConfig, StreamingRecognizer};
pub use segmenter::{SegmentEvent, SegmentState, SegmenterConfig, SpeechSegmenter};
pub use transcriber::{MockTranscriber, Transcriber};
