pub mod extract;
pub mod recognition;

pub use extract::{extract_fields, normalize};
pub use recognition::{
    ImagePayload, MockRecognizer, ProgressSink, RawRecognition, RecognitionAdapter,
    RecognitionError, RecognitionResult, RecognitionSettings, Recognizer, RemoteRecognizer,
    TesseractRecognizer, DEFAULT_LANGUAGE,
};
