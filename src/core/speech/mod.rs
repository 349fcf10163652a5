pub mod error;
pub mod output;
pub mod recognition;
pub mod session;
pub mod synth;

pub use error::{EngineError, SpeechError};
pub use output::{
    derive_speech_safe_text, SpeechOutput, SpeechSynthesizer, Utterance, SPEECH_PITCH,
    SPEECH_PLACEHOLDER, SPEECH_RATE,
};
pub use recognition::{
    RecognitionConfig, RecognitionEngine, RecognitionEvent, RecognitionHost, RecognitionResult,
    UnavailableRecognitionHost,
};
pub use session::{
    SessionUpdate, SpeechSession, SpeechSessionController, SpeechState, AUTO_SUBMIT_DELAY,
};
pub use synth::{CommandSynthesizer, SilentSynthesizer, DEFAULT_SPEECH_COMMAND};
