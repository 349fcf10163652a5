use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::api::{CompletionClient, CompletionError, CompletionRequest};
use crate::core::app::{App, AppEvent, AppInitConfig};
use crate::core::persona::Persona;
use crate::core::speech::recognition::RecognitionSender;
use crate::core::speech::{
    EngineError, RecognitionConfig, RecognitionEngine, RecognitionEvent, RecognitionHost,
    SpeechSynthesizer, Utterance,
};
use crate::utils::logging::LoggingState;

/// Completion client answering from a queue of canned outcomes.
#[derive(Clone, Default)]
pub struct QueuedCompletionClient {
    inner: Arc<Mutex<QueuedState>>,
}

#[derive(Default)]
struct QueuedState {
    outcomes: VecDeque<Result<String, CompletionError>>,
    requests: Vec<CompletionRequest>,
}

impl QueuedCompletionClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, text: &str) {
        self.inner
            .lock()
            .unwrap()
            .outcomes
            .push_back(Ok(text.to_string()));
    }

    pub fn push_err(&self, err: CompletionError) {
        self.inner.lock().unwrap().outcomes.push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.inner.lock().unwrap().requests.clone()
    }
}

#[async_trait]
impl CompletionClient for QueuedCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let mut state = self.inner.lock().unwrap();
        state.requests.push(request);
        state
            .outcomes
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::Network("no queued response".into())))
    }
}

#[derive(Default)]
struct EngineLog {
    configs: Vec<RecognitionConfig>,
    senders: Vec<RecognitionSender>,
    starts: usize,
    stops: usize,
    aborts: usize,
    languages: Vec<String>,
    fail_starts_from: Option<usize>,
}

/// Recognition host whose engines acknowledge every successful start with
/// `Started` and otherwise only emit what the test pushes via [`Self::emit`].
#[derive(Clone)]
pub struct ScriptedRecognitionHost {
    log: Arc<Mutex<EngineLog>>,
    supported: bool,
}

impl ScriptedRecognitionHost {
    pub fn new() -> Self {
        Self {
            log: Arc::default(),
            supported: true,
        }
    }

    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    /// Make the `n`th engine start (zero-based, counted across restarts) and
    /// every later one fail.
    pub fn fail_starts_from(&self, n: usize) {
        self.log.lock().unwrap().fail_starts_from = Some(n);
    }

    /// Send an event on the most recently created engine's queue.
    pub fn emit(&self, event: RecognitionEvent) {
        let log = self.log.lock().unwrap();
        let sender = log.senders.last().expect("no engine created yet");
        let _ = sender.send(event);
    }

    pub fn configs(&self) -> Vec<RecognitionConfig> {
        self.log.lock().unwrap().configs.clone()
    }

    pub fn engines_created(&self) -> usize {
        self.log.lock().unwrap().configs.len()
    }

    pub fn starts(&self) -> usize {
        self.log.lock().unwrap().starts
    }

    pub fn stops(&self) -> usize {
        self.log.lock().unwrap().stops
    }

    pub fn aborts(&self) -> usize {
        self.log.lock().unwrap().aborts
    }

    pub fn languages(&self) -> Vec<String> {
        self.log.lock().unwrap().languages.clone()
    }
}

impl RecognitionHost for ScriptedRecognitionHost {
    fn create_engine(
        &self,
        config: RecognitionConfig,
        events: RecognitionSender,
    ) -> Option<Box<dyn RecognitionEngine>> {
        if !self.supported {
            return None;
        }
        let mut log = self.log.lock().unwrap();
        log.configs.push(config);
        log.senders.push(events.clone());
        Some(Box::new(ScriptedEngine {
            log: Arc::clone(&self.log),
            events,
        }))
    }
}

struct ScriptedEngine {
    log: Arc<Mutex<EngineLog>>,
    events: RecognitionSender,
}

impl RecognitionEngine for ScriptedEngine {
    fn start(&mut self) -> Result<(), EngineError> {
        let mut log = self.log.lock().unwrap();
        let attempt = log.starts;
        log.starts += 1;
        if log.fail_starts_from.is_some_and(|n| attempt >= n) {
            return Err(EngineError::new("recognition has already started"));
        }
        let _ = self.events.send(RecognitionEvent::Started);
        Ok(())
    }

    fn stop(&mut self) {
        self.log.lock().unwrap().stops += 1;
    }

    fn abort(&mut self) {
        self.log.lock().unwrap().aborts += 1;
    }

    fn set_language(&mut self, language: &str) {
        self.log.lock().unwrap().languages.push(language.to_string());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SynthCall {
    Speak(Utterance),
    Cancel,
}

/// Synthesizer that records every call for later inspection.
#[derive(Clone, Default)]
pub struct RecordingSynthesizer {
    calls: Arc<Mutex<Vec<SynthCall>>>,
}

impl RecordingSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SynthCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Text of every spoken utterance, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| match call {
                SynthCall::Speak(utterance) => Some(utterance.text.clone()),
                SynthCall::Cancel => None,
            })
            .collect()
    }

    pub fn last_utterance(&self) -> Option<Utterance> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|call| match call {
                SynthCall::Speak(utterance) => Some(utterance.clone()),
                SynthCall::Cancel => None,
            })
    }
}

impl SpeechSynthesizer for RecordingSynthesizer {
    fn speak(&mut self, utterance: Utterance) {
        self.calls.lock().unwrap().push(SynthCall::Speak(utterance));
    }

    fn cancel_all(&mut self) {
        self.calls.lock().unwrap().push(SynthCall::Cancel);
    }
}

/// Fakes wired into an [`App`], kept for assertions.
pub struct TestHarness {
    pub app: App,
    pub events: mpsc::UnboundedReceiver<AppEvent>,
    pub client: QueuedCompletionClient,
    pub host: ScriptedRecognitionHost,
    pub synth: RecordingSynthesizer,
}

pub fn create_test_app(voice_output: bool) -> TestHarness {
    let client = QueuedCompletionClient::new();
    let host = ScriptedRecognitionHost::new();
    let synth = RecordingSynthesizer::new();
    let init = AppInitConfig {
        persona: Persona::Default,
        voice_input: true,
        voice_output,
        ..AppInitConfig::default()
    };
    let (app, events) = App::new(
        init,
        Arc::new(client.clone()),
        Box::new(host.clone()),
        Box::new(synth.clone()),
        LoggingState::new(None).unwrap(),
    );
    TestHarness {
        app,
        events,
        client,
        host,
        synth,
    }
}
