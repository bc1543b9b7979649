//! Local speech output for narrating summaries

use super::error::SpeechError;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Mutex, MutexGuard};
use tokio::process::{Child, Command};

/// Text to speak and the voice/language to speak it in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// Text to read aloud
    pub text: String,
    /// Short language code (e.g. "en", "hi", "mr")
    pub language: String,
}

/// Trait for local text-to-speech engines
///
/// `speak` starts narration and returns immediately; narration continues in
/// the background until it finishes or `cancel` is called.
pub trait SpeechOutput: Send + Sync {
    /// Start narrating, replacing any narration in progress
    fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError>;

    /// Stop narration in progress, if any
    fn cancel(&self);

    /// Whether narration is currently playing
    fn is_speaking(&self) -> bool;

    /// Get the name of this speech implementation
    fn name(&self) -> &'static str;
}

/// Speech engine driven by an `espeak-ng` compatible command
///
/// Each utterance runs `<program> -v <language> <text>` as a child process
/// that is killed on cancel or when the engine is dropped.
pub struct CommandSpeech {
    program: PathBuf,
    current: Mutex<Option<Child>>,
}

impl CommandSpeech {
    /// Create an engine running `program`
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            current: Mutex::new(None),
        }
    }

    /// Attempt to find `espeak-ng` (or `espeak`) in PATH
    pub fn from_path() -> Option<Self> {
        which::which("espeak-ng")
            .or_else(|_| which::which("espeak"))
            .ok()
            .map(Self::new)
    }

    fn current(&self) -> MutexGuard<'_, Option<Child>> {
        // A poisoned lock still holds a valid child handle
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SpeechOutput for CommandSpeech {
    fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        let mut current = self.current();
        if let Some(mut previous) = current.take() {
            let _ = previous.start_kill();
        }

        let child = Command::new(&self.program)
            .arg("-v")
            .arg(&utterance.language)
            .arg("--")
            .arg(&utterance.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpeechError::Failed(format!("{}: {}", self.program.display(), e)))?;

        tracing::debug!(
            language = %utterance.language,
            chars = utterance.text.chars().count(),
            "narration started"
        );
        *current = Some(child);
        Ok(())
    }

    fn cancel(&self) {
        if let Some(mut child) = self.current().take()
            && let Err(e) = child.start_kill()
        {
            tracing::debug!(error = %e, "narration process already gone");
        }
    }

    fn is_speaking(&self) -> bool {
        let mut current = self.current();
        match current.as_mut().map(Child::try_wait) {
            Some(Ok(None)) => true,
            Some(_) => {
                *current = None;
                false
            }
            None => false,
        }
    }

    fn name(&self) -> &'static str {
        "command"
    }
}

/// Speech stand-in when no engine is installed
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpeech;

impl SpeechOutput for NoSpeech {
    fn speak(&self, _utterance: &Utterance) -> Result<(), SpeechError> {
        Err(SpeechError::Unavailable(
            "install espeak-ng to enable narration".into(),
        ))
    }

    fn cancel(&self) {}

    fn is_speaking(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
