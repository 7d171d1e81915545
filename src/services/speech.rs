//! Speech announcements via an external text-to-speech command

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::timer::Announce;

/// Announcer that shells out to a text-to-speech command such as `espeak`
/// or `say`. Every message is also logged, so a silent announcer (no
/// command configured) still leaves a trace. A missing or failing command
/// is logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct SpeechAnnouncer {
    command: Option<String>,
}

impl SpeechAnnouncer {
    /// Create an announcer that speaks through the given command
    pub fn new(command: String) -> Self {
        Self {
            command: Some(command),
        }
    }

    /// Create an announcer that only logs, for runtimes without speech
    pub fn silent() -> Self {
        Self { command: None }
    }

    /// Check whether this announcer has a speech command configured
    pub fn is_silent(&self) -> bool {
        self.command.is_none()
    }
}

impl Announce for SpeechAnnouncer {
    fn announce(&self, message: &str) {
        info!("Announcing: {}", message);

        let Some(command) = self.command.clone() else {
            return;
        };
        let text = message.to_string();

        // Fire and forget; announcements never block a tick
        tokio::spawn(async move {
            match Command::new(&command).arg(&text).output().await {
                Ok(output) if output.status.success() => {
                    debug!("Speech command completed");
                }
                Ok(output) => {
                    warn!("Speech command exited with status: {}", output.status);
                }
                Err(e) => {
                    warn!("Failed to run speech command {}: {}", command, e);
                }
            }
        });
    }
}

/// Check whether the configured text-to-speech command is available
pub async fn check_speech_available(command: &str) -> Result<(), String> {
    Command::new(command)
        .arg("--version")
        .output()
        .await
        .map_err(|_| format!("{} is not available, speech announcements disabled", command))?;

    info!("Speech command available: {}", command);
    Ok(())
}
