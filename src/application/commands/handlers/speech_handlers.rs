//! Speech Command Handlers

use std::sync::Arc;
use std::time::Duration;

use crate::application::commands::GenerateSpeech;
use crate::application::error::ApplicationError;
use crate::application::ports::TtsEnginePort;
use crate::domain::speech::{AudioFormat, SpeechRequest};

/// TTS 不可用时返回给客户端的说明
pub const SPEECH_UNAVAILABLE_MESSAGE: &str =
    "TTS generation simulated - audio would be generated here";

/// TTS 调用的默认超时
pub const DEFAULT_TTS_TIMEOUT: Duration = Duration::from_secs(60);

/// 合成结果
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechOutcome {
    /// 合成成功
    Synthesized { audio: Vec<u8> },
    /// TTS 不可用，返回空音频和说明
    Unavailable { message: String },
}

/// 生成语音响应
#[derive(Debug, Clone)]
pub struct GenerateSpeechResponse {
    pub format: AudioFormat,
    pub outcome: SpeechOutcome,
}

/// GenerateSpeech Handler
///
/// TTS 失败、超时或返回空音频时降级为 `Unavailable`，与漫画分析的容错策略一致
pub struct GenerateSpeechHandler {
    tts_engine: Arc<dyn TtsEnginePort>,
    timeout: Duration,
}

impl GenerateSpeechHandler {
    pub fn new(tts_engine: Arc<dyn TtsEnginePort>) -> Self {
        Self {
            tts_engine,
            timeout: DEFAULT_TTS_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn handle(
        &self,
        command: GenerateSpeech,
    ) -> Result<GenerateSpeechResponse, ApplicationError> {
        let request = SpeechRequest::parse(command.text, command.voice.as_deref(), command.speed)?;

        tracing::info!(
            text_len = request.text.as_str().len(),
            voice = %request.voice,
            speed = request.speed.value(),
            "Generating speech"
        );

        let outcome =
            match tokio::time::timeout(self.timeout, self.tts_engine.synthesize(&request)).await {
                Ok(Ok(audio)) if !audio.is_empty() => {
                    tracing::info!(audio_size = audio.len(), "Speech generated");
                    SpeechOutcome::Synthesized { audio }
                }
                Ok(Ok(_)) => {
                    tracing::warn!("TTS service returned empty audio");
                    unavailable()
                }
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "TTS service failed, returning placeholder");
                    unavailable()
                }
                Err(_) => {
                    tracing::warn!(
                        timeout_secs = self.timeout.as_secs_f64(),
                        "TTS service timed out, returning placeholder"
                    );
                    unavailable()
                }
            };

        Ok(GenerateSpeechResponse {
            format: AudioFormat::Mp3,
            outcome,
        })
    }
}

fn unavailable() -> SpeechOutcome {
    SpeechOutcome::Unavailable {
        message: SPEECH_UNAVAILABLE_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::TtsError;
    use crate::domain::speech::Voice;
    use crate::infrastructure::adapters::FakeTtsClient;

    fn command(text: &str) -> GenerateSpeech {
        GenerateSpeech {
            text: text.to_string(),
            voice: None,
            speed: None,
        }
    }

    #[tokio::test]
    async fn test_synthesized_audio_returned() {
        let tts = Arc::new(FakeTtsClient::responding(vec![0xFF, 0xFB, 0x90, 0x00]));
        let handler = GenerateSpeechHandler::new(tts.clone());

        let response = handler
            .handle(GenerateSpeech {
                text: "Hello world".to_string(),
                voice: Some("nova".to_string()),
                speed: Some(1.5),
            })
            .await
            .unwrap();

        assert_eq!(response.format, AudioFormat::Mp3);
        assert_eq!(
            response.outcome,
            SpeechOutcome::Synthesized {
                audio: vec![0xFF, 0xFB, 0x90, 0x00]
            }
        );

        let request = tts.last_request().unwrap();
        assert_eq!(request.voice, Voice::Nova);
        assert_eq!(request.speed.value(), 1.5);
    }

    #[tokio::test]
    async fn test_unavailable_tts_degrades() {
        let tts = Arc::new(FakeTtsClient::failing(TtsError::NetworkError(
            "unreachable".to_string(),
        )));
        let handler = GenerateSpeechHandler::new(tts);

        let response = handler.handle(command("Hello world")).await.unwrap();
        assert_eq!(response.format, AudioFormat::Mp3);
        assert_eq!(
            response.outcome,
            SpeechOutcome::Unavailable {
                message: SPEECH_UNAVAILABLE_MESSAGE.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_empty_audio_degrades() {
        let handler = GenerateSpeechHandler::new(Arc::new(FakeTtsClient::responding(Vec::new())));
        let response = handler.handle(command("Hello")).await.unwrap();
        assert!(matches!(response.outcome, SpeechOutcome::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_slow_tts_times_out() {
        let tts = Arc::new(
            FakeTtsClient::responding(vec![1, 2, 3]).with_delay(Duration::from_secs(5)),
        );
        let handler = GenerateSpeechHandler::new(tts).with_timeout(Duration::from_millis(20));

        let response = handler.handle(command("Hello")).await.unwrap();
        assert!(matches!(response.outcome, SpeechOutcome::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_invalid_requests_rejected() {
        let tts = Arc::new(FakeTtsClient::responding(vec![1]));
        let handler = GenerateSpeechHandler::new(tts.clone());

        let cases = [
            GenerateSpeech { text: String::new(), voice: None, speed: None },
            GenerateSpeech { text: "hi".to_string(), voice: Some("robot".to_string()), speed: None },
            GenerateSpeech { text: "hi".to_string(), voice: None, speed: Some(0.1) },
            GenerateSpeech { text: "hi".to_string(), voice: None, speed: Some(5.0) },
        ];

        for case in cases {
            let result = handler.handle(case).await;
            assert!(matches!(result, Err(ApplicationError::InvalidInput(_))));
        }
        assert!(tts.last_request().is_none());
    }
}
