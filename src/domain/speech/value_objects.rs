//! Speech Context - Value Objects

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::SpeechError;

/// 合成音色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    #[default]
    Alloy,
    Echo,
    Fable,
    Onyx,
    Nova,
    Shimmer,
}

impl Voice {
    pub const ALL: [Voice; 6] = [
        Voice::Alloy,
        Voice::Echo,
        Voice::Fable,
        Voice::Onyx,
        Voice::Nova,
        Voice::Shimmer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Alloy => "alloy",
            Voice::Echo => "echo",
            Voice::Fable => "fable",
            Voice::Onyx => "onyx",
            Voice::Nova => "nova",
            Voice::Shimmer => "shimmer",
        }
    }
}

impl FromStr for Voice {
    type Err = SpeechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Voice::ALL
            .into_iter()
            .find(|voice| voice.as_str() == needle)
            .ok_or_else(|| SpeechError::UnknownVoice(s.to_string()))
    }
}

impl std::fmt::Display for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 语速 (0.25 - 4.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SpeechSpeed(f32);

impl SpeechSpeed {
    pub const MIN: f32 = 0.25;
    pub const MAX: f32 = 4.0;

    pub fn new(value: f32) -> Result<Self, SpeechError> {
        if !value.is_finite() || !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(SpeechError::SpeedOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl Default for SpeechSpeed {
    fn default() -> Self {
        Self(1.0)
    }
}

/// 朗读文本
///
/// 只要求非空；长度限制由 TTS 服务决定，超限时按服务不可用降级
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechText(String);

impl SpeechText {
    pub fn new(text: impl Into<String>) -> Result<Self, SpeechError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 音频输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
        }
    }
}

/// 已校验的合成请求
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub text: SpeechText,
    pub voice: Voice,
    pub speed: SpeechSpeed,
}

impl SpeechRequest {
    /// 校验原始参数；`voice` / `speed` 缺省时使用 alloy / 1.0
    pub fn parse(text: String, voice: Option<&str>, speed: Option<f32>) -> Result<Self, SpeechError> {
        let text = SpeechText::new(text)?;
        let voice = match voice {
            Some(v) => v.parse()?,
            None => Voice::default(),
        };
        let speed = match speed {
            Some(s) => SpeechSpeed::new(s)?,
            None => SpeechSpeed::default(),
        };
        Ok(Self { text, voice, speed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_parse() {
        assert_eq!("alloy".parse::<Voice>().unwrap(), Voice::Alloy);
        assert_eq!("Nova".parse::<Voice>().unwrap(), Voice::Nova);
        assert!(matches!(
            "robot".parse::<Voice>(),
            Err(SpeechError::UnknownVoice(_))
        ));
    }

    #[test]
    fn test_speed_bounds() {
        assert!(SpeechSpeed::new(0.25).is_ok());
        assert!(SpeechSpeed::new(4.0).is_ok());
        assert!(SpeechSpeed::new(0.1).is_err());
        assert!(SpeechSpeed::new(5.0).is_err());
        assert!(SpeechSpeed::new(f32::NAN).is_err());
    }

    #[test]
    fn test_request_defaults() {
        let request = SpeechRequest::parse("Hello world".to_string(), None, None).unwrap();
        assert_eq!(request.voice, Voice::Alloy);
        assert_eq!(request.speed.value(), 1.0);
        assert_eq!(request.text.as_str(), "Hello world");
    }

    #[test]
    fn test_request_rejects_blank_text() {
        assert_eq!(
            SpeechRequest::parse("  ".to_string(), None, None).unwrap_err(),
            SpeechError::EmptyText
        );
    }

    #[test]
    fn test_long_text_accepted() {
        let text = "a".repeat(5000);
        assert_eq!(SpeechText::new(text.clone()).unwrap().as_str(), text);
    }
}
