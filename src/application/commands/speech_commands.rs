//! Speech Commands

/// 生成语音命令（voice / speed 缺省时使用默认值）
#[derive(Debug, Clone)]
pub struct GenerateSpeech {
    pub text: String,
    pub voice: Option<String>,
    pub speed: Option<f32>,
}
