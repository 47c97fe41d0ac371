//! Speech Context - 语音合成限界上下文
//!
//! 职责:
//! - 朗读文本、音色、语速的校验
//! - 输出音频格式

mod errors;
mod value_objects;

pub use errors::SpeechError;
pub use value_objects::{AudioFormat, SpeechRequest, SpeechSpeed, SpeechText, Voice};
