//! TTS Adapter - TTS 客户端实现

mod fake_tts_client;
mod openai_tts_client;

pub use fake_tts_client::FakeTtsClient;
pub use openai_tts_client::*;
