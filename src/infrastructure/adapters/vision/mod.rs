//! Vision Adapter - 视觉模型客户端实现

mod fake_vision_client;
mod openai_vision_client;

pub use fake_vision_client::FakeVisionClient;
pub use openai_vision_client::*;
