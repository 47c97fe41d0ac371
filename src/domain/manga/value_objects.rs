//! Manga Context - Value Objects

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MangaError;

/// 漫画页唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(Uuid);

impl PageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 解析外部传入的 ID，非 UUID 格式返回 None
    pub fn parse(id: &str) -> Option<Self> {
        Uuid::parse_str(id.trim()).ok().map(Self)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 漫画页标题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageTitle(String);

impl PageTitle {
    pub fn new(title: impl Into<String>) -> Result<Self, MangaError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(MangaError::InvalidTitle("title cannot be empty"));
        }
        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PageTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 气泡包围盒（相对坐标）
///
/// 不变量:
/// - x / y / width / height 均为有限值且位于 [0, 1]
/// - 原点在左上角
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CoordinatesRepr")]
pub struct BubbleCoordinates {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[derive(Deserialize)]
struct CoordinatesRepr {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl TryFrom<CoordinatesRepr> for BubbleCoordinates {
    type Error = MangaError;

    fn try_from(repr: CoordinatesRepr) -> Result<Self, Self::Error> {
        Self::new(repr.x, repr.y, repr.width, repr.height)
    }
}

impl BubbleCoordinates {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self, MangaError> {
        for (name, value) in [("x", x), ("y", y), ("width", width), ("height", height)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(MangaError::InvalidCoordinates(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(Self { x, y, width, height })
    }

    /// 将有限值截断到 [0, 1]，非有限值视为无效
    ///
    /// 模型输出常见 1.02 之类的越界值
    pub fn clamped(x: f64, y: f64, width: f64, height: f64) -> Result<Self, MangaError> {
        let clamp = |name: &str, value: f64| {
            if value.is_finite() {
                Ok(value.clamp(0.0, 1.0))
            } else {
                Err(MangaError::InvalidCoordinates(format!(
                    "{} is not a finite number",
                    name
                )))
            }
        };
        Self::new(
            clamp("x", x)?,
            clamp("y", y)?,
            clamp("width", width)?,
            clamp("height", height)?,
        )
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

/// 朗读顺序（正整数，允许间隔）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct ReadingOrder(u32);

impl ReadingOrder {
    pub fn new(value: i64) -> Result<Self, MangaError> {
        if value < 1 || value > u32::MAX as i64 {
            return Err(MangaError::InvalidReadingOrder(value));
        }
        Ok(Self(value as u32))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for ReadingOrder {
    type Error = MangaError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReadingOrder> for u32 {
    fn from(order: ReadingOrder) -> Self {
        order.0
    }
}

/// 默认 MIME（无法识别时按 JPEG 处理）
const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// 客户端上传的图片载荷
///
/// `raw` 保存客户端原样提交的字符串（可能带 data-URI 前缀），持久化时不做重新编码；
/// `bytes` 为解码后的二进制，仅用于校验与 MIME 嗅探。
#[derive(Debug, Clone)]
pub struct ImagePayload {
    raw: String,
    encoded: String,
    bytes: Vec<u8>,
    mime_type: String,
}

impl ImagePayload {
    /// 解析图片载荷
    ///
    /// 存在逗号时剥离到第一个逗号（含）为止的前缀，其余部分按标准 base64 解码
    pub fn parse(raw: impl Into<String>) -> Result<Self, MangaError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(MangaError::InvalidImage("image data is empty".to_string()));
        }

        let (header, body) = match raw.split_once(',') {
            Some((header, body)) => (Some(header), body.trim()),
            None => (None, raw.trim()),
        };

        // `base64` CLI 等工具输出按 76 列换行
        let encoded: String = body
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();

        let bytes = BASE64
            .decode(&encoded)
            .map_err(|e| MangaError::InvalidImage(format!("base64 decode failed: {}", e)))?;
        if bytes.is_empty() {
            return Err(MangaError::InvalidImage(
                "decoded image is empty".to_string(),
            ));
        }

        let mime_type = header
            .and_then(mime_from_data_uri)
            .or_else(|| {
                infer::get(&bytes)
                    .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
                    .map(|kind| kind.mime_type())
            })
            .unwrap_or(DEFAULT_IMAGE_MIME)
            .to_string();

        Ok(Self {
            raw,
            encoded,
            bytes,
            mime_type,
        })
    }

    /// 客户端提交的原始字符串
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// 发送给视觉模型的 data-URI
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.encoded)
    }

    pub fn into_raw(self) -> String {
        self.raw
    }
}

fn mime_from_data_uri(header: &str) -> Option<&str> {
    let mime = header.strip_prefix("data:")?.split(';').next()?.trim();
    mime.starts_with("image/").then_some(mime)
}
