//! 气泡响应归一化
//!
//! 将视觉模型返回的自由文本解析为按朗读顺序排列的对话气泡。
//! 模型输出不可信：先尝试结构化提取并逐条校验，失败时退回固定的占位气泡，
//! 本模块对任意输入都不会失败。

use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;

use super::manga::{BubbleCoordinates, MangaError, ReadingOrder, SpeechBubble};

/// 结构化载荷中气泡列表的键名（与对外 JSON 格式保持一致）
pub const BUBBLES_KEY: &str = "speech_bubbles";

/// 归一化结果来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleSource {
    /// 来自模型输出
    Model,
    /// 使用占位气泡
    Fallback(FallbackReason),
}

/// 退回占位气泡的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// 视觉服务不可用，没有任何输出
    NoResponse,
    /// 输出中找不到可解析的结构化载荷
    Unparseable,
    /// 载荷可解析，但没有一条合法气泡
    NoValidEntries,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::NoResponse => "no_response",
            FallbackReason::Unparseable => "unparseable",
            FallbackReason::NoValidEntries => "no_valid_entries",
        }
    }
}

/// 归一化输出
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBubbles {
    pub bubbles: Vec<SpeechBubble>,
    pub source: BubbleSource,
}

impl NormalizedBubbles {
    fn fallback(reason: FallbackReason) -> Self {
        Self {
            bubbles: fallback_bubbles(reason),
            source: BubbleSource::Fallback(reason),
        }
    }
}

/// 占位气泡定义: (id, text, [x, y, width, height], reading_order)
type FallbackSpec = (&'static str, &'static str, [f64; 4], i64);

/// 视觉服务不可用时的演示气泡
const NO_RESPONSE_BUBBLES: &[FallbackSpec] = &[
    (
        "fallback-1",
        "Welcome to the immersive manga experience! Upload your manga images to get started.",
        [0.1, 0.1, 0.8, 0.2],
        1,
    ),
    (
        "fallback-2",
        "This is a demo speech bubble showing the highlighting feature.",
        [0.1, 0.4, 0.7, 0.15],
        2,
    ),
];

/// 模型有输出但无法使用时的示例气泡
const UNUSABLE_RESPONSE_BUBBLES: &[FallbackSpec] = &[(
    "fallback-1",
    "Sample speech bubble text detected",
    [0.2, 0.3, 0.3, 0.1],
    1,
)];

/// 单条气泡被丢弃的原因（仅用于日志）
#[derive(Debug, Error)]
enum EntryRejection {
    #[error("entry is not an object")]
    NotAnObject,

    #[error("missing or malformed field `{0}`")]
    Missing(&'static str),

    #[error("duplicate bubble id `{0}`")]
    DuplicateId(String),

    #[error(transparent)]
    Invalid(#[from] MangaError),
}

/// 归一化视觉模型输出
///
/// - `None` 表示视觉服务调用失败
/// - 结构化提取：取第一个 `{` 到最后一个 `}` 之间的内容按 JSON 解析，
///   读取 `speech_bubbles` 列表，逐条校验，不合法的条目直接丢弃
/// - 结果按 `reading_order` 稳定排序（相同顺序保持模型输出顺序）
pub fn normalize_bubbles(raw: Option<&str>) -> NormalizedBubbles {
    let Some(raw) = raw else {
        return NormalizedBubbles::fallback(FallbackReason::NoResponse);
    };

    let Some(entries) = extract_entries(raw) else {
        tracing::warn!(
            response_len = raw.len(),
            "Vision response has no parseable bubble payload, using fallback"
        );
        return NormalizedBubbles::fallback(FallbackReason::Unparseable);
    };

    let total = entries.len();
    let mut seen_ids = HashSet::new();
    let mut bubbles: Vec<SpeechBubble> = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match parse_entry(entry, &mut seen_ids) {
            Ok(bubble) => Some(bubble),
            Err(reason) => {
                tracing::debug!(index, reason = %reason, "Dropping bubble entry");
                None
            }
        })
        .collect();

    if bubbles.is_empty() {
        tracing::warn!(entries = total, "Vision response has no valid bubbles, using fallback");
        return NormalizedBubbles::fallback(FallbackReason::NoValidEntries);
    }

    // sort_by_key 为稳定排序
    bubbles.sort_by_key(SpeechBubble::reading_order);

    tracing::debug!(entries = total, kept = bubbles.len(), "Bubbles normalized");

    NormalizedBubbles {
        bubbles,
        source: BubbleSource::Model,
    }
}

/// 固定的占位气泡，多次调用结果完全一致
pub fn fallback_bubbles(reason: FallbackReason) -> Vec<SpeechBubble> {
    let specs = match reason {
        FallbackReason::NoResponse => NO_RESPONSE_BUBBLES,
        FallbackReason::Unparseable | FallbackReason::NoValidEntries => UNUSABLE_RESPONSE_BUBBLES,
    };

    specs
        .iter()
        .filter_map(|&(id, text, [x, y, width, height], order)| {
            let coordinates = BubbleCoordinates::new(x, y, width, height).ok()?;
            let reading_order = ReadingOrder::new(order).ok()?;
            SpeechBubble::new(id, text, coordinates, reading_order).ok()
        })
        .collect()
}

/// 定位结构化载荷并取出气泡列表
fn extract_entries(raw: &str) -> Option<Vec<Value>> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }

    let payload: Value = serde_json::from_str(&raw[start..=end]).ok()?;
    match payload {
        Value::Object(mut map) => match map.remove(BUBBLES_KEY)? {
            Value::Array(entries) => Some(entries),
            _ => None,
        },
        _ => None,
    }
}

fn parse_entry(
    entry: &Value,
    seen_ids: &mut HashSet<String>,
) -> Result<SpeechBubble, EntryRejection> {
    let entry = entry.as_object().ok_or(EntryRejection::NotAnObject)?;

    let id = match entry.get("id") {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => n.to_string(),
        _ => return Err(EntryRejection::Missing("id")),
    };

    let text = entry
        .get("text")
        .and_then(Value::as_str)
        .ok_or(EntryRejection::Missing("text"))?;

    let coordinates = parse_coordinates(entry)?;
    let reading_order = parse_reading_order(entry)?;

    let bubble = SpeechBubble::new(id, text, coordinates, reading_order)?;
    if !seen_ids.insert(bubble.id().to_string()) {
        return Err(EntryRejection::DuplicateId(bubble.id().to_string()));
    }

    Ok(bubble)
}

fn parse_coordinates(entry: &Map<String, Value>) -> Result<BubbleCoordinates, EntryRejection> {
    let coords = entry
        .get("coordinates")
        .and_then(Value::as_object)
        .ok_or(EntryRejection::Missing("coordinates"))?;

    let field = |name: &'static str| {
        coords
            .get(name)
            .and_then(Value::as_f64)
            .ok_or(EntryRejection::Missing(name))
    };

    Ok(BubbleCoordinates::clamped(
        field("x")?,
        field("y")?,
        field("width")?,
        field("height")?,
    )?)
}

fn parse_reading_order(entry: &Map<String, Value>) -> Result<ReadingOrder, EntryRejection> {
    let value = entry
        .get("reading_order")
        .ok_or(EntryRejection::Missing("reading_order"))?;

    let order = match value.as_i64() {
        Some(n) => n,
        None => match value.as_f64() {
            Some(f) if f.is_finite() && f.fract() == 0.0 => f as i64,
            _ => return Err(EntryRejection::Missing("reading_order")),
        },
    };

    Ok(ReadingOrder::new(order)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders(result: &NormalizedBubbles) -> Vec<u32> {
        result
            .bubbles
            .iter()
            .map(|b| b.reading_order().value())
            .collect()
    }

    #[test]
    fn test_well_formed_response_sorted_by_reading_order() {
        let raw = r#"Here are the bubbles:
```json
{
  "speech_bubbles": [
    {"id": "b3", "text": "third", "coordinates": {"x": 0.1, "y": 0.7, "width": 0.2, "height": 0.1}, "reading_order": 3},
    {"id": "b1", "text": "first", "coordinates": {"x": 0.7, "y": 0.1, "width": 0.2, "height": 0.1}, "reading_order": 1},
    {"id": "b2", "text": "second", "coordinates": {"x": 0.4, "y": 0.3, "width": 0.2, "height": 0.1}, "reading_order": 2}
  ]
}
```"#;

        let result = normalize_bubbles(Some(raw));
        assert_eq!(result.source, BubbleSource::Model);
        assert_eq!(orders(&result), vec![1, 2, 3]);

        let first = &result.bubbles[0];
        assert_eq!(first.id(), "b1");
        assert_eq!(first.text(), "first");
        assert_eq!(first.coordinates().x(), 0.7);
        assert_eq!(first.coordinates().height(), 0.1);
    }

    #[test]
    fn test_ties_keep_emission_order() {
        let raw = r#"{"speech_bubbles": [
            {"id": "a", "text": "", "coordinates": {"x": 0, "y": 0, "width": 0.1, "height": 0.1}, "reading_order": 2},
            {"id": "b", "text": "", "coordinates": {"x": 0, "y": 0, "width": 0.1, "height": 0.1}, "reading_order": 1},
            {"id": "c", "text": "", "coordinates": {"x": 0, "y": 0, "width": 0.1, "height": 0.1}, "reading_order": 2}
        ]}"#;

        let result = normalize_bubbles(Some(raw));
        let ids: Vec<&str> = result.bubbles.iter().map(|b| b.id()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_invalid_entries_dropped() {
        let raw = r#"{"speech_bubbles": [
            {"id": "ok", "text": "kept", "coordinates": {"x": 0.1, "y": 0.1, "width": 0.1, "height": 0.1}, "reading_order": 5},
            {"id": "no-text", "coordinates": {"x": 0.1, "y": 0.1, "width": 0.1, "height": 0.1}, "reading_order": 1},
            {"id": "no-coords", "text": "x", "reading_order": 2},
            {"id": "partial-coords", "text": "x", "coordinates": {"x": 0.1, "y": 0.1}, "reading_order": 2},
            {"id": "zero-order", "text": "x", "coordinates": {"x": 0.1, "y": 0.1, "width": 0.1, "height": 0.1}, "reading_order": 0},
            {"text": "no id", "coordinates": {"x": 0.1, "y": 0.1, "width": 0.1, "height": 0.1}, "reading_order": 3},
            "not an object"
        ]}"#;

        let result = normalize_bubbles(Some(raw));
        assert_eq!(result.source, BubbleSource::Model);
        assert_eq!(result.bubbles.len(), 1);
        assert_eq!(result.bubbles[0].id(), "ok");
        assert_eq!(result.bubbles[0].reading_order().value(), 5);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let raw = r#"{"speech_bubbles": [
            {"id": "same", "text": "one", "coordinates": {"x": 0.1, "y": 0.1, "width": 0.1, "height": 0.1}, "reading_order": 1},
            {"id": "same", "text": "two", "coordinates": {"x": 0.1, "y": 0.1, "width": 0.1, "height": 0.1}, "reading_order": 2}
        ]}"#;

        let result = normalize_bubbles(Some(raw));
        assert_eq!(result.bubbles.len(), 1);
        assert_eq!(result.bubbles[0].text(), "one");
    }

    #[test]
    fn test_lenient_field_types() {
        let raw = r#"{"speech_bubbles": [
            {"id": 7, "text": "numeric id", "coordinates": {"x": -0.01, "y": 0.5, "width": 1.02, "height": 0.2}, "reading_order": 1.0}
        ]}"#;

        let result = normalize_bubbles(Some(raw));
        assert_eq!(result.source, BubbleSource::Model);
        let bubble = &result.bubbles[0];
        assert_eq!(bubble.id(), "7");
        assert_eq!(bubble.coordinates().x(), 0.0);
        assert_eq!(bubble.coordinates().width(), 1.0);
        assert_eq!(bubble.reading_order().value(), 1);
    }

    #[test]
    fn test_no_response_fallback() {
        let result = normalize_bubbles(None);
        assert_eq!(result.source, BubbleSource::Fallback(FallbackReason::NoResponse));
        assert_eq!(result.bubbles.len(), 2);
        assert_eq!(result.bubbles[0].id(), "fallback-1");
        assert!(result.bubbles[0].text().starts_with("Welcome to the immersive manga experience"));
        assert_eq!(orders(&result), vec![1, 2]);
    }

    #[test]
    fn test_garbage_fallback() {
        for raw in ["", "   ", "I could not find any speech bubbles.", "} backwards {", "{not json}"] {
            let result = normalize_bubbles(Some(raw));
            assert_eq!(
                result.source,
                BubbleSource::Fallback(FallbackReason::Unparseable),
                "input: {raw:?}"
            );
            assert_eq!(result.bubbles.len(), 1);
            assert_eq!(result.bubbles[0].text(), "Sample speech bubble text detected");
        }
    }

    #[test]
    fn test_missing_key_is_unparseable() {
        let result = normalize_bubbles(Some(r#"{"bubbles": []}"#));
        assert_eq!(result.source, BubbleSource::Fallback(FallbackReason::Unparseable));
    }

    #[test]
    fn test_empty_list_falls_back() {
        let result = normalize_bubbles(Some(r#"{"speech_bubbles": []}"#));
        assert_eq!(result.source, BubbleSource::Fallback(FallbackReason::NoValidEntries));
        assert!(!result.bubbles.is_empty());
    }

    #[test]
    fn test_fallback_is_deterministic() {
        assert_eq!(normalize_bubbles(None), normalize_bubbles(None));
        assert_eq!(normalize_bubbles(Some("garbage")), normalize_bubbles(Some("garbage")));
    }

    #[test]
    fn test_all_coordinates_within_unit_range() {
        let inputs = [
            None,
            Some("garbage"),
            Some(r#"{"speech_bubbles": [{"id": "a", "text": "t", "coordinates": {"x": 3.0, "y": -2.0, "width": 0.5, "height": 9.9}, "reading_order": 1}]}"#),
        ];

        for raw in inputs {
            for bubble in normalize_bubbles(raw).bubbles {
                let c = bubble.coordinates();
                for value in [c.x(), c.y(), c.width(), c.height()] {
                    assert!((0.0..=1.0).contains(&value));
                }
            }
        }
    }
}
