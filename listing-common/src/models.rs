use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 文档创建时间字段，由存储端写入
pub const CREATED_AT: &str = "createdAt";

/// 枚举字段的哨兵值 - 表示使用自定义标签
pub const OTHER: &str = "Other";

/// 文档字段值 - 与托管文档库的字段类型一一对应
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Array(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// 文本值
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// 数值，文本形式的数字也会被解析
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Double(d) => Some(*d),
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// 时间戳 - 接受原生时间戳、RFC 3339 文本和毫秒时间戳
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(ts) => Some(*ts),
            FieldValue::Text(s) => DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            FieldValue::Integer(millis) => DateTime::from_timestamp_millis(*millis),
            FieldValue::Map(map) => timestamp_from_parts(
                map.get("seconds").or_else(|| map.get("_seconds")),
                map.get("nanoseconds").or_else(|| map.get("_nanoseconds")),
            ),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            FieldValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

// {seconds, nanoseconds} 形式的时间戳
fn timestamp_from_parts(
    seconds: Option<&FieldValue>,
    nanos: Option<&FieldValue>,
) -> Option<DateTime<Utc>> {
    let seconds = match seconds? {
        FieldValue::Integer(s) => *s,
        FieldValue::Double(s) => *s as i64,
        _ => return None,
    };
    let nanos = match nanos {
        Some(FieldValue::Integer(n)) => u32::try_from(*n).ok()?,
        Some(FieldValue::Double(n)) => *n as u32,
        None => 0,
        _ => return None,
    };
    DateTime::from_timestamp(seconds, nanos)
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => FieldValue::Double(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => FieldValue::Text(s),
            Value::Array(items) => FieldValue::Array(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                let converted: BTreeMap<String, FieldValue> =
                    map.into_iter().map(|(k, v)| (k, v.into())).collect();

                // 序列化后的时间戳对象只有秒和纳秒两个键
                let is_timestamp = converted.len() == 2
                    && ((converted.contains_key("seconds") && converted.contains_key("nanoseconds"))
                        || (converted.contains_key("_seconds")
                            && converted.contains_key("_nanoseconds")));

                if is_timestamp {
                    let map = FieldValue::Map(converted);
                    match map.as_timestamp() {
                        Some(ts) => FieldValue::Timestamp(ts),
                        None => map,
                    }
                } else {
                    FieldValue::Map(converted)
                }
            }
        }
    }
}

/// 原始文档 - 存储端返回的 id 与字段集合，任何字段都可能缺失
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct RawDocument {
    /// 存储端分配的文档标识
    pub id: String,
    /// 字段集合
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl RawDocument {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// 从 JSON 对象构建文档
    pub fn from_json(id: impl Into<String>, fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            id: id.into(),
            fields: fields.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }

    /// 链式设置字段，主要用于测试和导入
    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// 文本字段，去除首尾空白后为空视为缺失
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(FieldValue::as_text)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// 文本字段，缺失时使用默认值
    pub fn text_or(&self, name: &str, default: &str) -> String {
        self.text(name).unwrap_or(default).to_string()
    }

    pub fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        self.get(name).and_then(FieldValue::as_timestamp)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp(CREATED_AT)
    }

    /// 字符串列表字段；字段缺失或不是数组时返回 None，非文本元素被跳过
    pub fn string_list(&self, name: &str) -> Option<Vec<String>> {
        let items = self.get(name)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(FieldValue::as_text)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// 对象列表字段，非对象元素被跳过
    pub fn map_list(&self, name: &str) -> Vec<&BTreeMap<String, FieldValue>> {
        self.get(name)
            .and_then(FieldValue::as_array)
            .map(|items| items.iter().filter_map(FieldValue::as_map).collect())
            .unwrap_or_default()
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Double(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::Array(value.into_iter().map(FieldValue::Text).collect())
    }
}

/// 可筛选的属性
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Industry,
    Topic,
    Service,
}

impl Facet {
    pub const ALL: [Facet; 3] = [Facet::Industry, Facet::Topic, Facet::Service];

    /// 枚举值所在字段
    pub fn field(self) -> &'static str {
        match self {
            Facet::Industry => "industry",
            Facet::Topic => "topic",
            Facet::Service => "service",
        }
    }

    /// 自定义标签所在字段
    pub fn custom_field(self) -> &'static str {
        match self {
            Facet::Industry => "customIndustry",
            Facet::Topic => "customTopic",
            Facet::Service => "customService",
        }
    }

    pub fn from_name(name: &str) -> Option<Facet> {
        match name.trim().to_ascii_lowercase().as_str() {
            "industry" | "industries" => Some(Facet::Industry),
            "topic" | "topics" => Some(Facet::Topic),
            "service" | "services" => Some(Facet::Service),
            _ => None,
        }
    }
}

/// 合并枚举值与自定义标签，得到用于展示和筛选的值
pub fn resolve_display(enum_value: Option<&str>, custom: Option<&str>) -> String {
    let enum_value = enum_value.map(str::trim).unwrap_or("");
    let custom = custom.map(str::trim).unwrap_or("");

    if enum_value == OTHER && !custom.is_empty() {
        custom.to_string()
    } else {
        enum_value.to_string()
    }
}

/// 已解析的三个筛选属性值，空字符串表示该属性缺失
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedFacets {
    pub industry: String,
    pub topic: String,
    pub service: String,
}

impl ResolvedFacets {
    pub fn from_document(doc: &RawDocument) -> Self {
        let resolve = |facet: Facet| {
            resolve_display(doc.text(facet.field()), doc.text(facet.custom_field()))
        };

        Self {
            industry: resolve(Facet::Industry),
            topic: resolve(Facet::Topic),
            service: resolve(Facet::Service),
        }
    }

    pub fn get(&self, facet: Facet) -> &str {
        match facet {
            Facet::Industry => &self.industry,
            Facet::Topic => &self.topic,
            Facet::Service => &self.service,
        }
    }

    /// 非空的属性值，按 industry、topic、service 顺序去重
    pub fn values(&self) -> Vec<String> {
        let mut values: Vec<String> = Vec::with_capacity(3);
        for facet in Facet::ALL {
            let value = self.get(facet);
            if !value.is_empty() && !values.iter().any(|v| v == value) {
                values.push(value.to_string());
            }
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn other_with_custom_label_resolves_to_label() {
        assert_eq!(resolve_display(Some("Other"), Some("Foo")), "Foo");
        assert_eq!(resolve_display(Some("Banking"), Some("Foo")), "Banking");
        assert_eq!(resolve_display(Some("Other"), Some("  ")), "Other");
        assert_eq!(resolve_display(Some(""), Some("Foo")), "");
        assert_eq!(resolve_display(None, None), "");
    }

    #[test]
    fn facets_resolve_from_document_fields() {
        let doc = RawDocument::new("a")
            .with("industry", "Other")
            .with("customIndustry", "Robotics")
            .with("topic", "Cloud")
            .with("customTopic", "ignored");

        let facets = ResolvedFacets::from_document(&doc);
        assert_eq!(facets.industry, "Robotics");
        assert_eq!(facets.topic, "Cloud");
        assert_eq!(facets.service, "");
        assert_eq!(facets.values(), vec!["Robotics".to_string(), "Cloud".to_string()]);
    }

    #[test]
    fn json_timestamp_objects_become_timestamps() {
        let value: FieldValue = json!({"seconds": 1_700_000_000, "nanoseconds": 0}).into();
        assert_eq!(
            value,
            FieldValue::Timestamp(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
        );

        let admin: FieldValue = json!({"_seconds": 1_700_000_000, "_nanoseconds": 5}).into();
        assert!(matches!(admin, FieldValue::Timestamp(_)));

        let plain: FieldValue = json!({"seconds": 1, "label": "x"}).into();
        assert!(matches!(plain, FieldValue::Map(_)));
    }

    #[test]
    fn timestamps_accept_text_and_millis() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let text = FieldValue::Text("2024-03-01T12:00:00Z".into());
        let millis = FieldValue::Integer(expected.timestamp_millis());

        assert_eq!(text.as_timestamp(), Some(expected));
        assert_eq!(millis.as_timestamp(), Some(expected));
        assert_eq!(FieldValue::Bool(true).as_timestamp(), None);
    }

    #[test]
    fn missing_and_malformed_fields_default() {
        let doc = RawDocument::from_json(
            "x",
            json!({"title": "   ", "tags": "not-a-list", "numbers": [1, {"label": "a"}]})
                .as_object()
                .cloned()
                .unwrap(),
        );

        assert_eq!(doc.text("title"), None);
        assert_eq!(doc.text_or("authorName", "Anonymous"), "Anonymous");
        assert_eq!(doc.string_list("tags"), None);
        assert_eq!(doc.map_list("numbers").len(), 1);
        assert_eq!(doc.created_at(), None);
    }

    #[test]
    fn facet_names_parse() {
        assert_eq!(Facet::from_name("Industries"), Some(Facet::Industry));
        assert_eq!(Facet::from_name("topic"), Some(Facet::Topic));
        assert_eq!(Facet::from_name("colour"), None);
    }
}
