//! 脱敏序列化（Redacting Serializer）
//!
//! 将任意可序列化的值输出为 JSON，并把配置中列出的字段值替换为固定占位符 [`PLACEHOLDER`]。
//!
//! 输出在序列化过程中流式完成（见 [`Redacted`]），未命中的部分与 `serde_json::to_string` 逐字节一致；
//! 已是 `serde_json::Value` 的数据可直接用 [`RedactingSerializer::redact_value`]。
//!
//! - 字段名匹配区分大小写；
//! - 默认仅处理根对象的顶层字段（[`RedactionDepth::Shallow`]），嵌套对象原样输出；
//! - 根为标量或数组时原样输出；
//! - 只写不读：[`RedactingSerializer::deserialize`] 总是返回 [`RedactionError::Unsupported`]。
//!
use crate::error::RedactionError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

mod writer;

pub use writer::Redacted;
use writer::Rules;

/// 被脱敏字段的固定占位符
pub const PLACEHOLDER: &str = "---";

/// 默认脱敏字段
pub const DEFAULT_REDACT_FIELDS: &[&str] = &["password", "Password"];

/// 脱敏深度
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedactionDepth {
    /// 仅根对象的顶层字段
    #[default]
    Shallow,
    /// 任意层级的对象（包括数组中的对象）
    Recursive,
}

/// 需要脱敏的字段名集合
///
/// 启动时构建一次，之后只读共享。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedactionSet {
    fields: HashSet<String>,
}

impl RedactionSet {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            fields: HashSet::new(),
        }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }
}

impl Default for RedactionSet {
    fn default() -> Self {
        Self::new(DEFAULT_REDACT_FIELDS.iter().copied())
    }
}

impl<S: Into<String>> FromIterator<S> for RedactionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// 脱敏序列化器
#[derive(Clone, Debug, Default)]
pub struct RedactingSerializer {
    fields: RedactionSet,
    depth: RedactionDepth,
}

impl RedactingSerializer {
    pub fn new(fields: RedactionSet) -> Self {
        Self {
            fields,
            depth: RedactionDepth::Shallow,
        }
    }

    pub fn with_depth(mut self, depth: RedactionDepth) -> Self {
        self.depth = depth;
        self
    }

    pub fn fields(&self) -> &RedactionSet {
        &self.fields
    }

    pub fn depth(&self) -> RedactionDepth {
        self.depth
    }

    /// 包装 `value`，序列化时按当前规则脱敏
    pub fn redacted<'a, T>(&'a self, value: &'a T) -> Redacted<'a, T>
    where
        T: Serialize + ?Sized,
    {
        Redacted::new(
            value,
            Rules {
                fields: &self.fields,
                recursive: self.depth == RedactionDepth::Recursive,
            },
        )
    }

    /// 转换为脱敏后的 JSON 树；不修改调用方的值
    ///
    /// 数值精度受 `serde_json::Value` 限制，日志输出请用 [`Self::serialize`]。
    pub fn to_redacted_value<T>(&self, value: &T) -> Result<Value, RedactionError>
    where
        T: Serialize + ?Sized,
    {
        Ok(serde_json::to_value(self.redacted(value))?)
    }

    /// 输出脱敏后的紧凑 JSON 文本
    pub fn serialize<T>(&self, value: &T) -> Result<String, RedactionError>
    where
        T: Serialize + ?Sized,
    {
        if self.fields.is_empty() {
            return Ok(serde_json::to_string(value)?);
        }
        Ok(serde_json::to_string(&self.redacted(value))?)
    }

    /// 对已有的 JSON 树应用脱敏规则（幂等）
    pub fn redact_value(&self, value: Value) -> Value {
        if self.fields.is_empty() {
            return value;
        }

        match (self.depth, value) {
            (RedactionDepth::Shallow, Value::Object(map)) => {
                Value::Object(self.redact_fields(map, false))
            }
            (RedactionDepth::Recursive, value) => self.redact_recursive(value),
            (_, other) => other,
        }
    }

    /// 只写不读
    pub fn deserialize(&self, _text: &str) -> Result<Value, RedactionError> {
        Err(RedactionError::Unsupported {
            operation: "deserialize",
        })
    }

    fn redact_fields(&self, mut map: Map<String, Value>, recurse: bool) -> Map<String, Value> {
        for (name, value) in map.iter_mut() {
            if self.fields.contains(name) {
                *value = Value::String(PLACEHOLDER.to_string());
            } else if recurse {
                *value = self.redact_recursive(value.take());
            }
        }
        map
    }

    fn redact_recursive(&self, value: Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(self.redact_fields(map, true)),
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|v| self.redact_recursive(v))
                    .collect(),
            ),
            other => other,
        }
    }
}

/// 以浅层规则序列化 `value`，`fields` 中列出的顶层字段被替换为 [`PLACEHOLDER`]
pub fn serialize_redacted<T>(value: &T, fields: &RedactionSet) -> Result<String, RedactionError>
where
    T: Serialize + ?Sized,
{
    RedactingSerializer::new(fields.clone()).serialize(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::{Error as _, Serializer};
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Login {
        username: String,
        password: String,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Post {
        title: String,
        body: String,
    }

    #[derive(Serialize)]
    struct Nested {
        name: String,
        credentials: Inner,
        history: Vec<Inner>,
    }

    #[derive(Serialize)]
    struct Inner {
        password: String,
    }

    fn nested() -> Nested {
        Nested {
            name: "svc".into(),
            credentials: Inner {
                password: "s3cret".into(),
            },
            history: vec![Inner {
                password: "old".into(),
            }],
        }
    }

    fn only(field: &str) -> RedactionSet {
        RedactionSet::new([field])
    }

    #[test]
    fn redacts_top_level_password() {
        let cmd = Login {
            username: "alice".into(),
            password: "hunter2".into(),
        };
        let out = serialize_redacted(&cmd, &only("Password")).unwrap();
        assert_eq!(out, r#"{"Username":"alice","Password":"---"}"#);
        assert!(!out.contains("hunter2"));
    }

    #[test]
    fn leaves_non_matching_fields_alone() {
        let cmd = Post {
            title: "Hello".into(),
            body: "World".into(),
        };
        let out = serialize_redacted(&cmd, &only("Password")).unwrap();
        assert_eq!(out, r#"{"Title":"Hello","Body":"World"}"#);
        assert_eq!(out, serde_json::to_string(&cmd).unwrap());
    }

    #[test]
    fn matching_is_case_sensitive() {
        let cmd = Login {
            username: "alice".into(),
            password: "hunter2".into(),
        };
        let out = serialize_redacted(&cmd, &only("password")).unwrap();
        assert!(out.contains("hunter2"));
    }

    #[test]
    fn scalars_and_arrays_are_untouched() {
        let set = only("password");
        assert_eq!(serialize_redacted(&42, &set).unwrap(), "42");
        assert_eq!(serialize_redacted("password", &set).unwrap(), r#""password""#);

        let arr = json!([{ "password": "x" }, 1, "two"]);
        assert_eq!(
            serialize_redacted(&arr, &set).unwrap(),
            serde_json::to_string(&arr).unwrap()
        );
    }

    #[test]
    fn shallow_mode_keeps_nested_objects() {
        let out = serialize_redacted(&nested(), &only("password")).unwrap();
        assert!(out.contains("s3cret"));
        assert!(out.contains("old"));
    }

    #[test]
    fn recursive_mode_reaches_nested_objects_and_arrays() {
        let ser = RedactingSerializer::new(only("password")).with_depth(RedactionDepth::Recursive);
        let v = ser.to_redacted_value(&nested()).unwrap();
        assert_eq!(
            v,
            json!({
                "name": "svc",
                "credentials": { "password": "---" },
                "history": [{ "password": "---" }]
            })
        );

        let arr = ser.to_redacted_value(&vec![Inner {
            password: "p".into(),
        }])
        .unwrap();
        assert_eq!(arr, json!([{ "password": "---" }]));
    }

    #[test]
    fn whole_nested_value_is_replaced_when_name_matches() {
        let out = serialize_redacted(&nested(), &only("credentials")).unwrap();
        assert_eq!(
            out,
            r#"{"name":"svc","credentials":"---","history":[{"password":"old"}]}"#
        );
    }

    #[test]
    fn empty_set_equals_plain_serialization() {
        let cmd = Login {
            username: "alice".into(),
            password: "hunter2".into(),
        };
        let out = serialize_redacted(&cmd, &RedactionSet::empty()).unwrap();
        assert_eq!(out, serde_json::to_string(&cmd).unwrap());
    }

    #[test]
    fn redaction_is_idempotent() {
        let ser = RedactingSerializer::default();
        let first = ser
            .serialize(&json!({ "user": "bob", "password": "pw" }))
            .unwrap();
        let reparsed: Value = serde_json::from_str(&first).unwrap();
        let second = ser.serialize(&reparsed).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, r#"{"user":"bob","password":"---"}"#);
    }

    #[test]
    fn caller_value_is_not_mutated() {
        let input = json!({ "password": "pw" });
        let ser = RedactingSerializer::default();
        let _ = ser.serialize(&input).unwrap();
        assert_eq!(input["password"], "pw");
    }

    #[test]
    fn non_string_map_keys_fail_with_serialization_error() {
        let mut m: HashMap<(u8, u8), u8> = HashMap::new();
        m.insert((1, 2), 3);
        let err = RedactingSerializer::default().serialize(&m).unwrap_err();
        assert!(matches!(err, RedactionError::Serialization(_)));
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _s: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("no conversion"))
        }
    }

    #[test]
    fn custom_serialize_failure_is_reported() {
        let err = RedactingSerializer::default()
            .serialize(&Unserializable)
            .unwrap_err();
        match err {
            RedactionError::Serialization(e) => assert!(e.to_string().contains("no conversion")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn deserialize_is_unsupported() {
        let err = RedactingSerializer::default()
            .deserialize(r#"{"password":"---"}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            RedactionError::Unsupported {
                operation: "deserialize"
            }
        ));
    }

    #[test]
    fn default_set_covers_both_casings() {
        let set = RedactionSet::default();
        assert!(set.contains("password"));
        assert!(set.contains("Password"));
        assert!(!set.contains("PASSWORD"));
        assert_eq!(set.len(), 2);
    }

    #[derive(Serialize)]
    struct Reading {
        sensor: String,
        value: f32,
    }

    #[test]
    fn float_fields_match_plain_serialization() {
        let reading = Reading {
            sensor: "t1".into(),
            value: 0.1,
        };
        let out = serialize_redacted(&reading, &only("password")).unwrap();
        assert_eq!(out, serde_json::to_string(&reading).unwrap());
        assert_eq!(out, r#"{"sensor":"t1","value":0.1}"#);
    }

    #[derive(Serialize)]
    struct Transfer {
        amount: u128,
        delta: i128,
        password: String,
    }

    #[test]
    fn wide_integers_are_written_verbatim() {
        let big = u64::MAX as u128 + 1;
        let set = only("password");
        assert_eq!(
            serialize_redacted(&big, &set).unwrap(),
            "18446744073709551616"
        );

        let transfer = Transfer {
            amount: big,
            delta: i128::MIN,
            password: "pw".into(),
        };
        assert_eq!(
            serialize_redacted(&transfer, &set).unwrap(),
            format!(
                r#"{{"amount":18446744073709551616,"delta":{},"password":"---"}}"#,
                i128::MIN
            )
        );
    }

    #[derive(Serialize)]
    enum Action {
        Password(String),
        Reset { password: String, notify: bool },
        Rotate(String, String),
    }

    #[test]
    fn variant_names_are_top_level_keys() {
        let set = RedactionSet::new(["Password", "Rotate"]);
        assert_eq!(
            serialize_redacted(&Action::Password("pw".into()), &set).unwrap(),
            r#"{"Password":"---"}"#
        );
        assert_eq!(
            serialize_redacted(&Action::Rotate("a".into(), "b".into()), &set).unwrap(),
            r#"{"Rotate":"---"}"#
        );

        let reset = Action::Reset {
            password: "pw".into(),
            notify: true,
        };
        assert_eq!(
            serialize_redacted(&reset, &RedactionSet::new(["Reset"])).unwrap(),
            r#"{"Reset":"---"}"#
        );
        // 浅层不进入变体内部
        assert_eq!(
            serialize_redacted(&reset, &only("password")).unwrap(),
            r#"{"Reset":{"password":"pw","notify":true}}"#
        );

        let recursive =
            RedactingSerializer::new(only("password")).with_depth(RedactionDepth::Recursive);
        assert_eq!(
            recursive.serialize(&reset).unwrap(),
            r#"{"Reset":{"password":"---","notify":true}}"#
        );
    }

    fn assert_agrees<T: Serialize>(ser: &RedactingSerializer, value: &T) {
        let streamed: Value = serde_json::from_str(&ser.serialize(value).unwrap()).unwrap();
        let tree = ser.redact_value(serde_json::to_value(value).unwrap());
        assert_eq!(streamed, tree, "{:?}", ser.depth());
    }

    #[test]
    fn streaming_agrees_with_tree_redaction() {
        let login = Login {
            username: "alice".into(),
            password: "hunter2".into(),
        };
        let mut keyed: HashMap<u32, &str> = HashMap::new();
        keyed.insert(7, "seven");
        let reset = Action::Reset {
            password: "pw".into(),
            notify: false,
        };

        for depth in [RedactionDepth::Shallow, RedactionDepth::Recursive] {
            let ser = RedactingSerializer::new(RedactionSet::new([
                "Password",
                "password",
                "7",
                "credentials",
            ]))
            .with_depth(depth);
            assert_agrees(&ser, &login);
            assert_agrees(&ser, &Some(&login));
            assert_agrees(&ser, &nested());
            assert_agrees(&ser, &keyed);
            assert_agrees(&ser, &reset);
            assert_agrees(&ser, &vec![nested(), nested()]);
        }

        let ser = RedactingSerializer::new(only("Password"));
        assert_eq!(
            ser.serialize(&Some(&login)).unwrap(),
            r#"{"Username":"alice","Password":"---"}"#
        );
    }

    #[test]
    fn integer_map_keys_match_by_text() {
        let mut keyed: HashMap<u32, &str> = HashMap::new();
        keyed.insert(7, "seven");
        let out = serialize_redacted(&keyed, &only("7")).unwrap();
        assert_eq!(out, r#"{"7":"---"}"#);
    }
}
