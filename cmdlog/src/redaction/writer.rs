//! 流式脱敏
//!
//! [`Redacted`] 包裹任意 `Serialize` 值，在序列化过程中直接改写命中的字段，
//! 其余数据原样转交给底层 `Serializer`，不经过 `serde_json::Value` 中间树，
//! 因此 `f32`、`u128`/`i128` 等数值与普通序列化逐字节一致。
//!
use super::{PLACEHOLDER, RedactionSet};
use serde::ser::{self, Serialize, Serializer};
use serde_json::Value;

#[derive(Clone, Copy)]
pub(crate) struct Rules<'a> {
    pub(crate) fields: &'a RedactionSet,
    pub(crate) recursive: bool,
}

impl<'a> Rules<'a> {
    fn redacts(&self, key: &str) -> bool {
        self.fields.contains(key)
    }

    fn wrap<'v, T: ?Sized>(self, value: &'v T) -> Redacted<'v, T>
    where
        'a: 'v,
    {
        Redacted { value, rules: self }
    }
}

/// 序列化时脱敏的包装值，由 [`RedactingSerializer::redacted`](super::RedactingSerializer::redacted) 创建
///
/// 可交给任意 serde 格式；JSON 文本输出见 [`RedactingSerializer::serialize`](super::RedactingSerializer::serialize)。
pub struct Redacted<'a, T: ?Sized> {
    value: &'a T,
    rules: Rules<'a>,
}

impl<'a, T: ?Sized> Redacted<'a, T> {
    pub(crate) fn new(value: &'a T, rules: Rules<'a>) -> Self {
        Self { value, rules }
    }
}

impl<T> Serialize for Redacted<'_, T>
where
    T: Serialize + ?Sized,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(Redactor {
            inner: serializer,
            rules: self.rules,
        })
    }
}

// map 键仅用于匹配；与 serde_json 一致，数字与布尔键按其文本比较
fn key_name<K: Serialize + ?Sized>(key: &K) -> Option<String> {
    match serde_json::to_value(key).ok()? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

struct Redactor<'a, S> {
    inner: S,
    rules: Rules<'a>,
}

macro_rules! forward {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(self, v: $ty) -> Result<Self::Ok, Self::Error> {
                self.inner.$method(v)
            }
        )*
    };
}

impl<'a, S: Serializer> Serializer for Redactor<'a, S> {
    type Ok = S::Ok;
    type Error = S::Error;
    type SerializeSeq = Compound<'a, S::SerializeSeq>;
    type SerializeTuple = Compound<'a, S::SerializeTuple>;
    type SerializeTupleStruct = Compound<'a, S::SerializeTupleStruct>;
    type SerializeTupleVariant = Variant<'a, S, S::SerializeTupleVariant>;
    type SerializeMap = MapCompound<'a, S::SerializeMap>;
    type SerializeStruct = Compound<'a, S::SerializeStruct>;
    type SerializeStructVariant = Variant<'a, S, S::SerializeStructVariant>;

    forward! {
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_i128(i128),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_u128(u128),
        serialize_f32(f32),
        serialize_f64(f64),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
        serialize_unit_struct(&'static str),
    }

    fn serialize_none(self) -> Result<S::Ok, S::Error> {
        self.inner.serialize_none()
    }

    fn serialize_unit(self) -> Result<S::Ok, S::Error> {
        self.inner.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        index: u32,
        variant: &'static str,
    ) -> Result<S::Ok, S::Error> {
        self.inner.serialize_unit_variant(name, index, variant)
    }

    // Some / newtype struct 在 JSON 中是透明的，内部值仍处于当前层级
    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<S::Ok, S::Error> {
        self.inner.serialize_some(&self.rules.wrap(value))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<S::Ok, S::Error> {
        self.inner
            .serialize_newtype_struct(name, &self.rules.wrap(value))
    }

    // 外部标记的变体输出为 {"Variant": ...}，变体名即该层的字段名
    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<S::Ok, S::Error> {
        let rules = self.rules;
        if rules.redacts(variant) {
            self.inner
                .serialize_newtype_variant(name, index, variant, PLACEHOLDER)
        } else if rules.recursive {
            self.inner
                .serialize_newtype_variant(name, index, variant, &rules.wrap(value))
        } else {
            self.inner
                .serialize_newtype_variant(name, index, variant, value)
        }
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, S::Error> {
        Ok(Compound {
            inner: self.inner.serialize_seq(len)?,
            rules: self.rules,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, S::Error> {
        Ok(Compound {
            inner: self.inner.serialize_tuple(len)?,
            rules: self.rules,
        })
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, S::Error> {
        Ok(Compound {
            inner: self.inner.serialize_tuple_struct(name, len)?,
            rules: self.rules,
        })
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, S::Error> {
        if self.rules.redacts(variant) {
            return Ok(Variant::Replaced {
                inner: self.inner,
                name,
                index,
                variant,
            });
        }
        Ok(Variant::Open {
            inner: self
                .inner
                .serialize_tuple_variant(name, index, variant, len)?,
            rules: self.rules,
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, S::Error> {
        Ok(MapCompound {
            inner: self.inner.serialize_map(len)?,
            rules: self.rules,
            redact_next: false,
        })
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, S::Error> {
        Ok(Compound {
            inner: self.inner.serialize_struct(name, len)?,
            rules: self.rules,
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant, S::Error> {
        if self.rules.redacts(variant) {
            return Ok(Variant::Replaced {
                inner: self.inner,
                name,
                index,
                variant,
            });
        }
        Ok(Variant::Open {
            inner: self
                .inner
                .serialize_struct_variant(name, index, variant, len)?,
            rules: self.rules,
        })
    }

    fn is_human_readable(&self) -> bool {
        self.inner.is_human_readable()
    }
}

/// 数组、元组与结构体；只有递归模式才进入下一层
struct Compound<'a, C> {
    inner: C,
    rules: Rules<'a>,
}

impl<C: ser::SerializeSeq> ser::SerializeSeq for Compound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), C::Error> {
        if self.rules.recursive {
            self.inner.serialize_element(&self.rules.wrap(value))
        } else {
            self.inner.serialize_element(value)
        }
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: ser::SerializeTuple> ser::SerializeTuple for Compound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), C::Error> {
        if self.rules.recursive {
            self.inner.serialize_element(&self.rules.wrap(value))
        } else {
            self.inner.serialize_element(value)
        }
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: ser::SerializeTupleStruct> ser::SerializeTupleStruct for Compound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), C::Error> {
        if self.rules.recursive {
            self.inner.serialize_field(&self.rules.wrap(value))
        } else {
            self.inner.serialize_field(value)
        }
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: ser::SerializeStruct> ser::SerializeStruct for Compound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), C::Error> {
        if self.rules.redacts(key) {
            self.inner.serialize_field(key, PLACEHOLDER)
        } else if self.rules.recursive {
            self.inner.serialize_field(key, &self.rules.wrap(value))
        } else {
            self.inner.serialize_field(key, value)
        }
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), C::Error> {
        self.inner.skip_field(key)
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

struct MapCompound<'a, C> {
    inner: C,
    rules: Rules<'a>,
    redact_next: bool,
}

impl<C: ser::SerializeMap> ser::SerializeMap for MapCompound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), C::Error> {
        let rules = self.rules;
        self.redact_next = key_name(key).is_some_and(|name| rules.redacts(&name));
        self.inner.serialize_key(key)
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), C::Error> {
        if std::mem::take(&mut self.redact_next) {
            self.inner.serialize_value(PLACEHOLDER)
        } else if self.rules.recursive {
            self.inner.serialize_value(&self.rules.wrap(value))
        } else {
            self.inner.serialize_value(value)
        }
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

/// 带数据的枚举变体
///
/// 变体名命中时整个变体内容替换为占位符（延迟到 `end` 时输出）；
/// 否则变体内部属于下一层，仅递归模式下处理。
enum Variant<'a, S, C> {
    Open {
        inner: C,
        rules: Rules<'a>,
    },
    Replaced {
        inner: S,
        name: &'static str,
        index: u32,
        variant: &'static str,
    },
}

impl<S: Serializer> ser::SerializeTupleVariant for Variant<'_, S, S::SerializeTupleVariant> {
    type Ok = S::Ok;
    type Error = S::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), S::Error> {
        match self {
            Variant::Open { inner, rules } => {
                if rules.recursive {
                    inner.serialize_field(&rules.wrap(value))
                } else {
                    inner.serialize_field(value)
                }
            }
            Variant::Replaced { .. } => Ok(()),
        }
    }

    fn end(self) -> Result<S::Ok, S::Error> {
        match self {
            Variant::Open { inner, .. } => inner.end(),
            Variant::Replaced {
                inner,
                name,
                index,
                variant,
            } => inner.serialize_newtype_variant(name, index, variant, PLACEHOLDER),
        }
    }
}

impl<S: Serializer> ser::SerializeStructVariant for Variant<'_, S, S::SerializeStructVariant> {
    type Ok = S::Ok;
    type Error = S::Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), S::Error> {
        match self {
            Variant::Open { inner, rules } if rules.recursive => {
                if rules.redacts(key) {
                    inner.serialize_field(key, PLACEHOLDER)
                } else {
                    inner.serialize_field(key, &rules.wrap(value))
                }
            }
            Variant::Open { inner, .. } => inner.serialize_field(key, value),
            Variant::Replaced { .. } => Ok(()),
        }
    }

    fn end(self) -> Result<S::Ok, S::Error> {
        match self {
            Variant::Open { inner, .. } => inner.end(),
            Variant::Replaced {
                inner,
                name,
                index,
                variant,
            } => inner.serialize_newtype_variant(name, index, variant, PLACEHOLDER),
        }
    }
}
