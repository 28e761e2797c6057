//! Conversions between boxed payloads and document values.
use fma_core::kernel::constants::LIST_SEPARATOR;
use fma_core::{BoxedData, BoxedType};
use serde_json::Value;

/// Document form of a payload; pointers have none
pub fn to_value(data: &BoxedData) -> Option<Value> {
    match data {
        BoxedData::String(s) | BoxedData::LocaleString(s) => Some(Value::from(s.as_str())),
        BoxedData::Bool(b) => Some(Value::from(*b)),
        BoxedData::StringList(items) => Some(Value::from(items.clone())),
        BoxedData::UInt(u) => Some(Value::from(*u)),
        BoxedData::UIntList(items) => Some(Value::from(items.clone())),
        BoxedData::Pointer(_) => None,
    }
}

/// Payload of the requested type from a document value
pub fn from_value(kind: BoxedType, value: &Value) -> Option<BoxedData> {
    if let Value::String(text) = value {
        return BoxedData::from_string(kind, text, LIST_SEPARATOR);
    }
    match (kind, value) {
        (BoxedType::Bool, Value::Bool(b)) => Some(BoxedData::Bool(*b)),
        (BoxedType::UInt, Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()).map(BoxedData::UInt),
        (BoxedType::StringList, Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(BoxedData::StringList),
        (BoxedType::UIntList, Value::Array(items)) => items
            .iter()
            .map(|item| item.as_u64().and_then(|n| u32::try_from(n).ok()))
            .collect::<Option<Vec<_>>>()
            .map(BoxedData::UIntList),
        _ => None,
    }
}
