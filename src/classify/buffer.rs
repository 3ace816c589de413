//! Shape checks for binary data arriving as loosely typed JSON.
//!
//! Bytes that went through a JSON round trip show up either as a plain array
//! of integers or as `{ "type": "Buffer", "data": [..] }`.

use serde_json::Value;

pub fn is_byte(subject: &Value) -> bool {
    subject.as_u64().is_some_and(|n| n <= u8::MAX as u64)
}

pub fn is_byte_array(subject: &Value) -> bool {
    subject
        .as_array()
        .is_some_and(|items| items.iter().all(is_byte))
}

pub fn is_buffer_object(subject: &Value) -> bool {
    subject.get("type").and_then(Value::as_str) == Some("Buffer")
        && subject.get("data").is_some_and(is_byte_array)
}

pub fn is_buffer_arg(subject: &Value) -> bool {
    is_byte_array(subject) || is_buffer_object(subject)
}

/// Copies the bytes out of either buffer shape.
pub fn to_bytes(subject: &Value) -> Option<Vec<u8>> {
    let items = if is_buffer_object(subject) {
        subject.get("data")?.as_array()?
    } else {
        subject.as_array()?
    };

    items
        .iter()
        .map(|item| item.as_u64().and_then(|n| u8::try_from(n).ok()))
        .collect()
}

/// The buffer-shaped object form of `bytes`.
pub fn to_buffer_object(bytes: &[u8]) -> Value {
    serde_json::json!({ "type": "Buffer", "data": bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use serde_json::json;

    #[rstest]
    #[case(json!(0), true)]
    #[case(json!(255), true)]
    #[case(json!(256), false)]
    #[case(json!(-1), false)]
    #[case(json!(1.5), false)]
    #[case(json!("1"), false)]
    fn detects_bytes(#[case] subject: Value, #[case] expected: bool) {
        assert_eq!(is_byte(&subject), expected);
    }

    #[rstest]
    #[case(json!([1, 2, 3]), true)]
    #[case(json!([]), true)]
    #[case(json!({ "type": "Buffer", "data": [137, 80] }), true)]
    #[case(json!({ "type": "Buffer", "data": [300] }), false)]
    #[case(json!({ "type": "Blob", "data": [1] }), false)]
    #[case(json!([1, "2"]), false)]
    #[case(json!("hello"), false)]
    fn detects_buffer_args(#[case] subject: Value, #[case] expected: bool) {
        assert_eq!(is_buffer_arg(&subject), expected);
    }

    #[test]
    fn extracts_bytes_from_both_shapes() {
        assert_eq!(to_bytes(&json!([137, 80, 78])), Some(vec![137, 80, 78]));
        assert_eq!(
            to_bytes(&json!({ "type": "Buffer", "data": [0, 255] })),
            Some(vec![0, 255])
        );
        assert_eq!(to_bytes(&json!([1, 999])), None);
        assert_eq!(to_bytes(&json!({ "data": [1] })), None);
    }

    #[test]
    fn buffer_object_round_trips() {
        let bytes = [0u8, 1, 254, 255];
        let object = to_buffer_object(&bytes);

        assert!(is_buffer_object(&object));
        assert_eq!(to_bytes(&object), Some(bytes.to_vec()));
    }
}
