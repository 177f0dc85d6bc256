/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Array elements and object members are wrapped into metadata-free nodes.
/// Any other expression goes through `Value::from`, so typed payloads
/// (decimals, timestamps, UUIDs, byte vectors) can be spliced in directly.
///
/// ```rust
/// use xcdn::{xcdn, Value};
///
/// let value = xcdn!({
///     "name": "demo",
///     "ids": [1, 2, 3],
///     "timeout": (Value::duration("PT30S"))
/// });
/// assert_eq!(value.get("ids").unwrap().len().unwrap(), 3);
/// assert!(value.get("timeout").unwrap().value.is_duration());
/// ```
#[macro_export]
macro_rules! xcdn {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array($crate::Array::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {{
        let mut array = $crate::Array::new();
        $(
            array.append($crate::xcdn!($elem));
        )*
        $crate::Value::Array(array)
    }};

    ({}) => {
        $crate::Value::Object($crate::Object::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::Object::new();
        $(
            object.set($key, $crate::xcdn!($value));
        )*
        $crate::Value::Object(object)
    }};

    ($s:expr) => {
        $crate::Value::from($s)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Array, Object, Value};

    #[test]
    fn test_xcdn_macro_primitives() {
        assert_eq!(xcdn!(null), Value::Null);
        assert_eq!(xcdn!(true), Value::Bool(true));
        assert_eq!(xcdn!(false), Value::Bool(false));
        assert_eq!(xcdn!(42), Value::Int(42));
        assert_eq!(xcdn!(3.5), Value::Float(3.5));
        assert_eq!(xcdn!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_xcdn_macro_containers() {
        assert_eq!(xcdn!([]), Value::Array(Array::new()));
        assert_eq!(xcdn!({}), Value::Object(Object::new()));

        let value = xcdn!({ "b": [1, "two"], "a": null });
        let object = value.as_object().unwrap();
        assert_eq!(object.keys().cloned().collect::<Vec<_>>(), vec!["b", "a"]);
        let list = object.get("b").unwrap().value.as_array().unwrap();
        assert_eq!(list.get(1).unwrap().value, "two");
        assert!(object.get("a").unwrap().value.is_null());
    }
}
