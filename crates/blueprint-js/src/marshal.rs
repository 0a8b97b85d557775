//! Value Marshaler
//!
//! Converts between script values and `Var`.
//!
//! - booleans, numbers and strings map one to one
//! - arrays convert element by element, length is authoritative
//! - objects (functions and errors included) convert their own enumerable
//!   string-keyed properties; keys are always strings
//! - `null` is `Var::Empty`, `undefined` is `Var::Undefined`
//! - symbols, big integers and anything else are rejected

use crate::MarshalError;
use blueprint_view::{Properties, Var};
use rquickjs::{Array, Ctx, Function, Object, Value};

/// Nesting limit for both directions; also stops cyclic objects.
pub const MAX_DEPTH: usize = 64;

/// Replaces every unpaired surrogate with U+FFFD
const TO_WELL_FORMED: &str = r#"(function (s) {
    var out = '';
    for (var i = 0; i < s.length; i++) {
        var c = s.charCodeAt(i);
        if (c >= 0xD800 && c <= 0xDBFF && i + 1 < s.length) {
            var d = s.charCodeAt(i + 1);
            if (d >= 0xDC00 && d <= 0xDFFF) {
                out += s.charAt(i) + s.charAt(i + 1);
                i++;
                continue;
            }
        }
        out += (c >= 0xD800 && c <= 0xDFFF) ? '\uFFFD' : s.charAt(i);
    }
    return out;
})"#;

/// Encode a native value for script
pub fn to_js<'js>(ctx: &Ctx<'js>, var: &Var) -> Result<Value<'js>, MarshalError> {
    to_js_at(ctx, var, 0)
}

/// Decode a script value
pub fn from_js(value: &Value<'_>) -> Result<Var, MarshalError> {
    from_js_at(value, 0)
}

/// Decode every argument of a call, in order
pub fn args_from_js(values: &[Value<'_>]) -> Result<Vec<Var>, MarshalError> {
    values.iter().map(from_js).collect()
}

/// Encode a native argument list
pub fn args_to_js<'js>(ctx: &Ctx<'js>, vars: &[Var]) -> Result<Vec<Value<'js>>, MarshalError> {
    vars.iter().map(|v| to_js(ctx, v)).collect()
}

fn to_js_at<'js>(ctx: &Ctx<'js>, var: &Var, depth: usize) -> Result<Value<'js>, MarshalError> {
    if depth > MAX_DEPTH {
        return Err(MarshalError::TooDeep(MAX_DEPTH));
    }

    let value = match var {
        Var::Undefined => Value::new_undefined(ctx.clone()),
        Var::Empty => Value::new_null(ctx.clone()),
        Var::Bool(b) => Value::new_bool(ctx.clone(), *b),
        Var::Number(n) => match as_script_int(*n) {
            Some(i) => Value::new_int(ctx.clone(), i),
            None => Value::new_float(ctx.clone(), *n),
        },
        Var::String(s) => rquickjs::String::from_str(ctx.clone(), s)?.into_value(),
        Var::Array(items) => {
            let array = Array::new(ctx.clone())?;
            for (i, item) in items.iter().enumerate() {
                array.set(i, to_js_at(ctx, item, depth + 1)?)?;
            }
            array.into_value()
        }
        Var::Object(props) => {
            let object = Object::new(ctx.clone())?;
            for (key, item) in props {
                object.set(key.as_str(), to_js_at(ctx, item, depth + 1)?)?;
            }
            object.into_value()
        }
    };

    Ok(value)
}

/// Integral numbers that fit travel as script integers; `-0.0` stays a float.
fn as_script_int(n: f64) -> Option<i32> {
    if n.fract() != 0.0 || n < i32::MIN as f64 || n > i32::MAX as f64 {
        return None;
    }
    if n == 0.0 && n.is_sign_negative() {
        return None;
    }
    Some(n as i32)
}

fn from_js_at(value: &Value<'_>, depth: usize) -> Result<Var, MarshalError> {
    if depth > MAX_DEPTH {
        return Err(MarshalError::TooDeep(MAX_DEPTH));
    }

    if value.is_undefined() {
        return Ok(Var::Undefined);
    }
    if value.is_null() {
        return Ok(Var::Empty);
    }
    if let Some(b) = value.as_bool() {
        return Ok(Var::Bool(b));
    }
    if let Some(i) = value.as_int() {
        return Ok(Var::Number(i as f64));
    }
    if let Some(n) = value.as_float() {
        return Ok(Var::Number(n));
    }
    if let Some(s) = value.as_string() {
        return Ok(Var::String(decode_string(value.ctx(), s)?));
    }
    if let Some(array) = value.as_array() {
        let mut items = Vec::with_capacity(array.len());
        for i in 0..array.len() {
            let item: Value = array.get(i)?;
            items.push(from_js_at(&item, depth + 1)?);
        }
        return Ok(Var::Array(items));
    }
    if let Some(object) = value.as_object() {
        let mut props = Properties::new();
        for prop in object.props::<String, Value>() {
            let (key, item) = prop?;
            props.insert(key, from_js_at(&item, depth + 1)?);
        }
        return Ok(Var::Object(props));
    }

    Err(MarshalError::Unsupported(format!("{:?}", value.type_of())))
}

/// Script strings are UTF-16 and may hold lone surrogates, which have no
/// UTF-8 form. Those decode lossily.
fn decode_string<'js>(ctx: &Ctx<'js>, s: &rquickjs::String<'js>) -> Result<String, MarshalError> {
    if let Ok(text) = s.to_string() {
        return Ok(text);
    }
    let repair: Function = ctx.eval(TO_WELL_FORMED)?;
    let repaired: rquickjs::String = repair.call((s.clone(),))?;
    Ok(repaired.to_string()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rquickjs::{Context, Runtime};

    fn with_ctx<F: FnOnce(Ctx<'_>)>(f: F) {
        let runtime = Runtime::new().unwrap();
        let context = Context::full(&runtime).unwrap();
        context.with(f);
    }

    fn roundtrip(var: Var) {
        with_ctx(|ctx| {
            let value = to_js(&ctx, &var).unwrap();
            assert_eq!(from_js(&value).unwrap(), var);
        });
    }

    #[test]
    fn test_scalars_roundtrip() {
        roundtrip(Var::Bool(true));
        roundtrip(Var::Number(42.0));
        roundtrip(Var::Number(-1.5));
        roundtrip(Var::Number(1e12));
        roundtrip(Var::String("héllo".to_string()));
    }

    #[test]
    fn test_sentinels_roundtrip() {
        roundtrip(Var::Empty);
        roundtrip(Var::Undefined);
    }

    #[test]
    fn test_nested_roundtrip() {
        let inner: Var = [("width", Var::from(100)), ("tags", Var::from(vec![Var::from("a")]))]
            .into_iter()
            .collect();
        roundtrip(Var::from(vec![inner, Var::Empty, Var::from(false)]));
    }

    #[test]
    fn test_null_and_undefined_from_script() {
        with_ctx(|ctx| {
            let null: Value = ctx.eval("null").unwrap();
            let undef: Value = ctx.eval("undefined").unwrap();
            assert_eq!(from_js(&null).unwrap(), Var::Empty);
            assert_eq!(from_js(&undef).unwrap(), Var::Undefined);
        });
    }

    #[test]
    fn test_numeric_keys_are_strings() {
        with_ctx(|ctx| {
            let value: Value = ctx.eval("({1: 'a', b: 2})").unwrap();
            let var = from_js(&value).unwrap();
            assert_eq!(var.get("1"), Some(&Var::from("a")));
            assert_eq!(var.get("b"), Some(&Var::from(2)));
        });
    }

    #[test]
    fn test_only_own_properties() {
        with_ctx(|ctx| {
            let value: Value = ctx
                .eval("var proto = { inherited: 1 }; var o = Object.create(proto); o.own = 2; o")
                .unwrap();
            let var = from_js(&value).unwrap();
            assert!(var.get("inherited").is_none());
            assert_eq!(var.get("own"), Some(&Var::from(2)));
        });
    }

    #[test]
    fn test_sparse_array_uses_length() {
        with_ctx(|ctx| {
            let value: Value = ctx.eval("var a = [1]; a[3] = 4; a").unwrap();
            let var = from_js(&value).unwrap();
            let items = var.as_array().unwrap();
            assert_eq!(items.len(), 4);
            assert_eq!(items[1], Var::Undefined);
        });
    }

    #[test]
    fn test_function_decodes_as_object() {
        with_ctx(|ctx| {
            let value: Value = ctx.eval("(function f() {})").unwrap();
            assert!(matches!(from_js(&value).unwrap(), Var::Object(_)));
        });
    }

    #[test]
    fn test_lone_surrogates_decode_lossily() {
        with_ctx(|ctx| {
            let value: Value = ctx.eval(r"'a\uD800b'").unwrap();
            assert_eq!(from_js(&value).unwrap(), Var::from("a\u{FFFD}b"));

            let value: Value = ctx.eval(r"['\uDC00', '\uD83D\uDE00', 'x\uD83D']").unwrap();
            assert_eq!(
                from_js(&value).unwrap(),
                Var::from(vec![
                    Var::from("\u{FFFD}"),
                    Var::from("\u{1F600}"),
                    Var::from("x\u{FFFD}"),
                ])
            );
        });
    }

    #[test]
    fn test_symbol_rejected() {
        with_ctx(|ctx| {
            let value: Value = ctx.eval("Symbol('x')").unwrap();
            assert!(matches!(from_js(&value), Err(MarshalError::Unsupported(_))));
        });
    }

    #[test]
    fn test_cycle_rejected() {
        with_ctx(|ctx| {
            let value: Value = ctx.eval("var o = {}; o.self = o; o").unwrap();
            assert!(matches!(from_js(&value), Err(MarshalError::TooDeep(_))));
        });
    }

    #[test]
    fn test_integers_travel_as_ints() {
        with_ctx(|ctx| {
            let value = to_js(&ctx, &Var::from(7)).unwrap();
            assert_eq!(value.as_int(), Some(7));
            let value = to_js(&ctx, &Var::from(0.5)).unwrap();
            assert_eq!(value.as_float(), Some(0.5));
        });
    }
}
