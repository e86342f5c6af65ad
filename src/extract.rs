//! Request body extraction shared by the write endpoints.
//!
//! JSON and urlencoded bodies are decoded; any other body, or none at all,
//! yields `T::default()` so the handler's presence checks decide the status.

use actix_web::dev::Payload;
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub struct RequestBody<T>(pub T);

impl<T> RequestBody<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for RequestBody<T>
where
    T: DeserializeOwned + Default + 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let content_type = req.mime_type().ok().flatten();
        match content_type {
            Some(m) if m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON) => {
                let json = web::Json::<T>::from_request(req, payload);
                Box::pin(async move { Ok(RequestBody(json.await?.into_inner())) })
            }
            Some(m) if m.type_() == mime::APPLICATION && m.subtype() == mime::WWW_FORM_URLENCODED => {
                let form = web::Form::<T>::from_request(req, payload);
                Box::pin(async move { Ok(RequestBody(form.await?.into_inner())) })
            }
            _ => Box::pin(async { Ok(RequestBody(T::default())) }),
        }
    }
}

/// Reads a loosely typed field the way a JavaScript truthiness check would:
/// `null`, `false`, `0`, `NaN` and `""` count as absent, other scalars are
/// rendered as text. Arrays and objects are not text and count as absent.
pub fn text_field(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 0.0 || f.is_nan() => None,
            _ => Some(n.to_string()),
        },
        Value::Null | Value::Bool(false) | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_values_are_absent() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert_eq!(text_field(Some(value)), None);
        }
        assert_eq!(text_field(None), None);
    }

    #[test]
    fn truthy_scalars_become_text() {
        assert_eq!(text_field(Some(json!("Will"))), Some("Will".into()));
        assert_eq!(text_field(Some(json!(7))), Some("7".into()));
        assert_eq!(text_field(Some(json!(1.5))), Some("1.5".into()));
        assert_eq!(text_field(Some(json!(true))), Some("true".into()));
    }

    #[test]
    fn structured_values_are_not_text() {
        assert_eq!(text_field(Some(json!(["a"]))), None);
        assert_eq!(text_field(Some(json!({ "a": 1 }))), None);
    }
}
