use super::FormData;
use crate::error::{FormsiteError, Result};
use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::{Method, header},
};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Axum extractor binding the submitted form fields of a request
///
/// Only `POST` bodies carry fields. `application/x-www-form-urlencoded` and
/// `multipart/form-data` bodies are decoded, with file parts skipped; any
/// other method or content type yields an empty payload.
///
/// # Example
/// ```ignore
/// async fn register(method: Method, payload: FormData) -> Response {
///     // ...
/// }
/// ```
impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = FormsiteError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        if *req.method() != Method::POST {
            return Ok(FormData::new());
        }

        match media_type(&req).as_deref() {
            Some(FORM_URLENCODED) => {
                let body = Bytes::from_request(req, state).await.map_err(malformed)?;
                Ok(FormData::from_urlencoded(&body))
            }
            Some(MULTIPART_FORM_DATA) => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(malformed)?;
                from_multipart(multipart).await
            }
            _ => Ok(FormData::new()),
        }
    }
}

/// Lowercased `Content-Type` without its parameters.
fn media_type(req: &Request) -> Option<String> {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| mime.trim().to_ascii_lowercase())
}

async fn from_multipart(mut multipart: Multipart) -> Result<FormData> {
    let mut data = FormData::new();
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        // Uploaded files are not form fields.
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field.text().await.map_err(malformed)?;
        data.insert(name, value);
    }
    Ok(data)
}

fn malformed(err: impl std::fmt::Display) -> FormsiteError {
    FormsiteError::MalformedPayload(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;

    const BOUNDARY: &str = "formsite-boundary";

    fn request(method: Method, content_type: Option<&str>, body: &str) -> Request {
        let mut builder = Request::builder().method(method).uri("/users/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn multipart_body() -> String {
        [
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"first_name\"\r\n\r\nAda\r\n"),
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"email\"\r\n\r\nada@example.com\r\n"),
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"avatar\"; filename=\"ada.png\"\r\nContent-Type: image/png\r\n\r\nPNG\r\n"
            ),
            format!("--{BOUNDARY}--\r\n"),
        ]
        .concat()
    }

    #[tokio::test]
    async fn urlencoded_post_is_decoded() {
        let req = request(
            Method::POST,
            Some("Application/X-WWW-Form-Urlencoded; charset=utf-8"),
            "first_name=Ada&email=ada%40example.com",
        );

        let data = FormData::from_request(req, &()).await.unwrap();

        assert_eq!(data.get("first_name"), Some("Ada"));
        assert_eq!(data.get("email"), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn multipart_post_keeps_text_fields_only() {
        let content_type = format!("multipart/form-data; boundary={BOUNDARY}");
        let req = request(Method::POST, Some(content_type.as_str()), &multipart_body());

        let data = FormData::from_request(req, &()).await.unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data.get("first_name"), Some("Ada"));
        assert_eq!(data.get("email"), Some("ada@example.com"));
        assert_eq!(data.get("avatar"), None);
    }

    #[tokio::test]
    async fn other_methods_and_content_types_bind_nothing() {
        let body = "first_name=Ada";

        let get = request(Method::GET, Some(FORM_URLENCODED), body);
        assert!(FormData::from_request(get, &()).await.unwrap().is_empty());

        let json = request(Method::POST, Some("application/json"), r#"{"first_name":"Ada"}"#);
        assert!(FormData::from_request(json, &()).await.unwrap().is_empty());

        let bare = request(Method::POST, None, body);
        assert!(FormData::from_request(bare, &()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn multipart_without_boundary_is_rejected() {
        let req = request(Method::POST, Some(MULTIPART_FORM_DATA), &multipart_body());

        let err = FormData::from_request(req, &()).await.unwrap_err();

        assert!(matches!(err, FormsiteError::MalformedPayload(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
