use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{multipart, Method};
use serde::Serialize;

use crate::{AssetType, FindQuery, KnackProxyError, Result};

/// Header carrying the proxy application id.
pub const APP_ID_HEADER: HeaderName = HeaderName::from_static("s-proxy-appid");

/// Multipart field name used for uploads.
pub const UPLOAD_FIELD: &str = "files";

/// File contents for an asset upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileUpload {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
    pub mime: Option<String>,
}

impl FileUpload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            filename: None,
            mime: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Builds a fresh form. Forms are consumed by `send`, so each attempt
    /// gets its own.
    pub(crate) fn to_form(&self) -> Result<multipart::Form> {
        let mut part = multipart::Part::bytes(self.bytes.clone());
        if let Some(filename) = &self.filename {
            part = part.file_name(filename.clone());
        }
        if let Some(mime) = &self.mime {
            part = part
                .mime_str(mime)
                .map_err(|err| KnackProxyError::Encode(format!("invalid mime '{mime}': {err}")))?;
        }
        Ok(multipart::Form::new().part(UPLOAD_FIELD, part))
    }
}

/// Request payload.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    /// Pre-serialized JSON document.
    Json(Vec<u8>),
    Multipart(FileUpload),
}

impl RequestBody {
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_vec(value)
            .map(Self::Json)
            .map_err(|err| KnackProxyError::Encode(format!("invalid JSON body: {err}")))
    }
}

/// Immutable description of one proxy call.
///
/// Retries re-issue the same descriptor, so method, URL and body are
/// identical on every attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    query: Option<String>,
    body: Option<RequestBody>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: None,
        }
    }

    pub fn with_query(mut self, query: &FindQuery) -> Result<Self> {
        self.query = Some(query.to_query_string()?);
        Ok(self)
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// `GET objects/{object_id}/records?...`
    pub fn find(object_id: &str, query: &FindQuery) -> Result<Self> {
        Self::new(Method::GET, records_path(object_id)).with_query(query)
    }

    /// `GET objects/{object_id}/records/{id}`
    pub fn find_by_id(object_id: &str, id: &str) -> Self {
        Self::new(Method::GET, record_path(object_id, id))
    }

    /// `POST objects/{object_id}/records`
    pub fn create<T: Serialize + ?Sized>(object_id: &str, data: &T) -> Result<Self> {
        Ok(Self::new(Method::POST, records_path(object_id)).with_body(RequestBody::json(data)?))
    }

    /// `PUT objects/{object_id}/records/{id}`
    pub fn update<T: Serialize + ?Sized>(object_id: &str, id: &str, data: &T) -> Result<Self> {
        Ok(Self::new(Method::PUT, record_path(object_id, id)).with_body(RequestBody::json(data)?))
    }

    /// `DELETE objects/{object_id}/records/{id}`
    pub fn delete(object_id: &str, id: &str) -> Self {
        Self::new(Method::DELETE, record_path(object_id, id))
    }

    /// `POST objects/{object_id}/records/delete` with `{"ids": [...]}`
    pub fn delete_ids(object_id: &str, ids: &[String]) -> Result<Self> {
        #[derive(Serialize)]
        struct DeleteIds<'a> {
            ids: &'a [String],
        }

        let path = format!("{}/delete", records_path(object_id));
        Ok(Self::new(Method::POST, path).with_body(RequestBody::json(&DeleteIds { ids })?))
    }

    /// `POST applications/{application_id}/assets/{type}/upload`
    pub fn upload(application_id: &str, asset_type: AssetType, file: FileUpload) -> Self {
        let path = format!("applications/{application_id}/assets/{asset_type}/upload");
        Self::new(Method::POST, path).with_body(RequestBody::Multipart(file))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// Joins the descriptor onto `base`, tolerating a missing trailing slash.
    pub fn url(&self, base: &str) -> String {
        let base = base.trim_end_matches('/');
        let path = self.path.trim_start_matches('/');
        match &self.query {
            Some(query) => format!("{base}/{path}?{query}"),
            None => format!("{base}/{path}"),
        }
    }

    /// Fixed header set for this request.
    ///
    /// Multipart uploads leave `content-type` to the transport, which adds
    /// the boundary.
    pub fn headers(&self, application_id: &str) -> Result<HeaderMap> {
        let application_id = application_id.trim();
        if application_id.is_empty() {
            return Err(KnackProxyError::Config(
                "application id must not be empty".to_owned(),
            ));
        }
        let app_id = HeaderValue::from_str(application_id).map_err(|_| {
            KnackProxyError::Config("application id is not a valid header value".to_owned())
        })?;

        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(APP_ID_HEADER, app_id);
        if !matches!(self.body, Some(RequestBody::Multipart(_))) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        Ok(headers)
    }
}

fn records_path(object_id: &str) -> String {
    format!("objects/{object_id}/records")
}

fn record_path(object_id: &str, id: &str) -> String {
    format!("objects/{object_id}/records/{id}")
}

#[cfg(test)]
mod tests {
    use reqwest::header::CONTENT_TYPE;
    use reqwest::Method;
    use serde_json::json;

    use super::{FileUpload, RequestBody, RequestDescriptor, APP_ID_HEADER};
    use crate::{AssetType, FindQuery, KnackProxyError};

    #[test]
    fn json_requests_carry_app_id_and_content_type() {
        let descriptor = RequestDescriptor::create("object_1", &json!({ "field_1": "Kit" }))
            .expect("must build");
        let headers = descriptor.headers("app-123").expect("must build headers");

        assert_eq!(headers.get(APP_ID_HEADER).unwrap(), "app-123");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn upload_headers_never_include_content_type() {
        let descriptor =
            RequestDescriptor::upload("app-123", AssetType::Image, FileUpload::new(vec![1u8, 2, 3]));
        let headers = descriptor.headers("app-123").expect("must build headers");

        assert!(headers.get(CONTENT_TYPE).is_none());
        assert_eq!(headers.get(APP_ID_HEADER).unwrap(), "app-123");

        // other descriptors built afterwards are unaffected
        let other = RequestDescriptor::find_by_id("object_1", "r1");
        assert!(other.headers("app-123").unwrap().get(CONTENT_TYPE).is_some());
    }

    #[test]
    fn invalid_app_id_is_config_error() {
        let err = RequestDescriptor::find_by_id("object_1", "r1")
            .headers("bad\nid")
            .expect_err("must fail");
        assert!(matches!(err, KnackProxyError::Config(_)));
    }

    #[test]
    fn blank_app_id_is_config_error() {
        let descriptor = RequestDescriptor::find_by_id("object_1", "r1");
        for app_id in ["", "   "] {
            let err = descriptor.headers(app_id).expect_err("must fail");
            assert!(matches!(err, KnackProxyError::Config(_)));
        }
    }

    #[test]
    fn app_id_header_is_trimmed() {
        let headers = RequestDescriptor::find_by_id("object_1", "r1")
            .headers("  app-123 ")
            .expect("must build headers");
        assert_eq!(headers.get(APP_ID_HEADER).unwrap(), "app-123");
    }

    #[test]
    fn paths_follow_proxy_layout() {
        let base = "https://proxy.example/";
        assert_eq!(
            RequestDescriptor::find_by_id("object_1", "r1").url(base),
            "https://proxy.example/objects/object_1/records/r1"
        );
        assert_eq!(
            RequestDescriptor::delete("object_1", "r1").method(),
            &Method::DELETE
        );
        assert_eq!(
            RequestDescriptor::delete_ids("object_1", &["r1".to_owned()])
                .unwrap()
                .url("https://proxy.example"),
            "https://proxy.example/objects/object_1/records/delete"
        );
        assert_eq!(
            RequestDescriptor::upload("app", AssetType::File, FileUpload::new(Vec::<u8>::new()))
                .url(base),
            "https://proxy.example/applications/app/assets/file/upload"
        );
    }

    #[test]
    fn find_url_appends_query() {
        let descriptor =
            RequestDescriptor::find("object_1", &FindQuery::new().rows_per_page(10)).unwrap();
        assert_eq!(
            descriptor.url("https://proxy.example/"),
            "https://proxy.example/objects/object_1/records?rows_per_page=10&filters=%5B%5D&sort_field=&sort_order="
        );
    }

    #[test]
    fn delete_ids_body_shape() {
        let descriptor =
            RequestDescriptor::delete_ids("object_1", &["a".to_owned(), "b".to_owned()]).unwrap();
        let Some(RequestBody::Json(bytes)) = descriptor.body() else {
            panic!("expected json body");
        };
        let body: serde_json::Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(body, json!({ "ids": ["a", "b"] }));
    }

    #[test]
    fn invalid_mime_is_encode_error() {
        let err = FileUpload::new(vec![0u8])
            .with_mime("not a mime")
            .to_form()
            .expect_err("must fail");
        assert!(matches!(err, KnackProxyError::Encode(_)));
    }
}
