//! HTTP request type.

use std::collections::HashMap;

/// HTTP request methods.
///
/// Methods compare by their uppercase name; anything outside the common set
/// is kept as [`Method::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET method
    Get,
    /// POST method
    Post,
    /// PUT method
    Put,
    /// PATCH method
    Patch,
    /// DELETE method
    Delete,
    /// HEAD method
    Head,
    /// OPTIONS method
    Options,
    /// Any other method, stored uppercase.
    Other(String),
}

impl Method {
    /// Parses a method name, case-insensitively.
    pub fn parse(s: &str) -> Self {
        let upper = s.trim().to_ascii_uppercase();
        match upper.as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            "HEAD" => Self::Head,
            "OPTIONS" => Self::Options,
            _ => Self::Other(upper),
        }
    }

    /// Returns the method as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Other(name) => name,
        }
    }

    /// Re-parses the method so that `Other` holds a canonical name.
    pub(crate) fn normalized(self) -> Self {
        match self {
            Self::Other(name) => Self::parse(&name),
            known => known,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Request path, without the query string.
    pub path: String,
    /// Query string parameters.
    pub query: HashMap<String, String>,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Vec<u8>,
}

impl Request {
    /// Creates a new request.
    ///
    /// A query string on `path` is split off into [`Request::query`].
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let mut path = path.into();
        let mut query = HashMap::new();
        if let Some(pos) = path.find('?') {
            query = Self::parse_query_string(&path[pos + 1..]);
            path.truncate(pos);
        }
        Self {
            method,
            path,
            query,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Creates a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Creates a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a JSON body and content type.
    #[must_use]
    pub fn json_body(self, value: &serde_json::Value) -> Self {
        self.header("Content-Type", "application/json")
            .body(value.to_string())
    }

    /// Sets a query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Gets a header value.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Gets a query parameter.
    pub fn get_query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Gets a cookie value from the `Cookie` header.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.get_header("Cookie")?
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }

    /// Returns the media type of the body, without parameters.
    fn media_type(&self) -> Option<&str> {
        self.get_header("Content-Type")
            .and_then(|ct| ct.split(';').next())
            .map(str::trim)
    }

    /// Returns true if the body is declared as JSON.
    pub fn is_json(&self) -> bool {
        self.media_type()
            .is_some_and(|mt| mt.eq_ignore_ascii_case("application/json"))
    }

    /// Returns true if the body is declared as an urlencoded form.
    pub fn is_form(&self) -> bool {
        self.media_type()
            .is_some_and(|mt| mt.eq_ignore_ascii_case("application/x-www-form-urlencoded"))
    }

    /// Returns the body as a string.
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }

    /// Parses the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Parses the body as `application/x-www-form-urlencoded`.
    pub fn form(&self) -> HashMap<String, String> {
        url::form_urlencoded::parse(&self.body)
            .into_owned()
            .collect()
    }

    /// Parses query parameters from a query string.
    pub fn parse_query_string(query: &str) -> HashMap<String, String> {
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing() {
        assert_eq!(Method::parse("GET"), Method::Get);
        assert_eq!(Method::parse("post"), Method::Post);
        assert_eq!(Method::parse("purge"), Method::Other("PURGE".to_string()));
        assert_eq!(Method::parse("purge").as_str(), "PURGE");
    }

    #[test]
    fn test_method_normalized() {
        assert_eq!(Method::Other("get".to_string()).normalized(), Method::Get);
        assert_eq!(
            Method::Other("Brew".to_string()).normalized(),
            Method::Other("BREW".to_string())
        );
    }

    #[test]
    fn test_request_builder() {
        let req = Request::get("/users")
            .header("Content-Type", "application/json")
            .query_param("page", "1");

        assert_eq!(req.method, Method::Get);
        assert_eq!(req.path, "/users");
        assert_eq!(req.get_header("content-type"), Some("application/json"));
        assert_eq!(req.get_query("page"), Some("1"));
        assert!(req.is_json());
    }

    #[test]
    fn test_query_split_from_path() {
        let req = Request::get("/search?q=rust&page=2");
        assert_eq!(req.path, "/search");
        assert_eq!(req.get_query("q"), Some("rust"));
        assert_eq!(req.get_query("page"), Some("2"));
    }

    #[test]
    fn test_query_string_parsing() {
        let query = Request::parse_query_string("name=John+Doe&age=30&city=New%20York");
        assert_eq!(query.get("name"), Some(&"John Doe".to_string()));
        assert_eq!(query.get("age"), Some(&"30".to_string()));
        assert_eq!(query.get("city"), Some(&"New York".to_string()));
    }

    #[test]
    fn test_cookie_lookup() {
        let req = Request::get("/").header("cookie", "theme=dark; site-session=abc123");
        assert_eq!(req.cookie("site-session"), Some("abc123"));
        assert_eq!(req.cookie("theme"), Some("dark"));
        assert_eq!(req.cookie("missing"), None);
    }

    #[test]
    fn test_form_body() {
        let req = Request::post("/links").body("longUrl=https%3A%2F%2Fexample.com");
        assert_eq!(
            req.form().get("longUrl").map(String::as_str),
            Some("https://example.com")
        );
    }

    #[test]
    fn test_content_type_detection() {
        let req = Request::post("/").header("content-type", "Application/JSON; charset=utf-8");
        assert!(req.is_json());
        assert!(!req.is_form());

        let req = Request::post("/")
            .header("Content-Type", "application/x-www-form-urlencoded;charset=UTF-8");
        assert!(req.is_form());
        assert!(!req.is_json());

        let req = Request::post("/").header("Content-Type", "application/jsonp");
        assert!(!req.is_json());

        assert!(!Request::post("/").is_json());
        assert!(!Request::post("/").is_form());
    }

    #[test]
    fn test_json_body() {
        let req = Request::post("/links").json_body(&serde_json::json!({"longUrl": "x"}));
        let value: serde_json::Value = req.json().unwrap();
        assert_eq!(value["longUrl"], "x");
    }
}
