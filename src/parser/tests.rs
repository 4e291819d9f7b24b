//! Tests for method, attribute and request parsing.

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::parser::{parse_attributes, parse_request, AttributeValue, Error, Method};

    fn list(values: &[&str]) -> AttributeValue {
        AttributeValue::List(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_all_methods() {
        for method in Method::ALL {
            assert_eq!(Method::from_str(method.as_str()).unwrap(), method);
        }
    }

    #[test]
    fn test_method_is_case_insensitive() {
        assert_eq!(Method::from_str("get").unwrap(), Method::GET);
        assert_eq!(Method::from_str("Patch").unwrap(), Method::PATCH);
    }

    #[test]
    fn test_invalid_method() {
        assert!(matches!(Method::from_str("HEAD"), Err(Error::InvalidMethod(ref m)) if m == "HEAD"));
        assert!(matches!(Method::from_str("INPROPER_METHOD!"), Err(Error::InvalidMethod(_))));
        assert!(matches!(Method::from_str(""), Err(Error::InvalidMethod(_))));
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::GET.to_string(), "GET");
        assert_eq!(Method::DELETE.to_string(), "DELETE");
        assert!(!Method::GET.is_write());
        assert!(Method::PUT.is_write());
    }

    #[test]
    fn test_attributes_duplicate_policy() {
        let attributes = parse_attributes("a=1&b=2&b=3&c&d=x+y");
        assert_eq!(attributes.len(), 5);
        assert_eq!(attributes["a"], AttributeValue::from("1"));
        assert_eq!(attributes["b"], AttributeValue::from("3"));
        assert_eq!(attributes["b[]"], list(&["2", "3"]));
        assert_eq!(attributes["c"], AttributeValue::from(""));
        assert_eq!(attributes["d"], AttributeValue::from("x y"));
    }

    #[test]
    fn test_attributes_empty_input() {
        assert!(parse_attributes("").is_empty());
    }

    #[test]
    fn test_attributes_history_accumulates() {
        let attributes = parse_attributes("id=1&id=2&id=3");
        assert_eq!(attributes["id"], AttributeValue::from("3"));
        assert_eq!(attributes["id[]"], list(&["1", "2", "3"]));
    }

    #[test]
    fn test_attributes_split_on_first_equals() {
        let attributes = parse_attributes("expr=a=b&q=%2Fpath%3Fx");
        assert_eq!(attributes["expr"].as_str(), Some("a=b"));
        assert_eq!(attributes["q"].as_str(), Some("/path?x"));
    }

    #[test]
    fn test_attributes_decode_names() {
        let attributes = parse_attributes("first+name=Jan&last%20name=Kowalski");
        assert_eq!(attributes["first name"].as_str(), Some("Jan"));
        assert_eq!(attributes["last name"].as_str(), Some("Kowalski"));
    }

    #[test]
    fn test_attributes_no_list_without_duplicates() {
        let attributes = parse_attributes("attr3=value3&attr4=value4");
        assert_eq!(attributes.len(), 2);
        assert!(attributes.values().all(|v| v.as_list().is_none()));
    }

    #[test]
    fn test_attributes_serialize_untagged() {
        let attributes = parse_attributes("k=1&k=2");
        let json = serde_json::to_value(&attributes).unwrap();
        assert_eq!(json["k"], serde_json::json!("2"));
        assert_eq!(json["k[]"], serde_json::json!(["1", "2"]));
    }

    #[test]
    fn test_parse_simple_get_request() {
        let request = parse_request(b"GET /items/42?page=2 HTTP/1.1\r\nHost: example.com\r\n\r\n").unwrap();
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/items/42");
        assert_eq!(request.query, "page=2");
        assert_eq!(request.version, "HTTP/1.1");
        assert!(request.has_header("host"));
        assert!(request.body.is_empty());
    }

    #[test]
    fn test_parse_keeps_unknown_method_token() {
        let request = parse_request(b"OPTIONS / HTTP/1.0\r\n\r\n").unwrap();
        assert_eq!(request.method, "OPTIONS");
    }

    #[test]
    fn test_parse_body_with_content_length() {
        let raw = b"POST /items HTTP/1.1\r\nHost: x\r\nContent-Length: 7\r\n\r\n{\"a\":1}trailing";
        let request = parse_request(raw).unwrap();
        assert_eq!(request.body, b"{\"a\":1}");
    }

    #[test]
    fn test_form_fields_only_for_write_methods() {
        let raw = b"POST /items HTTP/1.1\r\nHost: x\r\nContent-Type: application/x-www-form-urlencoded\r\n\r\nname=box&qty=2";
        let request = parse_request(raw).unwrap();
        let fields = request.fields();
        assert_eq!(fields.get("name").unwrap(), "box");
        assert_eq!(fields.get("qty").unwrap(), "2");

        let raw = b"GET /items HTTP/1.1\r\nHost: x\r\nContent-Type: application/x-www-form-urlencoded\r\n\r\nname=box";
        assert!(parse_request(raw).unwrap().fields().is_empty());
    }

    #[test]
    fn test_json_body_has_no_fields() {
        let raw = b"PUT /items HTTP/1.1\r\nHost: x\r\nContent-Type: application/json\r\n\r\n{}";
        assert!(parse_request(raw).unwrap().fields().is_empty());
    }

    #[test]
    fn test_missing_host_header() {
        let result = parse_request(b"GET /index.html HTTP/1.1\r\n\r\n");
        assert!(matches!(result, Err(Error::MissingHeader("Host"))));
    }

    #[test]
    fn test_invalid_http_version() {
        let result = parse_request(b"GET /index.html HTTP/9.9\r\nHost: example.com\r\n\r\n");
        assert!(matches!(result, Err(Error::InvalidVersion(ref v)) if v == "HTTP/9.9"));
    }

    #[test]
    fn test_invalid_header_format() {
        let result = parse_request(b"GET /index.html HTTP/1.1\r\nInvalidHeader\r\n\r\n");
        assert!(matches!(result, Err(Error::InvalidHeaderFormat(_))));
    }

    #[test]
    fn test_empty_request() {
        assert!(matches!(parse_request(b""), Err(Error::EmptyRequest)));
    }

    #[test]
    fn test_incomplete_request_line() {
        assert!(matches!(parse_request(b"GET\r\n"), Err(Error::MalformedRequestLine(_))));
    }

    #[test]
    fn test_non_utf8_head() {
        let result = parse_request(b"GET /caf\xe9 HTTP/1.0\r\n\r\n");
        assert!(matches!(result, Err(Error::NonUtf8Head)));
    }

    #[test]
    fn test_relative_path_is_invalid() {
        let result = parse_request(b"GET index.html HTTP/1.0\r\n\r\n");
        assert!(matches!(result, Err(Error::InvalidPath(ref target)) if target == "index.html"));
    }
}
