use h1_wire::client::decode::DEFAULT_CONTENT_TYPE;
use h1_wire::client::{content_type, cookies, status, Headers};
use h1_wire::Error;
use pretty_assertions::assert_eq;

const HEAD: &[u8] = b"HTTP/1.1 200 OK\r\n\
    Content-Type: text/plain\r\n\
    Set-Cookie: path=/; domain=.google.com\r\n\
    SET-COOKIE: path=/foo\r\n\
    X-Empty:";

#[test]
fn reads_the_status_code() {
    assert_eq!(status(HEAD).unwrap(), 200);
    assert_eq!(status(b"HTTP/1.0 404 Not Found").unwrap(), 404);
    assert_eq!(status(b"HTTP/1.1 301 Moved\r\nLocation: /x").unwrap(), 301);
}

#[test]
fn garbage_is_not_a_status() {
    assert!(matches!(status(b"hello"), Err(Error::Format(_))));
    assert!(matches!(status(b""), Err(Error::Format(_))));
}

#[test]
fn header_names_are_case_insensitive() {
    let headers = Headers::parse(HEAD).unwrap();
    assert_eq!(headers.first("content-type"), Some("text/plain"));
    assert_eq!(headers.first("CONTENT-TYPE"), Some("text/plain"));
    assert_eq!(headers.get("set-cookie").unwrap().len(), 2);
    assert_eq!(headers.first("x-empty"), Some(""));
    assert!(!headers.contains("location"));
    assert_eq!(headers.len(), 3);
}

fn crowded_head(extra: &str) -> Vec<u8> {
    let mut head = String::from("HTTP/1.1 200 OK\r\n");
    for n in 0..130 {
        head.push_str(&format!("X-H{}: v\r\n", n));
    }
    head.push_str(extra);
    head.into_bytes()
}

#[test]
fn status_ignores_the_header_lines() {
    assert_eq!(status(&crowded_head("Bad Name: x")).unwrap(), 200);
}

#[test]
fn any_number_of_headers() {
    let headers = Headers::parse(&crowded_head("Location: /next")).unwrap();
    assert_eq!(headers.len(), 131);
    assert_eq!(headers.first("x-h129"), Some("v"));
    assert_eq!(headers.first("location"), Some("/next"));
}

#[test]
fn header_names_split_on_the_first_colon() {
    let headers =
        Headers::parse(b"HTTP/1.1 200 OK\r\nBad Name: x\r\nLocation: http://a:8080/b").unwrap();
    assert_eq!(headers.first("bad name"), Some("x"));
    assert_eq!(headers.first("location"), Some("http://a:8080/b"));
}

#[test]
fn header_line_without_colon() {
    let parsed = Headers::parse(b"HTTP/1.1 200 OK\r\nno colon here");
    assert!(matches!(parsed, Err(Error::Format(_))));
}

#[test]
fn empty_head_has_no_headers() {
    assert!(Headers::parse(b"").unwrap().is_empty());
    assert!(Headers::parse(b"HTTP/1.1 204 No Content").unwrap().is_empty());
}

#[test]
fn cookies_are_grouped_by_directive() {
    let headers = Headers::parse(HEAD).unwrap();
    let cookies = cookies(&headers).unwrap();
    assert_eq!(cookies["path"], vec!["/".to_owned(), "/foo".to_owned()]);
    assert_eq!(cookies["domain"], vec![".google.com".to_owned()]);
    assert_eq!(cookies.len(), 2);
}

#[test]
fn cookie_flags_have_empty_values() {
    let headers = Headers::parse(b"HTTP/1.1 200 OK\r\nSet-Cookie: id=7; Secure; HttpOnly").unwrap();
    let cookies = cookies(&headers).unwrap();
    assert_eq!(cookies["id"], vec!["7".to_owned()]);
    assert_eq!(cookies["Secure"], vec![String::new()]);
    assert_eq!(cookies["HttpOnly"], vec![String::new()]);
}

#[test]
fn malformed_cookie_directive() {
    let headers = Headers::parse(b"HTTP/1.1 200 OK\r\nSet-Cookie: path=/; 123").unwrap();
    assert!(matches!(cookies(&headers), Err(Error::Format(_))));

    let headers = Headers::parse(b"HTTP/1.1 200 OK\r\nSet-Cookie: a=b=c").unwrap();
    assert!(matches!(cookies(&headers), Err(Error::Format(_))));
}

#[test]
fn no_cookies() {
    let headers = Headers::parse(b"HTTP/1.1 200 OK").unwrap();
    assert!(cookies(&headers).unwrap().is_empty());
}

#[test]
fn content_type_defaults_to_octet_stream() {
    let headers = Headers::parse(HEAD).unwrap();
    assert_eq!(content_type(&headers), vec!["text/plain".to_owned()]);

    let headers = Headers::parse(b"HTTP/1.1 200 OK").unwrap();
    assert_eq!(content_type(&headers), vec![DEFAULT_CONTENT_TYPE.to_owned()]);
}
