// Tests for cURL command import

use leadgather_core::curl::{discovery_steps, parse_curl_command};
use leadgather_scanner::FetchConfig;

const COPIED: &str = r#"curl 'https://api.example.com/v1/listings?location=California&page=1' \
  -H 'authority: www.example.com' \
  -H 'accept: application/json' \
  -H 'referer: https://www.example.com/california-businesses-for-sale/' \
  -H 'user-agent: Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36' \
  -H 'accept-encoding: gzip, deflate, br' \
  --compressed"#;

#[test]
fn test_parse_url_and_headers() {
    let request = parse_curl_command(COPIED).unwrap();

    assert_eq!(
        request.url,
        "https://api.example.com/v1/listings?location=California&page=1"
    );
    assert_eq!(request.headers.len(), 5);
    assert_eq!(request.header("Accept"), Some("application/json"));
    assert_eq!(
        request.header("referer"),
        Some("https://www.example.com/california-businesses-for-sale/")
    );
}

#[test]
fn test_header_url_is_not_mistaken_for_target() {
    let request = parse_curl_command(
        r#"curl -H "Referer: https://www.example.com/" "https://www.example.com/search" --compressed"#,
    )
    .unwrap();

    assert_eq!(request.url, "https://www.example.com/search");
    assert_eq!(request.header("referer"), Some("https://www.example.com/"));
}

#[test]
fn test_long_header_flag_and_unquoted_url() {
    let request =
        parse_curl_command("curl https://www.example.com/x --header 'Cookie: a=1; b=2'").unwrap();
    assert_eq!(request.url, "https://www.example.com/x");
    assert_eq!(request.header("cookie"), Some("a=1; b=2"));
}

#[test]
fn test_rejects_non_curl_and_missing_url() {
    assert!(parse_curl_command("wget https://www.example.com").is_err());
    assert!(parse_curl_command("curl -H 'accept: */*'").is_err());
}

#[test]
fn test_apply_to_fetch_config() {
    let request = parse_curl_command(COPIED).unwrap();
    let config = request.apply_to(FetchConfig::default());

    assert_eq!(
        config.user_agent,
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
    );
    let names: Vec<&str> = config.headers.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["authority", "accept", "referer"]);
    assert!(config.header_map().is_ok());
}

#[test]
fn test_discovery_steps_mention_site_and_commands() {
    let steps = discovery_steps("https://www.example.com");
    assert!(steps.contains("Open https://www.example.com in Chrome"));
    assert!(steps.contains("Copy as cURL"));
    assert!(steps.contains("leadgather scrape --from-curl"));
}

#[test]
fn test_cookie_flag_becomes_cookie_header() {
    let request = parse_curl_command(
        r#"curl 'https://www.example.com/search' -H 'accept: text/html' -b 'session=abc123; _px=zz' -H 'user-agent: Mozilla/5.0'"#,
    )
    .unwrap();

    assert_eq!(request.header("cookie"), Some("session=abc123; _px=zz"));

    let config = request.apply_to(FetchConfig::default());
    let headers = config.header_map().unwrap();
    assert_eq!(headers["cookie"], "session=abc123; _px=zz");
}

#[test]
fn test_repeated_cookie_flags_are_joined() {
    let request = parse_curl_command(
        "curl https://www.example.com/ --cookie 'a=1' -b \"b=2\" -b cookies.txt",
    )
    .unwrap();
    assert_eq!(request.header("cookie"), Some("a=1; b=2"));
}

#[test]
fn test_url_inside_request_body_is_not_the_target() {
    let request = parse_curl_command(
        "curl -X POST --data-raw 'next=https://other.example/x' 'https://api.example.com/v1/listings'",
    )
    .unwrap();
    assert_eq!(request.url, "https://api.example.com/v1/listings");
}

#[test]
fn test_dollar_quoted_body_and_url_flag() {
    let request = parse_curl_command(
        "curl --data-raw $'{\"q\":\"https://other.example/\"}' --url 'https://api.example.com/search' -A 'TestAgent/1.0'",
    )
    .unwrap();
    assert_eq!(request.url, "https://api.example.com/search");
    assert_eq!(request.header("user-agent"), Some("TestAgent/1.0"));
}
