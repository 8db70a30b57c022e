use crate::config::Config;
use crate::Error;
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::Value;
use std::collections::HashMap;
use std::io;

/// The full response structure for sending back to API Gateway
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiGatewayResponse {
    pub is_base64_encoded: bool,
    pub status_code: u32,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl ApiGatewayResponse {
    /// Converts itself to serde_json::Value
    /// # Panics
    /// May panic if the conversion fails.
    pub(crate) fn to_value(self) -> Value {
        serde_json::to_value(self).expect("Failed to serialize response")
    }

    /// Prepares the response with the CORS headers from `config`. Any of `headers` replace the CORS entries with the same name.
    pub(crate) fn new(status_code: u32, body: String, headers: HashMap<String, String>, config: &Config) -> Self {
        let mut merged = config.cors_headers.clone();
        merged.extend(headers);

        ApiGatewayResponse {
            is_base64_encoded: false,
            status_code,
            headers: merged,
            body,
        }
    }

    /// A response with `body` rendered as JSON text.
    pub(crate) fn json<T: Serialize>(status_code: u32, body: &T, config: &Config) -> Result<Self, Error> {
        Ok(Self::new(status_code, to_json_text(body)?, HashMap::new(), config))
    }

    /// A response with an empty body, e.g. 204.
    pub(crate) fn empty(status_code: u32, config: &Config) -> Self {
        Self::new(status_code, String::new(), HashMap::new(), config)
    }
}

/// Renders `value` as JSON text in the format clients of this API already parse:
/// `, ` and `: ` separators with all non-ASCII chars escaped as `\uXXXX`.
pub(crate) fn to_json_text<T: Serialize + ?Sized>(value: &T) -> Result<String, Error> {
    let mut writer = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut writer, SpacedAsciiFormatter);
    value.serialize(&mut ser)?;

    Ok(String::from_utf8(writer)?)
}

/// A compact formatter with a space after every `,` and `:` and ASCII-only output.
struct SpacedAsciiFormatter;

impl Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        // printable ASCII goes as-is, DEL and everything above 0x7F is escaped as UTF-16 code units
        let mut units = [0u16; 2];
        for c in fragment.chars() {
            if c.is_ascii() && c != '\x7f' {
                writer.write_all(&[c as u8])?;
            } else {
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }

        Ok(())
    }
}

#[test]
fn cors_headers_are_always_present() {
    let config = Config::default();
    let resp = ApiGatewayResponse::empty(204, &config);

    assert_eq!(resp.headers, config.cors_headers);
    assert_eq!(resp.body, "");
    assert!(!resp.is_base64_encoded);
}

#[test]
fn handler_headers_override_cors() {
    let config = Config::default();
    let mut headers = HashMap::new();
    headers.insert("Access-Control-Allow-Origin".to_owned(), "https://example.com".to_owned());
    headers.insert("Content-Type".to_owned(), "text/plain".to_owned());

    let resp = ApiGatewayResponse::new(200, "hi".to_owned(), headers, &config);

    assert_eq!(resp.headers.len(), 4);
    assert_eq!(resp.headers["Access-Control-Allow-Origin"], "https://example.com");
    assert_eq!(resp.headers["Access-Control-Allow-Methods"], Config::ALLOWED_METHODS);
    assert_eq!(resp.headers["Content-Type"], "text/plain");
}

#[test]
fn envelope_field_names() {
    let resp = ApiGatewayResponse::empty(204, &Config::default()).to_value();

    assert_eq!(resp["statusCode"], 204);
    assert_eq!(resp["body"], "");
    assert_eq!(resp["isBase64Encoded"], false);
    assert_eq!(resp["headers"]["Access-Control-Allow-Origin"], "*");
}

#[test]
fn json_text_format() {
    let value = serde_json::json!({"message": "Hello 👋", "paths": ["/", "/health"], "n": null, "ok": true});

    assert_eq!(
        to_json_text(&value).unwrap(),
        r#"{"message": "Hello \ud83d\udc4b", "paths": ["/", "/health"], "n": null, "ok": true}"#
    );
}

#[test]
fn json_text_escapes() {
    assert_eq!(to_json_text("I’ll").unwrap(), r#""I\u2019ll""#);
    assert_eq!(to_json_text("é\u{7f}").unwrap(), r#""\u00e9\u007f""#);
    assert_eq!(to_json_text("a\"b\\c\n").unwrap(), r#""a\"b\\c\n""#);
    assert_eq!(to_json_text(&serde_json::json!({})).unwrap(), "{}");
    assert_eq!(to_json_text(&serde_json::json!([])).unwrap(), "[]");
}
