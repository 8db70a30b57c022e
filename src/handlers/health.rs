use crate::api_gw_request::Request;
use crate::api_gw_response::ApiGatewayResponse;
use crate::config::Config;
use crate::Error;
use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use serde::Serialize;

#[derive(Serialize, Debug)]
struct Health {
    ok: bool,
    /// ISO-8601 in UTC, e.g. `2026-10-18T09:15:02.123456+00:00`
    time: String,
}

/// Formats `time` as ISO-8601 with microseconds, omitting the fraction if it is zero.
fn iso_timestamp(time: DateTime<Utc>) -> String {
    let format = if time.nanosecond() / 1_000 == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };

    time.to_rfc3339_opts(format, false)
}

/// Liveness check with the current server time.
pub(crate) fn health(_req: &Request, config: &Config) -> Result<ApiGatewayResponse, Error> {
    let body = Health {
        ok: true,
        time: iso_timestamp(Utc::now()),
    };

    ApiGatewayResponse::json(200, &body, config)
}

#[test]
fn health_time_is_utc_iso8601() {
    let resp = health(&crate::router::test_request("GET", "/health"), &Config::default()).unwrap();
    assert_eq!(resp.status_code, 200);
    assert!(resp.body.starts_with(r#"{"ok": true, "time": ""#));

    let body: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
    let time = body["time"].as_str().unwrap();
    assert!(time.ends_with("+00:00"));
    chrono::DateTime::parse_from_rfc3339(time).unwrap();
}

#[test]
fn iso_timestamp_fraction() {
    use chrono::TimeZone;

    let time = Utc.with_ymd_and_hms(2026, 10, 18, 9, 15, 2).unwrap();
    assert_eq!(iso_timestamp(time), "2026-10-18T09:15:02+00:00");

    let time = time.with_nanosecond(123_456_789).unwrap();
    assert_eq!(iso_timestamp(time), "2026-10-18T09:15:02.123456+00:00");

    let time = time.with_nanosecond(5_000).unwrap();
    assert_eq!(iso_timestamp(time), "2026-10-18T09:15:02.000005+00:00");

    // sub-microsecond remainders are dropped
    let time = time.with_nanosecond(999).unwrap();
    assert_eq!(iso_timestamp(time), "2026-10-18T09:15:02+00:00");
}
