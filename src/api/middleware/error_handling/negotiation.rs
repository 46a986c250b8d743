use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

/// Formats an error response can be rendered in, in offer order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    Json,
}

impl ResponseFormat {
    pub const OFFERS: [ResponseFormat; 2] = [ResponseFormat::Text, ResponseFormat::Json];

    fn media_type(self) -> (&'static str, &'static str) {
        match self {
            ResponseFormat::Text => ("text", "plain"),
            ResponseFormat::Json => ("application", "json"),
        }
    }
}

/// Response side of the terminal handler
pub trait ResponseContext {
    /// Set the HTTP status
    fn status(&mut self, status: StatusCode);

    /// Write the body in the format the client accepts; exactly one of the
    /// two renderers runs
    fn format<T, J>(&mut self, text: T, json: J)
    where
        T: FnOnce() -> String,
        J: FnOnce() -> Value;
}

struct MediaRange {
    kind: String,
    subtype: String,
    quality: f32,
    order: usize,
}

fn parse_accept(accept: &str) -> Vec<MediaRange> {
    accept
        .split(',')
        .enumerate()
        .filter_map(|(order, entry)| {
            let mut parts = entry.split(';');
            let media = parts.next()?.trim().to_ascii_lowercase();
            if media.is_empty() {
                return None;
            }

            let (kind, subtype) = match media.split_once('/') {
                Some((kind, subtype)) => (kind.trim().to_string(), subtype.trim().to_string()),
                None if media == "*" => ("*".to_string(), "*".to_string()),
                None => return None,
            };

            let quality = parts
                .filter_map(|param| param.split_once('='))
                .find(|(key, _)| key.trim().eq_ignore_ascii_case("q"))
                .and_then(|(_, value)| value.trim().parse::<f32>().ok())
                // q=NaN parses, but never ranks as acceptable
                .map(|quality| if quality.is_nan() { 0.0 } else { quality })
                .unwrap_or(1.0);

            Some(MediaRange {
                kind,
                subtype,
                quality,
                order,
            })
        })
        .collect()
}

/// (specificity, quality, order) of the best range matching `offer`
fn priority(offer: ResponseFormat, ranges: &[MediaRange]) -> Option<(u8, f32, usize)> {
    let (kind, subtype) = offer.media_type();

    ranges
        .iter()
        .filter_map(|range| {
            let kind_exact = range.kind == kind;
            let subtype_exact = range.subtype == subtype;
            if !(kind_exact || range.kind == "*") || !(subtype_exact || range.subtype == "*") {
                return None;
            }
            let specificity = (kind_exact as u8) * 4 + (subtype_exact as u8) * 2;
            Some((specificity, range.quality, range.order))
        })
        .reduce(|best, candidate| {
            let better = candidate.0 > best.0
                || (candidate.0 == best.0 && candidate.1 > best.1)
                || (candidate.0 == best.0 && candidate.1 == best.1 && candidate.2 < best.2);
            if better {
                candidate
            } else {
                best
            }
        })
}

/// Pick the offer the client prefers.
///
/// Higher quality wins, then the more specific range, then the range listed
/// first in the header, then offer order. A missing or blank header accepts
/// the first offer. `None` means nothing is acceptable.
pub fn negotiate(accept: Option<&str>, offers: &[ResponseFormat]) -> Option<ResponseFormat> {
    let accept = match accept.map(str::trim) {
        Some(accept) if !accept.is_empty() => accept,
        _ => return offers.first().copied(),
    };
    let ranges = parse_accept(accept);

    let mut best: Option<(ResponseFormat, (u8, f32, usize), usize)> = None;
    for (index, offer) in offers.iter().enumerate() {
        let Some(found) = priority(*offer, &ranges) else {
            continue;
        };
        if found.1 <= 0.0 {
            continue;
        }

        let replace = match &best {
            None => true,
            Some((_, current, current_index)) => {
                found.1 > current.1
                    || (found.1 == current.1 && found.0 > current.0)
                    || (found.1 == current.1 && found.0 == current.0 && found.2 < current.2)
                    || (found.1 == current.1
                        && found.0 == current.0
                        && found.2 == current.2
                        && index < *current_index)
            }
        };
        if replace {
            best = Some((*offer, found, index));
        }
    }

    best.map(|(offer, _, _)| offer)
}

#[derive(Debug, Clone, PartialEq)]
enum NegotiatedBody {
    Text(String),
    Json(Value),
    NotAcceptable,
}

/// axum-backed response context.
///
/// Holds the request's `Accept` header, collects status and body, and turns
/// into a `Response` once the terminal handler is done.
#[derive(Debug, Clone)]
pub struct NegotiatedResponse {
    accept: Option<String>,
    status: StatusCode,
    body: Option<NegotiatedBody>,
}

impl NegotiatedResponse {
    pub fn new(accept: Option<&str>) -> Self {
        Self {
            accept: accept.map(str::to_string),
            status: StatusCode::OK,
            body: None,
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::new(
            headers
                .get(header::ACCEPT)
                .and_then(|value| value.to_str().ok()),
        )
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    /// Rendered text body, when the text renderer was chosen
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            Some(NegotiatedBody::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Rendered JSON body, when the JSON renderer was chosen
    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            Some(NegotiatedBody::Json(value)) => Some(value),
            _ => None,
        }
    }
}

impl ResponseContext for NegotiatedResponse {
    fn status(&mut self, status: StatusCode) {
        self.status = status;
    }

    fn format<T, J>(&mut self, text: T, json: J)
    where
        T: FnOnce() -> String,
        J: FnOnce() -> Value,
    {
        let body = match negotiate(self.accept.as_deref(), &ResponseFormat::OFFERS) {
            Some(ResponseFormat::Text) => NegotiatedBody::Text(text()),
            Some(ResponseFormat::Json) => NegotiatedBody::Json(json()),
            None => {
                self.status = StatusCode::NOT_ACCEPTABLE;
                NegotiatedBody::NotAcceptable
            }
        };
        self.body = Some(body);
    }
}

impl IntoResponse for NegotiatedResponse {
    fn into_response(self) -> Response {
        let vary = [(header::VARY, "Accept")];

        match self.body {
            Some(NegotiatedBody::Text(text)) => (
                self.status,
                vary,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                text,
            )
                .into_response(),
            Some(NegotiatedBody::Json(value)) => (self.status, vary, Json(value)).into_response(),
            Some(NegotiatedBody::NotAcceptable) => {
                (StatusCode::NOT_ACCEPTABLE, vary, "Not Acceptable").into_response()
            }
            None => self.status.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const OFFERS: [ResponseFormat; 2] = ResponseFormat::OFFERS;

    #[test]
    fn test_missing_header_picks_first_offer() {
        assert_eq!(negotiate(None, &OFFERS), Some(ResponseFormat::Text));
        assert_eq!(negotiate(Some("  "), &OFFERS), Some(ResponseFormat::Text));
    }

    #[test]
    fn test_exact_matches() {
        assert_eq!(
            negotiate(Some("application/json"), &OFFERS),
            Some(ResponseFormat::Json)
        );
        assert_eq!(
            negotiate(Some("text/plain"), &OFFERS),
            Some(ResponseFormat::Text)
        );
    }

    #[test]
    fn test_quality_values() {
        assert_eq!(
            negotiate(Some("text/plain;q=0.5, application/json"), &OFFERS),
            Some(ResponseFormat::Json)
        );
        assert_eq!(
            negotiate(Some("application/json;q=0, */*"), &OFFERS),
            Some(ResponseFormat::Text)
        );
    }

    #[test]
    fn test_header_order_breaks_ties() {
        assert_eq!(
            negotiate(Some("application/json, text/plain"), &OFFERS),
            Some(ResponseFormat::Json)
        );
        assert_eq!(negotiate(Some("*/*"), &OFFERS), Some(ResponseFormat::Text));
    }

    #[test]
    fn test_browser_style_header_prefers_text() {
        assert_eq!(
            negotiate(
                Some("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
                &OFFERS
            ),
            Some(ResponseFormat::Text)
        );
    }

    #[test]
    fn test_nothing_acceptable() {
        assert_eq!(negotiate(Some("image/png"), &OFFERS), None);
    }

    #[test]
    fn test_nan_quality_is_not_acceptable() {
        assert_eq!(negotiate(Some("text/plain;q=NaN"), &OFFERS), None);
        assert_eq!(
            negotiate(Some("text/plain;q=nan, application/json;q=0.1"), &OFFERS),
            Some(ResponseFormat::Json)
        );
    }

    #[test]
    fn test_format_runs_exactly_one_renderer() {
        let mut res = NegotiatedResponse::new(Some("application/json"));
        res.status(StatusCode::BAD_REQUEST);
        res.format(|| panic!("text renderer must not run"), || json!({"ok": false}));

        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(res.json(), Some(&json!({"ok": false})));
        assert!(res.text().is_none());
    }

    #[test]
    fn test_not_acceptable_response() {
        let mut res = NegotiatedResponse::new(Some("image/png"));
        res.status(StatusCode::NOT_FOUND);
        res.format(|| "text".to_string(), || json!({}));

        let response = res.into_response();
        assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
        assert_eq!(response.headers()[header::VARY], "Accept");
    }
}
