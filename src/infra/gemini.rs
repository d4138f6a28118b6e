//! Thin asynchronous client for the Gemini `generateContent` API.
//!
//! - Asks the model for today's Mandi price of a crop, grounded with Google Search.
//! - Parses the JSON object out of the model's text and collects cited source URLs.
//! - No caching and no retries; every call hits the API.

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::domain::{
    InsightError, MarketData, MarketInsightProvider, MarketTrend, PersistedSettings,
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_PRICE_UNIT: &str = "INR/Quintal";
const USER_AGENT: &str = concat!("agroprofit/", env!("CARGO_PKG_VERSION"));

/// Resolved provider settings after layering defaults, environment and saved settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ProviderConfig {
    /// Layers `lookup` (usually the process environment) and then `saved` over the defaults.
    /// Blank values never override.
    pub fn layered<F>(lookup: F, saved: &PersistedSettings) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let env_key = non_blank(lookup("GEMINI_API_KEY")).or_else(|| non_blank(lookup("API_KEY")));
        if let Some(key) = env_key {
            config.api_key = Some(key);
        }
        if let Some(model) = non_blank(lookup("GEMINI_MODEL")) {
            config.model = model;
        }
        if let Some(base) = non_blank(lookup("GEMINI_BASE_URL")) {
            config.base_url = base;
        }

        if let Some(key) = non_blank(saved.api_key.clone()) {
            config.api_key = Some(key);
        }
        if let Some(model) = non_blank(saved.model.clone()) {
            config.model = model;
        }
        if let Some(base) = non_blank(saved.base_url.clone()) {
            config.base_url = base;
        }

        config
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: Url,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, InsightError> {
        let api_key = config.api_key.clone().ok_or(InsightError::MissingApiKey)?;
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url,
            model: config.model.clone(),
            api_key,
        })
    }

    fn endpoint(&self) -> Result<Url, url::ParseError> {
        self.base_url
            .join(&format!("models/{}:generateContent", self.model))
    }

    async fn generate(&self, prompt: String) -> Result<GenerateContentResponse, InsightError> {
        let url = self.endpoint()?;
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
        };

        info!("[gemini] Requesting market insight from {url}");
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = api_error_message(&raw)
                .unwrap_or_else(|| format!("market service returned HTTP {}", status.as_u16()));
            warn!("[gemini] Request failed ({status}): {message}");
            return Err(InsightError::Api(message));
        }

        Ok(response.json::<GenerateContentResponse>().await?)
    }
}

impl MarketInsightProvider for GeminiClient {
    async fn fetch_market_insights(&self, crop_name: &str) -> Result<MarketData, InsightError> {
        let response = self.generate(build_prompt(crop_name)).await?;
        let data = parse_market_data(response, crop_name, &now_rfc3339())?;
        info!(
            "[gemini] {} priced at {:.2} {} ({} sources, trend {})",
            data.crop_name,
            data.current_price,
            data.price_unit,
            data.source_urls.len(),
            data.market_trend.label()
        );
        Ok(data)
    }
}

fn build_prompt(crop_name: &str) -> String {
    format!(
        "Find the latest wholesale Mandi price in India for the crop \"{crop}\". \
         Quote the price in INR per Quintal (100 kg), using the most recent data you can find \
         on agmarknet or comparable mandi price sources. \
         Reply with only a JSON object with these fields: \
         \"cropName\" (string), \"currentPrice\" (number, INR per Quintal), \
         \"priceUnit\" (string, e.g. \"INR/Quintal\"), \
         \"marketTrend\" (one of \"Up\", \"Down\", \"Stable\"), \
         \"analysis\" (two or three sentences on what is driving the price), \
         \"lastUpdated\" (date of the quoted price, ISO 8601).",
        crop = crop_name.trim()
    )
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string())
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    tools: Vec<Tool>,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Serialize)]
struct GoogleSearch {}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Default, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebSource>,
}

#[derive(Debug, Default, Deserialize)]
struct WebSource {
    #[serde(default)]
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

fn api_error_message(raw: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorEnvelope>(raw)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|message| !message.trim().is_empty())
}

/// Shape the model is asked to reply with. Everything but the price is optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsightDto {
    #[serde(default)]
    crop_name: Option<String>,
    #[serde(deserialize_with = "number_from_json")]
    current_price: f64,
    #[serde(default)]
    price_unit: Option<String>,
    #[serde(default)]
    market_trend: Option<String>,
    #[serde(default)]
    analysis: Option<String>,
    #[serde(default)]
    last_updated: Option<String>,
}

fn parse_market_data(
    response: GenerateContentResponse,
    crop_name: &str,
    now: &str,
) -> Result<MarketData, InsightError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| InsightError::MalformedResponse("no candidates returned".into()))?;

    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let dto = read_insight(&text)?;

    if !dto.current_price.is_finite() || dto.current_price < 0.0 {
        return Err(InsightError::MalformedResponse(format!(
            "invalid price {}",
            dto.current_price
        )));
    }

    let source_urls = candidate
        .grounding_metadata
        .map(|meta| source_urls(meta.grounding_chunks))
        .unwrap_or_default();

    Ok(MarketData {
        crop_name: dto
            .crop_name
            .and_then(|name| non_blank(Some(name)))
            .unwrap_or_else(|| crop_name.trim().to_string()),
        current_price: dto.current_price,
        price_unit: dto
            .price_unit
            .and_then(|unit| non_blank(Some(unit)))
            .unwrap_or_else(|| DEFAULT_PRICE_UNIT.to_string()),
        source_urls,
        last_updated: dto
            .last_updated
            .and_then(|stamp| non_blank(Some(stamp)))
            .unwrap_or_else(|| now.to_string()),
        market_trend: dto
            .market_trend
            .as_deref()
            .map(MarketTrend::from_label)
            .unwrap_or_default(),
        analysis: dto.analysis.unwrap_or_default(),
    })
}

fn source_urls(chunks: Vec<GroundingChunk>) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for uri in chunks
        .into_iter()
        .filter_map(|chunk| chunk.web.and_then(|web| web.uri))
    {
        if !uri.is_empty() && !urls.contains(&uri) {
            urls.push(uri);
        }
    }
    urls
}

/// Reads the first JSON object in the reply. Code fences before it and
/// citation text after it are ignored.
fn read_insight(text: &str) -> Result<InsightDto, InsightError> {
    let start = text
        .find('{')
        .ok_or_else(|| InsightError::MalformedResponse("no JSON object in reply".into()))?;
    debug!("[gemini] Raw insight reply: {}", &text[start..]);

    serde_json::Deserializer::from_str(&text[start..])
        .into_iter::<InsightDto>()
        .next()
        .ok_or_else(|| InsightError::MalformedResponse("no JSON object in reply".into()))?
        .map_err(|err| InsightError::MalformedResponse(err.to_string()))
}

/// Extracts the single number in a price label such as "Rs. 2,150" or
/// "INR 2150/quintal". Ranges and other multi-number labels yield `None`.
fn price_from_text(text: &str) -> Option<f64> {
    let chars: Vec<char> = text.chars().collect();
    let mut found: Option<String> = None;
    let mut i = 0;

    while i < chars.len() {
        let negative = chars[i] == '-'
            && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit())
            && (i == 0 || !chars[i - 1].is_ascii_alphanumeric());
        if !negative && !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        if found.is_some() {
            return None;
        }

        let mut token = String::new();
        if negative {
            token.push('-');
            i += 1;
        }
        while i < chars.len() {
            let c = chars[i];
            let next_is_digit = chars.get(i + 1).is_some_and(|c| c.is_ascii_digit());
            if c.is_ascii_digit() {
                token.push(c);
            } else if c == ',' && next_is_digit {
                // grouping separator
            } else if c == '.' && next_is_digit && !token.contains('.') {
                token.push(c);
            } else {
                break;
            }
            i += 1;
        }
        found = Some(token);
    }

    found?.parse().ok()
}

fn number_from_json<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct NumberOrString;

    impl<'de> serde::de::Visitor<'de> for NumberOrString {
        type Value = f64;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a number or numeric string")
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value as f64)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value as f64)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            price_from_text(value).ok_or_else(|| E::custom(format!("not a price: {value}")))
        }
    }

    deserializer.deserialize_any(NumberOrString)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const NOW: &str = "2024-06-01T00:00:00Z";

    fn response(text: &str, uris: &[&str]) -> GenerateContentResponse {
        let chunks = uris
            .iter()
            .map(|uri| serde_json::json!({ "web": { "uri": uri, "title": "source" } }))
            .collect::<Vec<_>>();
        let raw = serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "groundingMetadata": { "groundingChunks": chunks }
            }]
        });
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_parses_fenced_json_with_sources() {
        let text = concat!(
            "```json\n",
            r#"{"cropName":"Tomato","currentPrice":1450,"priceUnit":"INR/Quintal","#,
            r#""marketTrend":"Up","analysis":"Monsoon delays.","lastUpdated":"2024-05-30"}"#,
            "\n```",
        );
        let data = parse_market_data(
            response(text, &["https://a.example", "https://b.example", "https://a.example"]),
            "tomato",
            NOW,
        )
        .unwrap();

        assert_eq!(data.crop_name, "Tomato");
        assert_eq!(data.current_price, 1450.0);
        assert_eq!(data.market_trend, MarketTrend::Up);
        assert_eq!(data.last_updated, "2024-05-30");
        assert_eq!(
            data.source_urls,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let data = parse_market_data(
            response(
                r#"Here you go: {"currentPrice": "₹2,150", "marketTrend": "flat"}"#,
                &[],
            ),
            " Bajra ",
            NOW,
        )
        .unwrap();

        assert_eq!(data.crop_name, "Bajra");
        assert_eq!(data.current_price, 2150.0);
        assert_eq!(data.price_unit, DEFAULT_PRICE_UNIT);
        assert_eq!(data.market_trend, MarketTrend::Stable);
        assert_eq!(data.last_updated, NOW);
        assert!(data.source_urls.is_empty());
    }

    #[test]
    fn test_rejects_negative_price() {
        let err = parse_market_data(response("{\"currentPrice\": -5}", &[]), "Jowar", NOW)
            .unwrap_err();
        assert!(matches!(err, InsightError::MalformedResponse(_)));

        let err = parse_market_data(response("{\"currentPrice\": \"-2,150\"}", &[]), "Jowar", NOW)
            .unwrap_err();
        assert!(matches!(err, InsightError::MalformedResponse(_)));
    }

    fn price_of(label: &str) -> Result<f64, InsightError> {
        let text = format!("{{\"currentPrice\": \"{label}\"}}");
        parse_market_data(response(&text, &[]), "Wheat", NOW).map(|data| data.current_price)
    }

    #[test]
    fn test_price_labels_keep_their_value() {
        assert_eq!(price_of("Rs. 2,150").unwrap(), 2150.0);
        assert_eq!(price_of("INR 2150/quintal").unwrap(), 2150.0);
        assert_eq!(price_of("₹12,34,567.50").unwrap(), 1234567.5);
        assert_eq!(price_of("2150.").unwrap(), 2150.0);
    }

    #[test]
    fn test_ambiguous_price_labels_are_rejected() {
        for label in ["1,800-2,000", "Rs. 1800 to 2000", "not available", ""] {
            assert!(
                matches!(price_of(label), Err(InsightError::MalformedResponse(_))),
                "{label} should be rejected"
            );
        }
    }

    #[test]
    fn test_text_after_json_is_ignored() {
        let text = "```json\n{\"currentPrice\": 2150}\n```\nSources: {agmarknet}";
        let data = parse_market_data(response(text, &[]), "Wheat", NOW).unwrap();
        assert_eq!(data.current_price, 2150.0);
    }

    #[test]
    fn test_rejects_reply_without_json() {
        let err = parse_market_data(response("I could not find a price.", &[]), "Jowar", NOW)
            .unwrap_err();
        assert!(matches!(err, InsightError::MalformedResponse(_)));

        let err = parse_market_data(GenerateContentResponse::default(), "Jowar", NOW).unwrap_err();
        assert!(matches!(err, InsightError::MalformedResponse(_)));
    }

    #[test]
    fn test_api_error_message_extraction() {
        let raw = r#"{"error": {"code": 400, "message": "API key not valid."}}"#;
        assert_eq!(api_error_message(raw), Some("API key not valid.".to_string()));
        assert_eq!(api_error_message("<html>bad gateway</html>"), None);
    }

    #[test]
    fn test_config_layering() {
        let env: HashMap<&str, &str> = [
            ("GEMINI_API_KEY", "env-key"),
            ("GEMINI_MODEL", "gemini-env"),
        ]
        .into_iter()
        .collect();
        let lookup = |name: &str| env.get(name).map(|v| v.to_string());

        let from_env = ProviderConfig::layered(lookup, &PersistedSettings::default());
        assert_eq!(from_env.api_key.as_deref(), Some("env-key"));
        assert_eq!(from_env.model, "gemini-env");
        assert_eq!(from_env.base_url, DEFAULT_BASE_URL);

        let saved = PersistedSettings {
            api_key: Some("saved-key".to_string()),
            model: Some("   ".to_string()),
            base_url: None,
        };
        let layered = ProviderConfig::layered(lookup, &saved);
        assert_eq!(layered.api_key.as_deref(), Some("saved-key"));
        assert_eq!(layered.model, "gemini-env");
    }

    #[test]
    fn test_api_key_fallback_variable() {
        let lookup = |name: &str| (name == "API_KEY").then(|| "legacy".to_string());
        let config = ProviderConfig::layered(lookup, &PersistedSettings::default());
        assert_eq!(config.api_key.as_deref(), Some("legacy"));
    }

    #[test]
    fn test_client_requires_api_key() {
        let err = GeminiClient::new(&ProviderConfig::default()).err().unwrap();
        assert!(matches!(err, InsightError::MissingApiKey));
    }

    #[test]
    fn test_endpoint_includes_model() {
        let config = ProviderConfig {
            api_key: Some("k".to_string()),
            model: "gemini-test".to_string(),
            base_url: "https://example.test/v1beta".to_string(),
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint().unwrap().as_str(),
            "https://example.test/v1beta/models/gemini-test:generateContent"
        );
    }
}
