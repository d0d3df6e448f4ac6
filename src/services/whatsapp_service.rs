//! RappelSend WhatsApp dispatch. Best-effort only: every failure path logs
//! and returns false, nothing propagates to the calling operation.

use std::time::Duration;

use serde_json::json;

const RAPPEL_API_URL: &str = "https://api.rappelsend.com/v1";
const SEND_TIMEOUT: Duration = Duration::from_secs(5);

pub struct WhatsAppService {
    client: reqwest::Client,
    client_id: Option<String>,
    api_key: Option<String>,
}

impl WhatsAppService {
    pub fn new(client_id: Option<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id,
            api_key,
        }
    }

    pub async fn send(&self, phone: &str, message: &str) -> bool {
        let (Some(client_id), Some(api_key)) = (&self.client_id, &self.api_key) else {
            tracing::warn!("RappelSend credentials not configured, dropping message");
            return false;
        };

        let formatted_phone = format_phone_number(phone);

        let response = self
            .client
            .post(format!("{}/messages", RAPPEL_API_URL))
            .header("X-Client-ID", client_id)
            .header("X-API-Key", api_key)
            .json(&json!({
                "to": formatted_phone,
                "message": message,
                "type": "text",
            }))
            .timeout(SEND_TIMEOUT)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!("RappelSend API error: status {}", response.status());
                false
            }
            Err(err) => {
                tracing::warn!("Error sending WhatsApp message: {}", err);
                false
            }
        }
    }
}

/// Normalize to a country-code-prefixed digit string: strip non-digits,
/// replace a leading "0" with "972", prepend "972" when missing.
pub fn format_phone_number(phone: &str) -> String {
    let cleaned: String = phone.chars().filter(char::is_ascii_digit).collect();

    if let Some(rest) = cleaned.strip_prefix('0') {
        return format!("972{}", rest);
    }

    if cleaned.starts_with("972") {
        cleaned
    } else {
        format!("972{}", cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_zero_becomes_country_prefix() {
        assert_eq!(format_phone_number("0501234567"), "972501234567");
    }

    #[test]
    fn already_prefixed_number_passes_through() {
        assert_eq!(format_phone_number("972501234567"), "972501234567");
    }

    #[test]
    fn formatting_characters_are_stripped() {
        assert_eq!(format_phone_number("+972 50-123-4567"), "972501234567");
        assert_eq!(format_phone_number("050 123 4567"), "972501234567");
    }

    #[test]
    fn bare_number_gets_prefixed() {
        assert_eq!(format_phone_number("501234567"), "972501234567");
    }
}
