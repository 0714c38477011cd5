use tracing::{error, info};

use crate::PUSHOVER_API_URL;
use crate::config::Credentials;

/// Pushover sound played for every notification.
const NOTIFY_SOUND: &str = "cosmic";

/// Label attached to the listing link in a notification.
const URL_TITLE: &str = "View Listing";

/// Pushover message priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    /// Silent delivery, used for the startup message.
    Silent,
    /// High priority, used for new-listing alerts.
    High,
}

impl Priority {
    fn wire_value(self) -> u8 {
        match self {
            Self::Silent => 0,
            Self::High => 1,
        }
    }
}

/// Sends push notifications through Pushover.
///
/// Delivery failures are logged and swallowed; a lost notification never
/// takes the monitor down.
pub struct Notifier {
    http: reqwest::Client,
    token: String,
    user: String,
}

impl Notifier {
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: credentials.pushover_token.clone(),
            user: credentials.pushover_user.clone(),
        }
    }

    /// Send one notification, optionally carrying a link to the listing.
    pub async fn send(&self, title: &str, message: &str, url: Option<&str>, priority: Priority) {
        let mut form: Vec<(&str, String)> = vec![
            ("token", self.token.clone()),
            ("user", self.user.clone()),
            ("title", title.to_string()),
            ("message", message.to_string()),
            ("priority", priority.wire_value().to_string()),
            ("sound", NOTIFY_SOUND.to_string()),
        ];
        if let Some(url) = url {
            form.push(("url", url.to_string()));
            form.push(("url_title", URL_TITLE.to_string()));
        }

        match self.http.post(PUSHOVER_API_URL).form(&form).send().await {
            Ok(response) if response.status().is_success() => {
                info!("Pushover notification sent successfully");
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                error!("Pushover rejected notification: HTTP {status}, body: {body}");
            }
            Err(e) => {
                error!("Error sending Pushover notification: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_wire_values() {
        assert_eq!(Priority::Silent.wire_value(), 0);
        assert_eq!(Priority::High.wire_value(), 1);
    }
}
