//! Alert formatting and Telegram delivery
//!
//! Accepted candidates are rendered into a fixed Markdown template and
//! POSTed to the Telegram Bot API. Delivery failures are logged and
//! swallowed; the channel can never abort a poll cycle. By default the same
//! pair is re-alerted every cycle it keeps passing; `suppress_repeat_alerts`
//! reduces that to once per process lifetime.

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::TelegramConfig;
use crate::error::{Error, Result};
use crate::screen::types::ScreeningResult;

/// Outbound notification channel boundary
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}

/// Telegram Bot API channel
pub struct TelegramChannel {
    client: Client,
    bot_token: String,
    chat_id: String,
    parse_mode: String,
}

impl TelegramChannel {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
            parse_mode: config.parse_mode.clone(),
        })
    }

    /// GET /getMe, used by the health command to prove the token works
    pub async fn check_credentials(&self) -> Result<()> {
        let url = format!("https://api.telegram.org/bot{}/getMe", self.bot_token);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::ChannelDelivery(format!("getMe failed: {}", e)))?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Error::ChannelDelivery(format!(
                "getMe returned {}",
                resp.status()
            )))
        }
    }
}

#[async_trait]
impl NotifyChannel for TelegramChannel {
    async fn send(&self, text: &str) -> Result<()> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let resp = self
            .client
            .post(&url)
            .form(&[
                ("chat_id", self.chat_id.as_str()),
                ("text", text),
                ("parse_mode", self.parse_mode.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::ChannelDelivery(format!("sendMessage failed: {}", e)))?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Error::ChannelDelivery(format!(
                "sendMessage returned {}",
                resp.status()
            )))
        }
    }
}

/// Render one accepted candidate into the alert template
pub fn format_alert(result: &ScreeningResult) -> String {
    let c = &result.candidate;
    let lp_ratio = c
        .lp_ratio_pct()
        .map(|r| format!("{:.2}%", r))
        .unwrap_or_else(|| "n/a".to_string());

    let mut msg = String::new();
    msg.push_str("🚀 *New memecoin passed screening* 🚀\n\n");
    msg.push_str(&format!("🔹 {} ({})\n", c.name, c.symbol));
    msg.push_str(&format!("`{}`\n", c.address));
    msg.push_str(&format!("💰 Price: ${:.6}\n", c.price_usd));
    msg.push_str(&format!("💧 Liquidity: ${:.0}\n", c.liquidity_usd));
    msg.push_str(&format!("🏛️ FDV: ${:.0}\n", c.fdv_usd));
    msg.push_str(&format!("🔒 LP ratio: {}\n", lp_ratio));
    msg.push_str(&format!(
        "🧾 Tax: {:.1}% buy / {:.1}% sell\n",
        c.buy_tax_pct, c.sell_tax_pct
    ));
    msg.push_str(&format!("📊 Volume 24h: ${:.0}\n", c.volume_h24_usd));
    if let Some(url) = &c.url {
        msg.push_str(&format!("🔗 [Dexscreener]({})\n", url));
    }
    msg
}

/// Formats accepted candidates and hands them to the channel
pub struct AlertDispatcher {
    channel: Box<dyn NotifyChannel>,
    suppress_repeats: bool,
    already_alerted: Mutex<HashSet<String>>,
}

impl AlertDispatcher {
    pub fn new(channel: Box<dyn NotifyChannel>, suppress_repeats: bool) -> Self {
        Self {
            channel,
            suppress_repeats,
            already_alerted: Mutex::new(HashSet::new()),
        }
    }

    /// Dispatch one accepted result. Returns whether a message was actually
    /// delivered; channel failure is logged, reported as false, and does not
    /// count as alerted for suppression purposes.
    pub async fn dispatch(&self, result: &ScreeningResult) -> bool {
        let key = result.candidate.trend_key().to_string();

        if self.suppress_repeats {
            let seen = self
                .already_alerted
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if seen.contains(&key) {
                info!("Suppressing repeat alert for {}", result.candidate.symbol);
                return false;
            }
        }

        let text = format_alert(result);
        match self.channel.send(&text).await {
            Ok(()) => {
                info!("Alert dispatched for {}", result.candidate.symbol);
                if self.suppress_repeats {
                    self.already_alerted
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .insert(key);
                }
                true
            }
            Err(e) => {
                warn!("Alert for {} lost: {}", result.candidate.symbol, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::types::{test_candidate, ScreeningResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct RecordingChannel {
        sent: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl NotifyChannel for RecordingChannel {
        async fn send(&self, _text: &str) -> Result<()> {
            if self.fail {
                return Err(Error::ChannelDelivery("451".into()));
            }
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn accepted_result() -> ScreeningResult {
        ScreeningResult {
            candidate: test_candidate("DOGO", 60_000.0, 400_000.0),
            outcomes: vec![],
            accepted: true,
        }
    }

    #[test]
    fn test_alert_template_fields() {
        let text = format_alert(&accepted_result());
        assert!(text.contains("DOGO"));
        assert!(text.contains("DogoMint1111111111111111111111111111111111"));
        assert!(text.contains("Liquidity: $60000"));
        assert!(text.contains("LP ratio: 15.00%"));
        assert!(text.contains("https://dexscreener.com/solana/dogo"));
    }

    #[test]
    fn test_alert_template_unknown_fdv() {
        let mut result = accepted_result();
        result.candidate.fdv_usd = 0.0;
        let text = format_alert(&result);
        assert!(text.contains("LP ratio: n/a"));
    }

    #[tokio::test]
    async fn test_repeat_alerts_by_default() {
        let sent = Arc::new(AtomicUsize::new(0));
        let dispatcher = AlertDispatcher::new(
            Box::new(RecordingChannel {
                sent: Arc::clone(&sent),
                fail: false,
            }),
            false,
        );

        let result = accepted_result();
        assert!(dispatcher.dispatch(&result).await);
        assert!(dispatcher.dispatch(&result).await);
        assert_eq!(sent.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_suppress_repeats() {
        let sent = Arc::new(AtomicUsize::new(0));
        let dispatcher = AlertDispatcher::new(
            Box::new(RecordingChannel {
                sent: Arc::clone(&sent),
                fail: false,
            }),
            true,
        );

        let result = accepted_result();
        assert!(dispatcher.dispatch(&result).await);
        assert!(!dispatcher.dispatch(&result).await);
        assert_eq!(sent.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_channel_failure_is_swallowed_and_not_counted() {
        let sent = Arc::new(AtomicUsize::new(0));
        let dispatcher = AlertDispatcher::new(
            Box::new(RecordingChannel {
                sent: Arc::clone(&sent),
                fail: true,
            }),
            false,
        );

        // No panic, no error surfaced, and no delivery claimed
        assert!(!dispatcher.dispatch(&accepted_result()).await);
        assert_eq!(sent.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_delivery_is_retried_despite_suppression() {
        struct FlakyChannel {
            sent: Arc<AtomicUsize>,
            attempts: AtomicUsize,
        }

        #[async_trait]
        impl NotifyChannel for FlakyChannel {
            async fn send(&self, _text: &str) -> Result<()> {
                if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    return Err(Error::ChannelDelivery("502".into()));
                }
                self.sent.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }

        let sent = Arc::new(AtomicUsize::new(0));
        let dispatcher = AlertDispatcher::new(
            Box::new(FlakyChannel {
                sent: Arc::clone(&sent),
                attempts: AtomicUsize::new(0),
            }),
            true,
        );

        let result = accepted_result();
        // First attempt fails and must not burn the suppression slot
        assert!(!dispatcher.dispatch(&result).await);
        // Next cycle succeeds, the one after is suppressed
        assert!(dispatcher.dispatch(&result).await);
        assert!(!dispatcher.dispatch(&result).await);
        assert_eq!(sent.load(Ordering::SeqCst), 1);
    }
}
