//! Message composition for the notification sink.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::types::{AlertLevel, AlertSet};

const RULE_WIDTH: usize = 30;

/// One message ready to hand to a notification sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigestMessage {
    pub level: AlertLevel,
    /// Deliver without sound; only the daily report is silent.
    pub silent: bool,
    pub text: String,
}

/// Messages for one run, in delivery order (level 1, 2, 3).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Digest {
    pub messages: Vec<DigestMessage>,
}

impl Digest {
    /// Compose messages for every non-empty tier.
    pub fn compose(alerts: &AlertSet, generated_at: NaiveDateTime) -> Self {
        let messages = AlertLevel::ALL
            .into_iter()
            .filter(|level| !alerts.tier(*level).is_empty())
            .map(|level| {
                let lines = alerts.tier(level);
                let text = match level {
                    AlertLevel::Info => Self::daily_report(lines, generated_at),
                    AlertLevel::Warning => format!("⚠️ Warnings\n\n{}", lines.join("\n")),
                    AlertLevel::Emergency => {
                        format!("🚨 Emergency alerts\n\n{}", lines.join("\n"))
                    }
                };
                DigestMessage {
                    level,
                    silent: level == AlertLevel::Info,
                    text,
                }
            })
            .collect();

        Self { messages }
    }

    fn daily_report(lines: &[String], generated_at: NaiveDateTime) -> String {
        let rule = "─".repeat(RULE_WIDTH);
        format!(
            "📊 Commodity & currency daily report\n🕐 {}\n{}\n\n{}\n\n{}\n📈 See the attached report for details",
            generated_at.format("%Y-%m-%d %H:%M"),
            rule,
            lines.join("\n"),
            rule
        )
    }

    /// Audible notice for a run that failed before alerts could be sent.
    pub fn failure(error: impl std::fmt::Display, generated_at: NaiveDateTime) -> DigestMessage {
        DigestMessage {
            level: AlertLevel::Emergency,
            silent: false,
            text: format!(
                "🚨 System error\n🕐 {}\n\n{}\n\nSee the run logs for details.",
                generated_at.format("%Y-%m-%d %H:%M"),
                error
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
