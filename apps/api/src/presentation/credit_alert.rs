use serde::Serialize;

/// Balances at or below this show the low-credit banner.
pub const LOW_CREDIT_THRESHOLD: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditAlert {
    OutOfCredits,
    RunningLow,
}

impl CreditAlert {
    /// `None` when the balance is healthy and no banner should render.
    pub fn for_balance(credits: u32) -> Option<Self> {
        match credits {
            0 => Some(CreditAlert::OutOfCredits),
            c if c <= LOW_CREDIT_THRESHOLD => Some(CreditAlert::RunningLow),
            _ => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            CreditAlert::OutOfCredits => "Out of Credits",
            CreditAlert::RunningLow => "Credits Running Low",
        }
    }

    pub fn message(self, credits: u32) -> String {
        match self {
            CreditAlert::OutOfCredits => {
                format!("You have {credits} credits remaining. Your credits are exhausted.")
            }
            CreditAlert::RunningLow => {
                format!("You have {credits} credits remaining. Your credits may exhaust soon.")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreditBanner {
    pub level: CreditAlert,
    pub title: &'static str,
    pub message: String,
}

impl CreditBanner {
    pub fn for_balance(credits: u32) -> Option<Self> {
        CreditAlert::for_balance(credits).map(|level| Self {
            level,
            title: level.title(),
            message: level.message(credits),
        })
    }
}
