//! Per-client rules for the account-code overlay.

use serde::{Deserialize, Serialize};

/// How an account value is compared against the allow-list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountMatch {
    /// Account must start with the (single) configured prefix
    Prefix,
    /// Account must equal one of the configured values
    Exact,
}

/// Rules attached to one client name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientRules {
    pub name: String,
    /// One literal or a comma-separated allow-list, e.g. `EMP,SIMP,Cornell College`
    pub account_prefix: Option<String>,
    /// Used by upstream file selection only
    pub eligibility_filename_pattern: Option<String>,
}

impl ClientRules {
    /// Allow-list entries, trimmed, empty entries dropped
    pub fn allowed_accounts(&self) -> Vec<&str> {
        self.account_prefix
            .as_deref()
            .map(|p| p.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }

    /// A multi-value allow-list requires an exact match, a single literal is a prefix
    pub fn default_match(&self) -> AccountMatch {
        if self.allowed_accounts().len() > 1 {
            AccountMatch::Exact
        } else {
            AccountMatch::Prefix
        }
    }

    /// Check an already-trimmed account value
    pub fn account_matches(&self, account: &str, mode: AccountMatch) -> bool {
        let allowed = self.allowed_accounts();
        match mode {
            AccountMatch::Prefix => allowed.iter().any(|p| account.starts_with(p)),
            AccountMatch::Exact => allowed.iter().any(|p| account == *p),
        }
    }
}
