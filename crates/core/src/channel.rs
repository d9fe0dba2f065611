//! Sales channel value objects.
//!
//! A sales channel (a website or a physical store) is the surface an order
//! arrives through. Each channel maps to exactly one stock at a time; the
//! mapping itself lives in the catalog crate's stock resolver.

use serde::{Deserialize, Serialize};

/// Kind of sales channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalesChannelType {
    Website,
    Store,
}

impl SalesChannelType {
    pub fn as_str(self) -> &'static str {
        match self {
            SalesChannelType::Website => "website",
            SalesChannelType::Store => "store",
        }
    }
}

/// A sales channel: type plus channel-scoped code (e.g. website code).
///
/// Compared by value; two channels with the same type and code are the same
/// channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SalesChannel {
    pub channel_type: SalesChannelType,
    pub code: String,
}

impl SalesChannel {
    pub fn new(channel_type: SalesChannelType, code: impl Into<String>) -> Self {
        Self {
            channel_type,
            code: code.into(),
        }
    }

    pub fn website(code: impl Into<String>) -> Self {
        Self::new(SalesChannelType::Website, code)
    }

    pub fn store(code: impl Into<String>) -> Self {
        Self::new(SalesChannelType::Store, code)
    }
}

impl core::fmt::Display for SalesChannel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.channel_type.as_str(), self.code)
    }
}
