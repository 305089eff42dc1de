use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrandId(pub String);

impl BrandId {
    /// Returns `None` for blank ids so callers can treat them as "no caller".
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPlan {
    Standard,
    Elite,
    Unspecified,
}

impl PaymentPlan {
    /// Exact match on the stored plan; any other spelling is `Unspecified`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "standard" => Self::Standard,
            "elite" => Self::Elite,
            _ => Self::Unspecified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Elite => "elite",
            Self::Unspecified => "unspecified",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Brand,
    Promoter,
}

impl UserRole {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "brand" => Some(Self::Brand),
            "promoter" => Some(Self::Promoter),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Brand => "brand",
            Self::Promoter => "promoter",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandProfile {
    pub id: BrandId,
    pub name: String,
    pub company_name: Option<String>,
    pub payment_plan: PaymentPlan,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl BrandProfile {
    /// Name shown on campaigns booked by this brand.
    pub fn display_name(&self) -> &str {
        self.company_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.name.as_str())
    }
}
