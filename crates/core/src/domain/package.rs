use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageId(pub String);

/// A bookable campaign package tier, e.g. "Gold".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPackage {
    pub id: PackageId,
    pub name: String,
    pub price: Decimal,
    pub promoters: u32,
    pub locations: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPackage {
    pub name: String,
    pub price: Decimal,
    pub promoters: u32,
    pub locations: u32,
}

impl NewPackage {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvariantViolation("package name is required".to_string()));
        }
        if self.price.is_sign_negative() {
            return Err(DomainError::InvariantViolation(
                "package price must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub promoters: Option<u32>,
    #[serde(default)]
    pub locations: Option<u32>,
}

impl PackageUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.promoters.is_none() && self.locations.is_none()
    }

    pub fn apply(&self, package: &mut CampaignPackage) -> Result<(), DomainError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(DomainError::InvariantViolation("package name is required".to_string()));
            }
            package.name = name.trim().to_string();
        }
        if let Some(price) = self.price {
            if price.is_sign_negative() {
                return Err(DomainError::InvariantViolation(
                    "package price must not be negative".to_string(),
                ));
            }
            package.price = price;
        }
        if let Some(promoters) = self.promoters {
            package.promoters = promoters;
        }
        if let Some(locations) = self.locations {
            package.locations = locations;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{CampaignPackage, NewPackage, PackageId, PackageUpdate};

    #[test]
    fn update_changes_only_supplied_fields() {
        let mut package = CampaignPackage {
            id: PackageId("p1".to_string()),
            name: "Gold".to_string(),
            price: Decimal::new(15_000_00, 2),
            promoters: 4,
            locations: 2,
        };

        PackageUpdate { promoters: Some(6), ..PackageUpdate::default() }
            .apply(&mut package)
            .expect("update applies");

        assert_eq!(package.name, "Gold");
        assert_eq!(package.promoters, 6);
        assert_eq!(package.locations, 2);
    }

    #[test]
    fn negative_price_is_rejected() {
        let package = NewPackage {
            name: "Bronze".to_string(),
            price: Decimal::new(-1, 0),
            promoters: 1,
            locations: 1,
        };
        assert!(package.validate().is_err());
        assert!(PackageUpdate::default().is_empty());
    }
}
