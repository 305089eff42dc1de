use std::sync::Arc;

use snapactivate_core::domain::package::{CampaignPackage, NewPackage, PackageId, PackageUpdate};

use super::OperationError;
use crate::repositories::PackageRepository;

#[derive(Clone)]
pub struct PackageOperations {
    packages: Arc<dyn PackageRepository>,
}

impl PackageOperations {
    pub fn new(packages: Arc<dyn PackageRepository>) -> Self {
        Self { packages }
    }

    pub async fn list_packages(&self) -> Result<Vec<CampaignPackage>, OperationError> {
        Ok(self.packages.list().await?)
    }

    pub async fn create_package(&self, package: NewPackage) -> Result<CampaignPackage, OperationError> {
        package.validate()?;
        let created = self.packages.create(package).await?;
        if created.id.0.trim().is_empty() {
            return Err(OperationError::MissingIdentifier("package"));
        }
        Ok(created)
    }

    pub async fn update_package(
        &self,
        id: &PackageId,
        update: PackageUpdate,
    ) -> Result<CampaignPackage, OperationError> {
        let mut package = self
            .packages
            .find_by_id(id)
            .await?
            .ok_or_else(|| OperationError::PackageNotFound(id.0.clone()))?;

        update.apply(&mut package)?;
        self.packages.save(package.clone()).await?;
        Ok(package)
    }

    pub async fn delete_package(&self, id: &PackageId) -> Result<(), OperationError> {
        if self.packages.delete(id).await? {
            Ok(())
        } else {
            Err(OperationError::PackageNotFound(id.0.clone()))
        }
    }
}
