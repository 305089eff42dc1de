use std::sync::Arc;

use snapactivate_core::domain::brand::BrandId;
use snapactivate_core::domain::support::{
    NewSupportTicket, SupportTicket, SupportTicketRequest, TicketReference,
};

use super::OperationError;
use crate::repositories::SupportTicketRepository;

#[derive(Clone)]
pub struct SupportOperations {
    tickets: Arc<dyn SupportTicketRepository>,
}

impl SupportOperations {
    pub fn new(tickets: Arc<dyn SupportTicketRepository>) -> Self {
        Self { tickets }
    }

    /// Files a ticket with status `New` and returns its user-facing reference.
    pub async fn create_support_ticket(
        &self,
        request: SupportTicketRequest,
        brand_id: &BrandId,
    ) -> Result<TicketReference, OperationError> {
        request.validate()?;

        let ticket = NewSupportTicket::from_request(request, brand_id.clone());
        let id = self.tickets.create(ticket).await?;
        if id.0.trim().is_empty() {
            return Err(OperationError::MissingIdentifier("support ticket"));
        }

        Ok(TicketReference::from_ticket_id(&id))
    }

    pub async fn tickets_for_brand(
        &self,
        brand_id: &BrandId,
    ) -> Result<Vec<SupportTicket>, OperationError> {
        Ok(self.tickets.list_for_brand(brand_id).await?)
    }
}
