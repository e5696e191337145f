use crate::client::FindboligClient;
use crate::parser::MarkupStrategy;
use crate::session::{HttpSession, SessionError};
use crate::types::BuildingId;

impl<S: HttpSession, M: MarkupStrategy> FindboligClient<S, M> {
    /// Buildings the user is signed up for, in the order the portal lists
    /// them. An empty waitlist is not an error.
    pub fn extract_waitinglist_references(&self) -> Result<Vec<BuildingId>, SessionError> {
        log::info!("Fetching waitlist registrations...");

        let html = self.session.get(&self.config.waitlist_url())?;
        let ids = self.markup.building_ids(&html);

        log::info!("Found {} waitlist registration(s)", ids.len());
        Ok(ids)
    }
}
