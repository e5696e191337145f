use crate::config::PortalConfig;
use crate::parser::{Extractor, MarkupStrategy};
use crate::session::{HttpSession, PortalSession, SessionError};

/// A logged-in (or about to be) conversation with the portal.
///
/// Owns the cookie-carrying session for the whole run. The operations live
/// next to their concerns: [`crate::auth`], [`crate::waitlist`] and
/// [`crate::placement`].
#[derive(Debug, Clone)]
pub struct FindboligClient<S = PortalSession, M = Extractor> {
    pub(crate) session: S,
    pub(crate) markup: M,
    pub(crate) config: PortalConfig,
}

impl FindboligClient {
    pub fn new(config: PortalConfig, extractor: Extractor) -> Result<Self, SessionError> {
        Ok(Self::with_session(PortalSession::new()?, extractor, config))
    }
}

impl<S: HttpSession, M: MarkupStrategy> FindboligClient<S, M> {
    pub fn with_session(session: S, markup: M, config: PortalConfig) -> Self {
        Self {
            session,
            markup,
            config,
        }
    }
}
