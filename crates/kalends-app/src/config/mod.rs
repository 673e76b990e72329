//! Settings as seen by request handlers.
//!
//! Only what authentication needs per request reaches the depot; everything
//! else is consumed once by `main`.

use std::sync::Arc;

use salvo::async_trait;
pub use kalends_core::config::*;
use kalends_core::constants::DEFAULT_OWNER_HEADER;
use kalends_core::error::{CoreError, CoreResult};
use kalends_core::model::OwnerId;

use crate::error::{AppError, AppResult};

/// Where the requesting owner's id comes from, settled when the server
/// starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerSource {
    /// Every request acts as this owner.
    Fixed(OwnerId),
    /// The gateway forwards the verified owner id in this header.
    Header(String),
}

impl OwnerSource {
    /// ## Summary
    /// Resolves the auth section into an owner source.
    ///
    /// ## Errors
    /// Returns `InvalidConfiguration` if `single_user` is selected without an
    /// `owner_id`.
    pub fn from_auth(auth: &AuthConfig) -> CoreResult<Self> {
        match auth.method {
            AuthMethod::SingleUser => auth
                .single_user
                .as_ref()
                .map(|single_user| Self::Fixed(single_user.owner_id))
                .ok_or_else(|| {
                    CoreError::InvalidConfiguration(
                        "auth.method is single_user but auth.single_user.owner_id is not set"
                            .to_string(),
                    )
                }),
            AuthMethod::Proxy => Ok(Self::Header(
                auth.proxy
                    .as_ref()
                    .map_or(DEFAULT_OWNER_HEADER, |proxy| proxy.header.as_str())
                    .to_string(),
            )),
        }
    }
}

/// Injects the [`OwnerSource`] into every request's depot.
pub struct ConfigHandler {
    owner_source: Arc<OwnerSource>,
}

impl ConfigHandler {
    /// ## Errors
    /// See [`OwnerSource::from_auth`].
    pub fn new(settings: &Settings) -> CoreResult<Self> {
        Ok(Self {
            owner_source: Arc::new(OwnerSource::from_auth(&settings.auth)?),
        })
    }
}

#[async_trait]
impl salvo::Handler for ConfigHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.owner_source));
    }
}

/// ## Summary
/// Retrieves the owner source from the depot.
///
/// ## Errors
/// Returns an error if [`ConfigHandler`] did not run for this request.
pub fn get_owner_source_from_depot(depot: &salvo::Depot) -> AppResult<Arc<OwnerSource>> {
    depot.obtain::<Arc<OwnerSource>>().cloned().map_err(|_err| {
        AppError::CoreError(CoreError::InvariantViolation(
            "Owner source not found in depot",
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(method: AuthMethod, proxy: Option<&str>, owner_id: Option<OwnerId>) -> AuthConfig {
        AuthConfig {
            method,
            proxy: proxy.map(|header| ProxyAuthConfig {
                header: header.to_string(),
            }),
            single_user: owner_id.map(|owner_id| SingleUserAuthConfig { owner_id }),
        }
    }

    #[test]
    fn test_single_user_needs_owner_id() {
        assert_eq!(
            OwnerSource::from_auth(&auth(AuthMethod::SingleUser, None, Some(7))).ok(),
            Some(OwnerSource::Fixed(7))
        );
        assert!(matches!(
            OwnerSource::from_auth(&auth(AuthMethod::SingleUser, None, None)),
            Err(CoreError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_proxy_header_falls_back_to_default() {
        assert_eq!(
            OwnerSource::from_auth(&auth(AuthMethod::Proxy, Some("x-user"), None)).ok(),
            Some(OwnerSource::Header("x-user".to_string()))
        );
        assert_eq!(
            OwnerSource::from_auth(&auth(AuthMethod::Proxy, None, Some(7))).ok(),
            Some(OwnerSource::Header(DEFAULT_OWNER_HEADER.to_string()))
        );
    }
}
