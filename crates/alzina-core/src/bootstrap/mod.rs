//! Bootstrap links: pre-configure a panel from `?domain=…&token=…`.
//!
//! A shared link carries the Home Assistant location (and, for authenticated
//! panels, an access token). The values are written to the settings store
//! once, then the query string is removed from the visible address.

use std::sync::Mutex;

use url::Url;

use crate::error::{Error, Result};
use crate::models::{BootstrapPolicy, Settings};
use crate::store::{ConfigStore, KeyValueStorage};
use crate::util::{non_blank, normalize_base_url};

pub const DOMAIN_PARAM: &str = "domain";
pub const TOKEN_PARAM: &str = "token";

/// The host's address bar: current location plus in-place replacement.
pub trait AddressBar: Send + Sync {
    fn location(&self) -> Url;
    /// Replaces the displayed address without reloading the panel.
    fn replace_location(&self, url: Url);
}

/// Address bar held in memory, for hosts without a visible location.
#[derive(Debug)]
pub struct InMemoryAddressBar {
    current: Mutex<Url>,
    replacements: Mutex<usize>,
}

impl InMemoryAddressBar {
    pub const fn new(url: Url) -> Self {
        Self {
            current: Mutex::new(url),
            replacements: Mutex::new(0),
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw.trim()).map_err(|error| Error::InvalidLink {
            link: raw.trim().to_string(),
            reason: error.to_string(),
        })?;
        Ok(Self::new(url))
    }

    /// Number of in-place replacements performed.
    pub fn replacements(&self) -> usize {
        self.replacements
            .lock()
            .map_or_else(|poisoned| *poisoned.into_inner(), |guard| *guard)
    }
}

impl AddressBar for InMemoryAddressBar {
    fn location(&self) -> Url {
        match self.current.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn replace_location(&self, url: Url) {
        match self.current.lock() {
            Ok(mut guard) => *guard = url,
            Err(poisoned) => *poisoned.into_inner() = url,
        }
        match self.replacements.lock() {
            Ok(mut guard) => *guard += 1,
            Err(poisoned) => *poisoned.into_inner() += 1,
        }
    }
}

/// Bootstrap values found in a launch URL. Blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapParams {
    pub domain: Option<String>,
    pub token: Option<String>,
}

impl BootstrapParams {
    pub fn from_url(url: &Url) -> Self {
        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                DOMAIN_PARAM if params.domain.is_none() => {
                    params.domain = normalize_base_url(&value);
                }
                TOKEN_PARAM if params.token.is_none() => {
                    params.token = non_blank(&value);
                }
                _ => {}
            }
        }
        params
    }

    pub const fn is_empty(&self) -> bool {
        self.domain.is_none() && self.token.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The address carried nothing to ingest.
    Absent,
    /// Settings were written from the link and the address was cleaned.
    Applied(Settings),
}

/// Reads bootstrap parameters from `address`, persists them per `policy`
/// and strips the query string on success.
///
/// An incomplete link under [`BootstrapPolicy::DomainAndToken`] is an
/// [`Error::IncompleteBootstrap`] and leaves both the store and the address
/// untouched.
pub fn ingest<S: KeyValueStorage>(
    store: &ConfigStore<S>,
    address: &dyn AddressBar,
    policy: BootstrapPolicy,
) -> Result<BootstrapOutcome> {
    let location = address.location();
    let params = BootstrapParams::from_url(&location);

    let settings = match (policy, params.domain, params.token) {
        (_, None, None) | (BootstrapPolicy::DomainOnly, None, Some(_)) => {
            return Ok(BootstrapOutcome::Absent);
        }
        (BootstrapPolicy::DomainOnly, Some(domain), token) => {
            let mut settings = store.load();
            settings.backend_base_url = Some(domain);
            if token.is_some() {
                settings.auth_token = token;
            }
            settings
        }
        (BootstrapPolicy::DomainAndToken, Some(domain), Some(token)) => {
            Settings::from_link(&domain, &token)
        }
        (BootstrapPolicy::DomainAndToken, Some(_), None) => {
            tracing::warn!("Bootstrap link is missing the token parameter");
            return Err(Error::IncompleteBootstrap { missing: TOKEN_PARAM });
        }
        (BootstrapPolicy::DomainAndToken, None, Some(_)) => {
            tracing::warn!("Bootstrap link is missing the domain parameter");
            return Err(Error::IncompleteBootstrap {
                missing: DOMAIN_PARAM,
            });
        }
    };

    store.save(&settings)?;
    address.replace_location(strip_query(location));
    tracing::info!(
        base_url = settings.base_url().unwrap_or_default(),
        "Loaded settings from bootstrap link"
    );
    Ok(BootstrapOutcome::Applied(settings))
}

fn strip_query(mut url: Url) -> Url {
    url.set_query(None);
    url
}
