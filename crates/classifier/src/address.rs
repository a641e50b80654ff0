//! Resolved network addresses of remote users.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Address information reported for a user.
///
/// Once recorded, only the country is ever updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAddress {
    pub ip: IpAddr,
    pub port: u16,
    pub country: Option<String>,
}

impl ResolvedAddress {
    pub fn new(ip: IpAddr, port: u16, country: Option<String>) -> Self {
        Self {
            ip,
            port,
            country: country.filter(|c| !c.is_empty()),
        }
    }

    /// The IP address, unless the host reported an unspecified one.
    pub fn blockable_ip(&self) -> Option<IpAddr> {
        (!self.ip.is_unspecified()).then_some(self.ip)
    }

    /// Update the country if a different, non-empty one was reported.
    ///
    /// Returns true if the stored country changed.
    pub fn merge_country(&mut self, country: Option<&str>) -> bool {
        match country {
            Some(country) if !country.is_empty() && self.country.as_deref() != Some(country) => {
                self.country = Some(country.to_owned());
                true
            }
            _ => false,
        }
    }
}
