//! Service address table.
//!
//! Maps each logical backend service to its single base address. Built once
//! from configuration at startup and never mutated afterwards.

use thiserror::Error;
use url::Url;

use crate::config::{ServiceName, ServicesConfig};

/// A service address that failed to parse.
#[derive(Debug, Error)]
#[error("service {service} has invalid address `{address}`: {source}")]
pub struct RouteTableError {
    pub service: ServiceName,
    pub address: String,
    #[source]
    pub source: url::ParseError,
}

/// Immutable service name → base address mapping.
#[derive(Debug, Clone)]
pub struct RouteTable {
    login: Url,
    customer: Url,
    mortgage: Url,
    product: Url,
    debit_instruction: Url,
}

impl RouteTable {
    /// Parse every configured service address.
    pub fn from_config(services: &ServicesConfig) -> Result<Self, RouteTableError> {
        let parse = |service: ServiceName| {
            let address = services.address(service);
            Url::parse(address).map_err(|source| RouteTableError {
                service,
                address: address.to_string(),
                source,
            })
        };

        Ok(Self {
            login: parse(ServiceName::Login)?,
            customer: parse(ServiceName::Customer)?,
            mortgage: parse(ServiceName::Mortgage)?,
            product: parse(ServiceName::Product)?,
            debit_instruction: parse(ServiceName::DebitInstruction)?,
        })
    }

    /// Base address of a service.
    pub fn base_address(&self, service: ServiceName) -> &Url {
        match service {
            ServiceName::Login => &self.login,
            ServiceName::Customer => &self.customer,
            ServiceName::Mortgage => &self.mortgage,
            ServiceName::Product => &self.product,
            ServiceName::DebitInstruction => &self.debit_instruction,
        }
    }
}
