//! # Search
//!
//! In-memory list filters behind the search boxes of the inventory, sales,
//! customers and service history pages.
//!
//! ## Matching Rules
//! - The query is trimmed; an empty query matches everything
//! - Text fields match on a case-insensitive substring
//! - Phone numbers match on a plain substring
//! - A field whose join did not resolve never matches

use crate::types::{Customer, SaleDetail, ServiceDetail, SparePart};

/// A trimmed, lowercased search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    lowered: String,
}

impl SearchQuery {
    pub fn new(query: &str) -> Self {
        let raw = query.trim().to_string();
        let lowered = raw.to_lowercase();
        SearchQuery { raw, lowered }
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Case-insensitive substring match.
    pub fn matches(&self, field: &str) -> bool {
        self.is_empty() || field.to_lowercase().contains(&self.lowered)
    }

    /// Exact substring match.
    pub fn matches_exact(&self, field: &str) -> bool {
        self.is_empty() || field.contains(&self.raw)
    }

    fn matches_any<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        self.is_empty() || fields.into_iter().any(|field| self.matches(field))
    }
}

/// Parts by name, part number or brand.
pub fn filter_parts<'a>(parts: &'a [SparePart], query: &str) -> Vec<&'a SparePart> {
    let query = SearchQuery::new(query);
    parts
        .iter()
        .filter(|part| {
            query.matches_any([
                part.part_name.as_str(),
                part.part_number.as_str(),
                part.brand.as_str(),
            ])
        })
        .collect()
}

/// Sales by customer name or invoice number.
pub fn filter_sales<'a>(sales: &'a [SaleDetail], query: &str) -> Vec<&'a SaleDetail> {
    let query = SearchQuery::new(query);
    sales
        .iter()
        .filter(|detail| {
            query.matches_any([
                detail.sale.customer_name.as_str(),
                detail.sale.invoice_number.as_str(),
            ])
        })
        .collect()
}

/// Customers by name or email, or by phone digits as typed.
pub fn filter_customers<'a>(customers: &'a [Customer], query: &str) -> Vec<&'a Customer> {
    let query = SearchQuery::new(query);
    customers
        .iter()
        .filter(|customer| {
            query.matches(&customer.name)
                || customer.email.as_deref().is_some_and(|email| query.matches(email))
                || customer
                    .phone
                    .as_deref()
                    .is_some_and(|phone| query.matches_exact(phone))
        })
        .collect()
}

/// Services by customer name, `make model`, or service type.
pub fn filter_services<'a>(services: &'a [ServiceDetail], query: &str) -> Vec<&'a ServiceDetail> {
    let query = SearchQuery::new(query);
    services
        .iter()
        .filter(|detail| {
            if query.is_empty() {
                return true;
            }
            let customer = detail.customer().map(|customer| customer.name.as_str());
            let vehicle = detail
                .vehicle
                .resolved()
                .map(|owned| format!("{} {}", owned.vehicle.make, owned.vehicle.model));
            let kind = detail.service_type.resolved().map(|kind| kind.name.as_str());

            customer.is_some_and(|name| query.matches(name))
                || vehicle.is_some_and(|vehicle| query.matches(&vehicle))
                || kind.is_some_and(|name| query.matches(name))
        })
        .collect()
}
