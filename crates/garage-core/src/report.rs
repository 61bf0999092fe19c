//! # Report Aggregation
//!
//! Summarises fetched rows into the dashboard and reports payloads.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Hosted backend ──► caller fetches rows ──► ReportInput                 │
//! │                                                 │                       │
//! │                     ┌───────────────────────────┼──────────────────┐    │
//! │                     ▼                           ▼                  ▼    │
//! │             ReportSummary::build     DashboardStats::build   single fns │
//! │             (reports page)           (dashboard cards)       (charts)   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is pure: the same rows and the same `today` always
//! give the same summary. Missing relations are never skipped silently;
//! each aggregate states what it does with them (count as "Unknown" or
//! leave out).

use std::collections::HashMap;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Customer, Sale, SaleDetail, Service, ServiceDetail, SparePart};
use crate::UNKNOWN_LABEL;

/// Number of months in the revenue trend chart.
pub const TREND_MONTHS: u32 = 6;

/// Rows in the "top" tables.
pub const TOP_LIMIT: usize = 5;

/// Entries in the dashboard activity feed.
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// Look-ahead window for service reminders, in days.
pub const UPCOMING_SERVICE_DAYS: i64 = 7;

// =============================================================================
// Input
// =============================================================================

/// Everything the report pages aggregate over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReportInput {
    #[serde(default)]
    pub sales: Vec<SaleDetail>,
    #[serde(default)]
    pub services: Vec<ServiceDetail>,
    #[serde(default)]
    pub parts: Vec<SparePart>,
    #[serde(default)]
    pub customers: Vec<Customer>,
}

// =============================================================================
// Month Ranges
// =============================================================================

/// A calendar month, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthRange {
    /// The calendar month containing `date`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use garage_core::report::MonthRange;
    ///
    /// let feb = MonthRange::containing(NaiveDate::from_ymd_opt(2024, 2, 17).unwrap());
    /// assert_eq!(feb.start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    /// assert_eq!(feb.end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    /// ```
    pub fn containing(date: NaiveDate) -> Self {
        let start = date - Duration::days(i64::from(date.day0()));
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        MonthRange { start, end }
    }

    /// The month before this one.
    pub fn previous(&self) -> Self {
        MonthRange::containing(self.start.pred_opt().unwrap_or(NaiveDate::MIN))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Short English month name ("Jan").
    pub fn label(&self) -> String {
        self.start.format("%b").to_string()
    }
}

// =============================================================================
// Output Types
// =============================================================================

/// One bar of the revenue trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MonthRevenue {
    pub month: String,
    pub revenue: Money,
    pub sales_revenue: Money,
    pub services_revenue: Money,
}

/// One slice of the service type distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ServiceTypeCount {
    pub service_type: String,
    pub count: usize,
}

/// A top-selling part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PartSales {
    pub name: String,
    pub quantity: i64,
    pub revenue: Money,
    /// Share of all part revenue in the period, 0-100.
    pub percentage: f64,
}

/// A top customer by spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CustomerSpend {
    pub customer_id: String,
    pub name: String,
    pub services: usize,
    pub total_spent: Money,
    #[ts(as = "String")]
    pub last_service: NaiveDate,
}

/// How urgently a part needs reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum AlertLevel {
    /// Out of stock, or under half the reorder threshold.
    Critical,
    /// At or below the reorder threshold.
    Low,
}

/// A low-stock warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InventoryAlert {
    pub name: String,
    pub current_stock: i64,
    pub reorder_level: i64,
    pub alert_level: AlertLevel,
}

/// Source of an activity feed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ActivityKind {
    Service,
    Sale,
}

/// A dashboard activity feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub description: String,
    pub amount: Money,
    #[ts(as = "String")]
    pub date: NaiveDate,
}

/// A service reminder due soon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpcomingService {
    pub service_id: String,
    pub customer_name: String,
    pub registration_number: String,
    pub service_type: String,
    #[ts(as = "String")]
    pub next_service_date: NaiveDate,
}

/// One service in a vehicle's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ServiceHistoryEntry {
    pub service_id: String,
    #[ts(as = "String")]
    pub service_date: NaiveDate,
    pub service_type: String,
    pub status: String,
    pub mileage: Option<i64>,
    pub total_cost: Money,
    #[ts(as = "Option<String>")]
    pub next_service_date: Option<NaiveDate>,
    /// Next service is overdue or within [`UPCOMING_SERVICE_DAYS`].
    pub due: bool,
}

/// All services of one vehicle, with totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VehicleHistory {
    pub vehicle_id: String,
    /// `Make Model (REG)`, or `Unknown` when the vehicle is not resolved.
    pub vehicle: String,
    pub customer_name: String,
    pub total_services: usize,
    pub total_cost: Money,
    pub services: Vec<ServiceHistoryEntry>,
}

// =============================================================================
// Aggregates
// =============================================================================

/// Sale totals plus service costs.
pub fn revenue_total<'a>(
    sales: impl IntoIterator<Item = &'a Sale>,
    services: impl IntoIterator<Item = &'a Service>,
) -> Money {
    let sales: Money = sales.into_iter().map(|sale| sale.total_amount).sum();
    let services: Money = services.into_iter().map(|service| service.total_cost).sum();
    sales + services
}

/// Percentage change from `previous` to `current`.
///
/// Zero when there is no previous value to compare against.
///
/// ## Example
/// ```rust
/// use garage_core::report::percent_change;
///
/// assert_eq!(percent_change(150.0, 100.0), 50.0);
/// assert_eq!(percent_change(80.0, 0.0), 0.0);
/// ```
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

/// Units of parts moved through sales and services dated within `range`.
pub fn parts_sold(sales: &[SaleDetail], services: &[ServiceDetail], range: MonthRange) -> i64 {
    let over_counter: i64 = sales
        .iter()
        .filter(|detail| range.contains(detail.sale.sale_date))
        .flat_map(|detail| &detail.items)
        .map(|line| line.item.quantity)
        .sum();
    let in_workshop: i64 = services
        .iter()
        .filter(|detail| range.contains(detail.service.service_date))
        .flat_map(|detail| &detail.parts)
        .map(|line| line.item.quantity)
        .sum();
    over_counter + in_workshop
}

/// Revenue per calendar month for the `months` months ending with the
/// month of `today`, oldest first.
pub fn monthly_revenue(
    sales: &[SaleDetail],
    services: &[ServiceDetail],
    today: NaiveDate,
    months: u32,
) -> Vec<MonthRevenue> {
    let mut ranges = Vec::with_capacity(months as usize);
    let mut range = MonthRange::containing(today);
    for _ in 0..months {
        ranges.push(range);
        range = range.previous();
    }
    ranges.reverse();

    ranges
        .into_iter()
        .map(|range| {
            let sales_revenue: Money = sales
                .iter()
                .filter(|detail| range.contains(detail.sale.sale_date))
                .map(|detail| detail.sale.total_amount)
                .sum();
            let services_revenue: Money = services
                .iter()
                .filter(|detail| range.contains(detail.service.service_date))
                .map(|detail| detail.service.total_cost)
                .sum();
            MonthRevenue {
                month: range.label(),
                revenue: sales_revenue + services_revenue,
                sales_revenue,
                services_revenue,
            }
        })
        .collect()
}

/// Services per type. Unresolved types count under "Unknown".
///
/// Sorted by count descending, then name.
pub fn service_type_distribution<'a>(
    services: impl IntoIterator<Item = &'a ServiceDetail>,
) -> Vec<ServiceTypeCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for detail in services {
        let name = detail
            .service_type
            .resolved()
            .map_or(UNKNOWN_LABEL, |kind| kind.name.as_str());
        *counts.entry(name).or_default() += 1;
    }

    let mut distribution: Vec<ServiceTypeCount> = counts
        .into_iter()
        .map(|(name, count)| ServiceTypeCount {
            service_type: name.to_string(),
            count,
        })
        .collect();
    distribution.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.service_type.cmp(&b.service_type))
    });
    distribution
}

/// Best-selling parts by units across sales and services.
///
/// Lines whose part did not resolve are grouped under "Unknown". Sorted by
/// quantity descending, then name; at most `limit` rows.
pub fn top_parts<'a>(
    sales: impl IntoIterator<Item = &'a SaleDetail>,
    services: impl IntoIterator<Item = &'a ServiceDetail>,
    limit: usize,
) -> Vec<PartSales> {
    let mut totals: HashMap<&str, (i64, Money)> = HashMap::new();

    let sale_lines = sales
        .into_iter()
        .flat_map(|detail| &detail.items)
        .map(|line| (&line.spare_part, line.item.quantity, line.item.subtotal));
    let service_lines = services
        .into_iter()
        .flat_map(|detail| &detail.parts)
        .map(|line| (&line.spare_part, line.item.quantity, line.item.subtotal));

    for (spare_part, quantity, subtotal) in sale_lines.chain(service_lines) {
        let name = spare_part
            .resolved()
            .map_or(UNKNOWN_LABEL, |part| part.part_name.as_str());
        let entry = totals.entry(name).or_insert((0, Money::zero()));
        entry.0 += quantity;
        entry.1 += subtotal;
    }

    let total_revenue: Money = totals.values().map(|(_, revenue)| *revenue).sum();

    let mut parts: Vec<PartSales> = totals
        .into_iter()
        .map(|(name, (quantity, revenue))| PartSales {
            name: name.to_string(),
            quantity,
            revenue,
            percentage: if total_revenue.is_positive() {
                revenue.paise() as f64 / total_revenue.paise() as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect();
    parts.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.name.cmp(&b.name)));
    parts.truncate(limit);
    parts
}

/// Customers ranked by total service spend.
///
/// Services whose vehicle or owner did not resolve cannot be attributed and
/// are left out. Sorted by spend descending, then name; at most `limit` rows.
pub fn top_customers<'a>(
    services: impl IntoIterator<Item = &'a ServiceDetail>,
    limit: usize,
) -> Vec<CustomerSpend> {
    let mut by_customer: HashMap<&str, CustomerSpend> = HashMap::new();

    for detail in services {
        let Some(customer) = detail.customer() else {
            continue;
        };
        let service = &detail.service;
        by_customer
            .entry(customer.id.as_str())
            .and_modify(|spend| {
                spend.services += 1;
                spend.total_spent += service.total_cost;
                spend.last_service = spend.last_service.max(service.service_date);
            })
            .or_insert_with(|| CustomerSpend {
                customer_id: customer.id.clone(),
                name: customer.name.clone(),
                services: 1,
                total_spent: service.total_cost,
                last_service: service.service_date,
            });
    }

    let mut ranked: Vec<CustomerSpend> = by_customer.into_values().collect();
    ranked.sort_by(|a, b| {
        b.total_spent
            .cmp(&a.total_spent)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked.truncate(limit);
    ranked
}

/// Parts at or below their reorder threshold.
///
/// `Critical` when out of stock or under half the threshold, otherwise
/// `Low`. Critical alerts come first, then lowest stock.
pub fn inventory_alerts<'a>(parts: impl IntoIterator<Item = &'a SparePart>) -> Vec<InventoryAlert> {
    let mut alerts: Vec<InventoryAlert> = parts
        .into_iter()
        .filter(|part| part.needs_reorder())
        .map(|part| {
            let stock = part.quantity_in_stock;
            // stock < threshold / 2 without truncation or overflow;
            // 0 < stock <= threshold keeps the subtraction in range
            let alert_level = if stock <= 0 || stock < part.reorder_threshold - stock {
                AlertLevel::Critical
            } else {
                AlertLevel::Low
            };
            InventoryAlert {
                name: part.part_name.clone(),
                current_stock: stock,
                reorder_level: part.reorder_threshold,
                alert_level,
            }
        })
        .collect();
    alerts.sort_by(|a, b| {
        a.alert_level
            .cmp(&b.alert_level)
            .then_with(|| a.current_stock.cmp(&b.current_stock))
            .then_with(|| a.name.cmp(&b.name))
    });
    alerts
}

/// Latest services and sales merged into one feed, newest first.
pub fn recent_activity(
    services: &[ServiceDetail],
    sales: &[SaleDetail],
    limit: usize,
) -> Vec<Activity> {
    let service_entries = services.iter().map(|detail| {
        let kind = detail
            .service_type
            .resolved()
            .map_or(UNKNOWN_LABEL, |kind| kind.name.as_str());
        let customer = detail
            .customer()
            .map_or(UNKNOWN_LABEL, |customer| customer.name.as_str());
        Activity {
            id: detail.service.id.clone(),
            kind: ActivityKind::Service,
            description: format!("{kind} for {customer}"),
            amount: detail.service.total_cost,
            date: detail.service.service_date,
        }
    });
    let sale_entries = sales.iter().map(|detail| Activity {
        id: detail.sale.id.clone(),
        kind: ActivityKind::Sale,
        description: format!("Sale to {}", detail.sale.customer_name),
        amount: detail.sale.total_amount,
        date: detail.sale.sale_date,
    });

    let mut feed: Vec<Activity> = service_entries.chain(sale_entries).collect();
    // stable: equal dates keep services before sales
    feed.sort_by(|a, b| b.date.cmp(&a.date));
    feed.truncate(limit);
    feed
}

/// Services whose next reminder falls within `[today, today + days]`,
/// soonest first.
pub fn upcoming_services(
    services: &[ServiceDetail],
    today: NaiveDate,
    days: i64,
) -> Vec<UpcomingService> {
    let horizon = today + Duration::days(days);
    let mut upcoming: Vec<UpcomingService> = services
        .iter()
        .filter_map(|detail| {
            let due = detail.service.next_service_date?;
            if due < today || due > horizon {
                return None;
            }
            Some(UpcomingService {
                service_id: detail.service.id.clone(),
                customer_name: detail
                    .customer()
                    .map_or(UNKNOWN_LABEL, |customer| customer.name.as_str())
                    .to_string(),
                registration_number: detail
                    .vehicle
                    .resolved()
                    .map(|vehicle| vehicle.vehicle.registration_number.clone())
                    .unwrap_or_default(),
                service_type: detail
                    .service_type
                    .resolved()
                    .map_or(UNKNOWN_LABEL, |kind| kind.name.as_str())
                    .to_string(),
                next_service_date: due,
            })
        })
        .collect();
    upcoming.sort_by(|a, b| a.next_service_date.cmp(&b.next_service_date));
    upcoming
}

/// Whether a service reminder needs attention on `today`.
///
/// Overdue reminders count as due.
pub fn is_service_due(next_service_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    next_service_date.is_some_and(|next| (next - today).num_days() <= UPCOMING_SERVICE_DAYS)
}

/// `Make Model (REG)` for a resolved vehicle.
pub fn vehicle_label(detail: &ServiceDetail) -> String {
    match detail.vehicle.resolved() {
        Some(owned) => format!(
            "{} {} ({})",
            owned.vehicle.make, owned.vehicle.model, owned.vehicle.registration_number
        ),
        None => UNKNOWN_LABEL.to_string(),
    }
}

/// Groups services by vehicle.
///
/// Vehicles appear in the order of their first service;
/// each vehicle keeps its services in input order.
pub fn vehicle_history<'a>(
    services: impl IntoIterator<Item = &'a ServiceDetail>,
    today: NaiveDate,
) -> Vec<VehicleHistory> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut history: Vec<VehicleHistory> = Vec::new();

    for detail in services {
        let key = detail.service.vehicle_id.as_str();
        let slot = *index.entry(key).or_insert_with(|| {
            history.push(VehicleHistory {
                vehicle_id: key.to_string(),
                vehicle: vehicle_label(detail),
                customer_name: detail
                    .customer()
                    .map_or(UNKNOWN_LABEL, |customer| customer.name.as_str())
                    .to_string(),
                total_services: 0,
                total_cost: Money::zero(),
                services: Vec::new(),
            });
            history.len() - 1
        });

        let group = &mut history[slot];
        group.total_services += 1;
        group.total_cost += detail.service.total_cost;
        group.services.push(ServiceHistoryEntry {
            service_id: detail.service.id.clone(),
            service_date: detail.service.service_date,
            service_type: detail
                .service_type
                .resolved()
                .map_or(UNKNOWN_LABEL, |kind| kind.name.as_str())
                .to_string(),
            status: detail.service.status.clone(),
            mileage: detail.service.mileage,
            total_cost: detail.service.total_cost,
            next_service_date: detail.service.next_service_date,
            due: is_service_due(detail.service.next_service_date, today),
        });
    }

    history
}

// =============================================================================
// Page Payloads
// =============================================================================

/// The reports page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReportSummary {
    pub total_revenue: Money,
    pub revenue_change: f64,
    pub parts_sold: i64,
    pub parts_change: f64,
    pub services_completed: usize,
    pub services_change: f64,
    pub active_customers: usize,
    pub customers_change: f64,
    pub revenue_data: Vec<MonthRevenue>,
    pub service_type_data: Vec<ServiceTypeCount>,
    pub top_parts: Vec<PartSales>,
    pub top_customers: Vec<CustomerSpend>,
    pub inventory_alerts: Vec<InventoryAlert>,
}

impl ReportSummary {
    /// Aggregates the reports page for the month containing `today`.
    ///
    /// ## Comparisons
    /// Revenue, parts, and services compare this month with last month.
    /// Customers compare the total customer count with the number of
    /// customers created last month.
    pub fn build(input: &ReportInput, today: NaiveDate) -> Self {
        let current = MonthRange::containing(today);
        let previous = current.previous();

        let services_in = |range: MonthRange| {
            input
                .services
                .iter()
                .filter(move |detail| range.contains(detail.service.service_date))
        };
        let sales_in = |range: MonthRange| {
            input
                .sales
                .iter()
                .filter(move |detail| range.contains(detail.sale.sale_date))
        };

        let current_revenue = revenue_total(
            sales_in(current).map(|detail| &detail.sale),
            services_in(current).map(|detail| &detail.service),
        );
        let previous_revenue = revenue_total(
            sales_in(previous).map(|detail| &detail.sale),
            services_in(previous).map(|detail| &detail.service),
        );

        let current_parts = parts_sold(&input.sales, &input.services, current);
        let previous_parts = parts_sold(&input.sales, &input.services, previous);

        let current_services = services_in(current).count();
        let previous_services = services_in(previous).count();

        let active_customers = input.customers.len();
        let new_last_month = input
            .customers
            .iter()
            .filter(|customer| previous.contains(customer.created_at.date_naive()))
            .count();

        ReportSummary {
            total_revenue: current_revenue,
            revenue_change: percent_change(
                current_revenue.as_amount(),
                previous_revenue.as_amount(),
            ),
            parts_sold: current_parts,
            parts_change: percent_change(current_parts as f64, previous_parts as f64),
            services_completed: current_services,
            services_change: percent_change(current_services as f64, previous_services as f64),
            active_customers,
            customers_change: percent_change(active_customers as f64, new_last_month as f64),
            revenue_data: monthly_revenue(&input.sales, &input.services, today, TREND_MONTHS),
            service_type_data: service_type_distribution(services_in(current)),
            top_parts: top_parts(sales_in(current), services_in(current), TOP_LIMIT),
            top_customers: top_customers(&input.services, TOP_LIMIT),
            inventory_alerts: inventory_alerts(&input.parts),
        }
    }
}

/// The dashboard cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardStats {
    pub revenue: Money,
    pub parts_sold: i64,
    pub services_completed: usize,
    pub low_stock_alerts: usize,
    pub upcoming_services: Vec<UpcomingService>,
    pub recent_activity: Vec<Activity>,
}

impl DashboardStats {
    /// Aggregates the dashboard for the month containing `today`.
    pub fn build(input: &ReportInput, today: NaiveDate) -> Self {
        let current = MonthRange::containing(today);
        let services_this_month: Vec<&Service> = input
            .services
            .iter()
            .map(|detail| &detail.service)
            .filter(|service| current.contains(service.service_date))
            .collect();

        DashboardStats {
            revenue: revenue_total(
                input
                    .sales
                    .iter()
                    .map(|detail| &detail.sale)
                    .filter(|sale| current.contains(sale.sale_date)),
                services_this_month.iter().copied(),
            ),
            parts_sold: parts_sold(&input.sales, &input.services, current),
            services_completed: services_this_month.len(),
            low_stock_alerts: input.parts.iter().filter(|part| part.needs_reorder()).count(),
            upcoming_services: upcoming_services(&input.services, today, UPCOMING_SERVICE_DAYS),
            recent_activity: recent_activity(
                &input.services,
                &input.sales,
                RECENT_ACTIVITY_LIMIT,
            ),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
