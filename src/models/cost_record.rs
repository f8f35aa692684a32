// Cost record model: one location's operating costs for a reporting period

use crate::models::{Cost, LocationId};
use serde::{Deserialize, Serialize};

/// Fuel consumption times diesel price is divided by this to get fuel cost
pub const FUEL_COST_DIVISOR: f64 = 32.0;

/// Raw cost fields as entered on the cost input sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostComponents {
    pub barangay_fee: Cost,
    pub rental_rate: Cost,
    pub tls_opn: Cost,
    pub drivers_hauler: Cost,
    /// Fuel consumption (not a money amount by itself)
    pub fuel_cons: f64,
    /// Diesel price per unit of fuel consumption
    pub diesel_price: Cost,
    pub ta_inc: Cost,
}

impl CostComponents {
    /// Fuel cost derived from consumption and diesel price
    pub fn fuel_cost(&self) -> Cost {
        self.fuel_cons * self.diesel_price / FUEL_COST_DIVISOR
    }

    /// Sum of every money component, fuel included
    pub fn total(&self) -> Cost {
        self.barangay_fee
            + self.rental_rate
            + self.tls_opn
            + self.drivers_hauler
            + self.fuel_cost()
            + self.ta_inc
    }
}

/// Represents one location's costs and output for a reporting period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    /// Location identifier (e.g. "BATO")
    pub location: LocationId,

    /// Region the location belongs to
    #[serde(default)]
    pub region: String,

    /// Cost components
    #[serde(flatten)]
    pub costs: CostComponents,

    /// Output quantity in kilograms
    #[serde(rename = "lkgtc", alias = "lkg")]
    pub lkg: f64,
}

impl CostRecord {
    /// Creates a new cost record
    pub fn new<L: Into<LocationId>, R: Into<String>>(
        location: L,
        region: R,
        costs: CostComponents,
        lkg: f64,
    ) -> Self {
        Self {
            location: location.into(),
            region: region.into(),
            costs,
            lkg,
        }
    }

    /// Creates a record whose whole cost sits in a single component,
    /// handy when only the total matters
    pub fn from_total_cost<L: Into<LocationId>>(location: L, total_cost: Cost, lkg: f64) -> Self {
        let costs = CostComponents {
            tls_opn: total_cost,
            ..CostComponents::default()
        };
        Self::new(location, "", costs, lkg)
    }

    /// Total operating cost of this record
    pub fn total_cost(&self) -> Cost {
        self.costs.total()
    }

    /// Cost per kilogram of output. None when nothing was produced or the
    /// output is too small for the quotient to be finite.
    pub fn cost_per_unit(&self) -> Option<f64> {
        if self.lkg > 0.0 {
            Some(self.total_cost() / self.lkg).filter(|cpu| cpu.is_finite())
        } else {
            None
        }
    }
}

/// Derived cost-sheet metrics for a single location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostMetrics {
    pub location: LocationId,
    pub region: String,
    pub fuel_cost: Cost,
    pub total_cost: Cost,
    pub lkg: f64,
    /// Zero when the location produced nothing
    pub cost_per_lkg: f64,
    /// Output per peso of unit cost, zero when cost per kg is zero
    pub lkg_per_php: f64,
}

impl CostMetrics {
    pub fn from_record(record: &CostRecord) -> Self {
        let total_cost = record.total_cost();
        let cost_per_lkg = safe_divide(total_cost, record.lkg);
        let lkg_per_php = if cost_per_lkg > 0.0 {
            safe_divide(record.lkg, cost_per_lkg)
        } else {
            0.0
        };

        Self {
            location: record.location.clone(),
            region: record.region.clone(),
            fuel_cost: record.costs.fuel_cost(),
            total_cost,
            lkg: record.lkg,
            cost_per_lkg,
            lkg_per_php,
        }
    }
}

/// Zero instead of a division by zero or a non-finite quotient
fn safe_divide(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let quotient = numerator / denominator;
    if quotient.is_finite() {
        quotient
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_costs() -> CostComponents {
        CostComponents {
            barangay_fee: 100.0,
            rental_rate: 200.0,
            tls_opn: 1000.0,
            drivers_hauler: 500.0,
            fuel_cons: 64.0,
            diesel_price: 50.0,
            ta_inc: 300.0,
        }
    }

    #[test]
    fn test_fuel_cost() {
        assert_eq!(sample_costs().fuel_cost(), 100.0);
    }

    #[test]
    fn test_total_cost() {
        let record = CostRecord::new("BATO", "NORTH", sample_costs(), 1000.0);
        assert_eq!(record.total_cost(), 2200.0);
        assert_eq!(record.cost_per_unit(), Some(2.2));
    }

    #[test]
    fn test_zero_output_has_no_cost_per_unit() {
        let record = CostRecord::from_total_cost("MURCIA", 500.0, 0.0);
        assert_eq!(record.cost_per_unit(), None);
    }

    #[test]
    fn test_tiny_output_has_no_cost_per_unit() {
        let record = CostRecord::from_total_cost("MURCIA", 100.0, 1e-310);
        assert_eq!(record.cost_per_unit(), None);
    }

    #[test]
    fn test_metrics_tiny_output_stay_finite() {
        let record = CostRecord::from_total_cost("MURCIA", 100.0, 1e-310);
        let metrics = CostMetrics::from_record(&record);
        assert_eq!(metrics.cost_per_lkg, 0.0);
        assert_eq!(metrics.lkg_per_php, 0.0);
    }

    #[test]
    fn test_metrics_zero_output() {
        let record = CostRecord::from_total_cost("MURCIA", 500.0, 0.0);
        let metrics = CostMetrics::from_record(&record);
        assert_eq!(metrics.total_cost, 500.0);
        assert_eq!(metrics.cost_per_lkg, 0.0);
        assert_eq!(metrics.lkg_per_php, 0.0);
    }

    #[test]
    fn test_metrics_lkg_per_php() {
        let record = CostRecord::from_total_cost("BATO", 200.0, 100.0);
        let metrics = CostMetrics::from_record(&record);
        assert_eq!(metrics.cost_per_lkg, 2.0);
        assert_eq!(metrics.lkg_per_php, 50.0);
    }

    #[test]
    fn test_deserialize_sheet_row() {
        let json = r#"{
            "location": "BATO",
            "region": "NORTH",
            "barangay_fee": 1.0,
            "rental_rate": 2.0,
            "tls_opn": 3.0,
            "drivers_hauler": 4.0,
            "fuel_cons": 0.0,
            "diesel_price": 0.0,
            "ta_inc": 5.0,
            "lkgtc": 10.0
        }"#;
        let record: CostRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.location, "BATO");
        assert_eq!(record.total_cost(), 15.0);
        assert_eq!(record.lkg, 10.0);
    }
}
