// Input range validation for cost sheet fields

use crate::error::ValidationError;
use crate::models::CostRecord;

/// Accepted range for one numeric field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRule {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
}

/// Ranges every cost record field must fall within
pub const VALIDATION_RULES: [FieldRule; 8] = [
    FieldRule { field: "barangay_fee", min: 0.0, max: 100_000.0 },
    FieldRule { field: "rental_rate", min: 0.0, max: 100_000.0 },
    FieldRule { field: "tls_opn", min: 0.0, max: 100_000.0 },
    FieldRule { field: "drivers_hauler", min: 0.0, max: 100_000.0 },
    FieldRule { field: "fuel_cons", min: 0.0, max: 1_000.0 },
    FieldRule { field: "diesel_price", min: 0.0, max: 500.0 },
    FieldRule { field: "ta_inc", min: 0.0, max: 100_000.0 },
    FieldRule { field: "lkgtc", min: 0.0, max: 1_000_000.0 },
];

/// Looks up the rule for a field name
pub fn rule_for(field: &str) -> Option<&'static FieldRule> {
    VALIDATION_RULES.iter().find(|rule| rule.field == field)
}

/// Checks a single field value against its range
pub fn validate_field(field: &str, value: f64) -> Result<f64, ValidationError> {
    let rule = rule_for(field).ok_or_else(|| ValidationError::UnknownField(field.to_string()))?;

    if !value.is_finite() {
        return Err(ValidationError::NotFinite(field.to_string()));
    }
    if value < rule.min || value > rule.max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
            min: rule.min,
            max: rule.max,
        });
    }
    Ok(value)
}

/// Checks every numeric field of a record, stopping at the first failure
pub fn validate_record(record: &CostRecord) -> Result<(), ValidationError> {
    let c = &record.costs;
    let fields = [
        ("barangay_fee", c.barangay_fee),
        ("rental_rate", c.rental_rate),
        ("tls_opn", c.tls_opn),
        ("drivers_hauler", c.drivers_hauler),
        ("fuel_cons", c.fuel_cons),
        ("diesel_price", c.diesel_price),
        ("ta_inc", c.ta_inc),
        ("lkgtc", record.lkg),
    ];

    for (field, value) in fields {
        validate_field(field, value)?;
    }
    Ok(())
}

/// Drops every record that fails validation and returns the rejected
/// locations with their errors
pub fn retain_valid(records: &mut Vec<CostRecord>) -> Vec<(String, ValidationError)> {
    let mut rejected = Vec::new();
    records.retain(|record| match validate_record(record) {
        Ok(()) => true,
        Err(e) => {
            rejected.push((record.location.clone(), e));
            false
        }
    });
    rejected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CostComponents;

    #[test]
    fn test_within_range() {
        assert_eq!(validate_field("diesel_price", 62.5), Ok(62.5));
        assert_eq!(validate_field("lkgtc", 0.0), Ok(0.0));
    }

    #[test]
    fn test_out_of_range() {
        let err = validate_field("diesel_price", 501.0).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: "diesel_price".to_string(),
                value: 501.0,
                min: 0.0,
                max: 500.0,
            }
        );
        assert!(validate_field("tls_opn", -1.0).is_err());
    }

    #[test]
    fn test_not_finite() {
        assert_eq!(
            validate_field("fuel_cons", f64::NAN),
            Err(ValidationError::NotFinite("fuel_cons".to_string()))
        );
    }

    #[test]
    fn test_unknown_field() {
        assert!(matches!(
            validate_field("tip_jar", 1.0),
            Err(ValidationError::UnknownField(_))
        ));
    }

    #[test]
    fn test_validate_record() {
        let mut record = CostRecord::new(
            "BATO",
            "NORTH",
            CostComponents {
                fuel_cons: 100.0,
                diesel_price: 60.0,
                ..CostComponents::default()
            },
            5000.0,
        );
        assert!(validate_record(&record).is_ok());

        record.costs.fuel_cons = 2000.0;
        assert!(matches!(
            validate_record(&record),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "fuel_cons"
        ));
    }

    #[test]
    fn test_retain_valid_drops_rejected_records() {
        let mut records = vec![
            CostRecord::from_total_cost("A", 100.0, 50.0),
            CostRecord::from_total_cost("NEGATIVE", -10.0, 50.0),
            CostRecord::from_total_cost("B", 200.0, 2_000_000.0),
            CostRecord::from_total_cost("C", 300.0, 0.0),
        ];
        let rejected = retain_valid(&mut records);

        let kept: Vec<&str> = records.iter().map(|r| r.location.as_str()).collect();
        assert_eq!(kept, vec!["A", "C"]);
        let names: Vec<&str> = rejected.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["NEGATIVE", "B"]);
    }
}
