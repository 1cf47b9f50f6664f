//! Record Matching Rules
//!
//! Upstream records are opaque JSON objects carrying at least one of a fixed
//! set of identifier-like fields. Matching precedence: exact case-insensitive
//! equality against any candidate field first, then a bidirectional substring
//! fallback. Within each pass, the first record in iteration order wins, so
//! callers must hand in a deterministically ordered set.

use serde_json::Value;

// == Candidate Fields ==
/// Identifier-bearing fields checked on every record, in precedence order.
pub const CANDIDATE_ID_FIELDS: [&str; 5] = [
    "id",
    "bookingReference",
    "customBookingReference",
    "confirmationNumber",
    "reservationId",
];

// == Identifier Extraction ==
/// The record's primary identifier: the first candidate field present as a
/// string.
pub fn record_id(record: &Value) -> Option<&str> {
    CANDIDATE_ID_FIELDS
        .iter()
        .find_map(|field| record.get(field).and_then(Value::as_str))
}

/// Numeric portion of an id, for deterministic ordering. `"RRP-123"` sorts
/// as 123; ids without digits sort as 0.
pub fn numeric_id_portion(id: &str) -> u64 {
    let digits: String = id.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Sort key for a record; records without any identifier sort as 0.
pub fn sort_key(record: &Value) -> u64 {
    record_id(record).map(numeric_id_portion).unwrap_or(0)
}

// == Matching ==
/// Exact case-insensitive equality against any candidate field.
fn matches_exact(record: &Value, query: &str) -> bool {
    CANDIDATE_ID_FIELDS.iter().any(|field| {
        record
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|value| value.eq_ignore_ascii_case(query))
    })
}

/// Substring fallback: the field contains the query or the query contains
/// the field, case-insensitively.
fn matches_substring(record: &Value, query: &str) -> bool {
    let query_lower = query.to_lowercase();
    CANDIDATE_ID_FIELDS.iter().any(|field| {
        record
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|value| {
                let value_lower = value.to_lowercase();
                value_lower.contains(&query_lower) || query_lower.contains(&value_lower)
            })
    })
}

/// Finds the record matching a lookup id: first exact match wins; only when
/// no record matches exactly does the substring fallback run.
pub fn find_match<'a>(records: &'a [Value], query: &str) -> Option<&'a Value> {
    records
        .iter()
        .find(|record| matches_exact(record, query))
        .or_else(|| records.iter().find(|record| matches_substring(record, query)))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id_precedence() {
        let record = json!({ "bookingReference": "BR-9", "id": "RRP-1" });
        assert_eq!(record_id(&record), Some("RRP-1"));

        let record = json!({ "confirmationNumber": "CN-5" });
        assert_eq!(record_id(&record), Some("CN-5"));

        assert_eq!(record_id(&json!({ "price": 100 })), None);
    }

    #[test]
    fn test_numeric_id_portion() {
        assert_eq!(numeric_id_portion("RRP-123"), 123);
        assert_eq!(numeric_id_portion("42"), 42);
        assert_eq!(numeric_id_portion("no-digits"), 0);
        assert_eq!(numeric_id_portion(""), 0);
    }

    #[test]
    fn test_exact_match_case_insensitive() {
        let records = vec![json!({ "id": "rrp-10" }), json!({ "id": "RRP-2" })];
        let found = find_match(&records, "RRP-10").unwrap();
        assert_eq!(found["id"], "rrp-10");
    }

    #[test]
    fn test_exact_match_on_secondary_field() {
        let records = vec![
            json!({ "id": "X-1", "bookingReference": "BR-77" }),
            json!({ "id": "X-2" }),
        ];
        let found = find_match(&records, "br-77").unwrap();
        assert_eq!(found["id"], "X-1");
    }

    #[test]
    fn test_exact_beats_substring() {
        // The first record would match "RRP-1" as a substring, but the
        // second matches exactly and must win.
        let records = vec![json!({ "id": "RRP-10" }), json!({ "id": "RRP-1" })];
        let found = find_match(&records, "RRP-1").unwrap();
        assert_eq!(found["id"], "RRP-1");
    }

    #[test]
    fn test_substring_fallback_both_directions() {
        let records = vec![json!({ "id": "RRP-10" })];
        // Field contains query.
        assert!(find_match(&records, "P-10").is_some());
        // Query contains field.
        assert!(find_match(&records, "XX-RRP-10-YY").is_some());
    }

    #[test]
    fn test_no_match() {
        let records = vec![json!({ "id": "RRP-1" }), json!({ "id": "RRP-2" })];
        assert!(find_match(&records, "ZZZ").is_none());
    }

    #[test]
    fn test_substring_first_in_order_wins() {
        let records = vec![json!({ "id": "RRP-11" }), json!({ "id": "RRP-12" })];
        // Both contain "RRP-1" as a substring; the first in order wins.
        let found = find_match(&records, "RRP-1").unwrap();
        assert_eq!(found["id"], "RRP-11");
    }
}
