//! Load plans from loosely-typed JSON documents
//!
//! Plan documents come from hand-edited files and form submissions, so every
//! numeric field may be a number, a numeric string, empty, null, or missing.
//! Anything that does not parse to a finite number falls back to its default.
//! Only a document that is not a JSON object at all is rejected.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

use super::{AssetClass, InvestmentBucket, PersonalInfo, Plan, PostRetirementAllocation};
use crate::assumptions::{default_irr, MAX_AGE};

/// Failure to read a plan document
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("failed to read plan: {0}")]
    Io(#[from] std::io::Error),

    #[error("plan is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("plan document must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Load a plan from a JSON file
pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<Plan, PlanError> {
    let file = File::open(path)?;
    load_plan_from_reader(BufReader::new(file))
}

/// Load a plan from any reader (string buffer, request body, ...)
pub fn load_plan_from_reader<R: Read>(reader: R) -> Result<Plan, PlanError> {
    let value: Value = serde_json::from_reader(reader)?;
    plan_from_value(&value)
}

/// Normalize an already-parsed JSON document into a plan
pub fn plan_from_value(value: &Value) -> Result<Plan, PlanError> {
    let root = value
        .as_object()
        .ok_or_else(|| PlanError::NotAnObject(json_kind(value)))?;

    let personal = section(root, "personal_info");
    let defaults = PersonalInfo::default();
    let personal_info = PersonalInfo {
        current_age: age(personal.get("current_age"), defaults.current_age),
        retirement_age: age(personal.get("retirement_age"), defaults.retirement_age),
        life_expectancy: age(personal.get("life_expectancy"), defaults.life_expectancy),
        current_savings: number_or(personal.get("current_savings"), 0.0),
        inflation_rate_pct: number_or(personal.get("inflation_rate_pct"), defaults.inflation_rate_pct),
        capital_gains_tax_rate_pct: number_or(
            personal.get("capital_gains_tax_rate_pct"),
            defaults.capital_gains_tax_rate_pct,
        ),
        income_tax_rate_pct: number_or(
            personal.get("income_tax_rate_pct"),
            defaults.income_tax_rate_pct,
        ),
        step_up_rate_pct: number_or(personal.get("step_up_rate_pct"), defaults.step_up_rate_pct),
    };

    let investments_section = section(root, "investments");
    let investments = AssetClass::ALL
        .iter()
        .map(|&asset_class| {
            let bucket = investments_section
                .get(asset_class.key())
                .and_then(Value::as_object);
            match bucket {
                Some(fields) => InvestmentBucket {
                    asset_class,
                    amount: number_or(fields.get("amount"), 0.0),
                    irr: number_or(fields.get("irr"), default_irr(asset_class)),
                },
                None => InvestmentBucket::empty(asset_class),
            }
        })
        .collect();

    let post = section(root, "post_retirement");
    let post_defaults = PostRetirementAllocation::default();
    let post_retirement = PostRetirementAllocation {
        fixed_returns_pct: number_or(post.get("fixed_returns_pct"), post_defaults.fixed_returns_pct),
        large_cap_pct: number_or(post.get("large_cap_pct"), post_defaults.large_cap_pct),
    };

    Ok(Plan {
        personal_info,
        income: amounts(section(root, "income")),
        expenses: amounts(section(root, "expenses")),
        investments,
        post_retirement,
        goals: amounts(section(root, "goals")),
    })
}

/// A named section of the document; missing or malformed sections read as empty
#[derive(Clone, Copy)]
struct Section<'a>(Option<&'a Map<String, Value>>);

impl<'a> Section<'a> {
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.0.and_then(|fields| fields.get(key))
    }

    fn entries(&self) -> impl Iterator<Item = (&'a String, &'a Value)> {
        self.0.into_iter().flat_map(|fields| fields.iter())
    }
}

fn section<'a>(root: &'a Map<String, Value>, name: &str) -> Section<'a> {
    Section(root.get(name).and_then(Value::as_object))
}

/// Coerce a JSON value to a finite number
fn number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn number_or(value: Option<&Value>, default: f64) -> f64 {
    number(value).unwrap_or(default)
}

/// Whole years; fractional ages are truncated, negative or implausible ones are rejected
fn age(value: Option<&Value>, default: u32) -> u32 {
    number(value)
        .filter(|n| *n >= 0.0 && *n < (MAX_AGE + 1) as f64)
        .map(|n| n.trunc() as u32)
        .unwrap_or(default)
}

/// Labelled monthly amounts; unparseable entries count as 0
fn amounts(section: Section<'_>) -> BTreeMap<String, f64> {
    section
        .entries()
        .map(|(label, value)| (label.clone(), number_or(Some(value), 0.0)))
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_document_gives_defaults() {
        let plan = plan_from_value(&json!({})).unwrap();
        assert_eq!(plan, Plan::default());
    }

    #[test]
    fn test_strings_and_garbage_are_coerced() {
        let doc = json!({
            "personal_info": {
                "current_age": "42",
                "retirement_age": "",
                "life_expectancy": "old",
                "current_savings": " 15000.5 ",
                "inflation_rate_pct": null,
                "step_up_rate_pct": 0
            },
            "income": { "Salary": "50000", "Bonus": "n/a" },
            "expenses": { "Housing": 12000, "Food": "3000" },
            "investments": {
                "gold": { "amount": "250" },
                "direct_stocks": { "amount": 1000, "irr": "14" },
                "smallcap_fund": "not a bucket"
            }
        });

        let plan = plan_from_value(&doc).unwrap();
        assert_eq!(plan.personal_info.current_age, 42);
        assert_eq!(plan.personal_info.retirement_age, 65);
        assert_eq!(plan.personal_info.life_expectancy, 85);
        assert_eq!(plan.personal_info.current_savings, 15000.5);
        assert_eq!(plan.personal_info.inflation_rate_pct, 6.0);
        // An explicit zero is a value, not a missing field
        assert_eq!(plan.personal_info.step_up_rate_pct, 0.0);

        assert_eq!(plan.income.get("Bonus"), Some(&0.0));
        assert_eq!(plan.total_income(), 50000.0);
        assert_eq!(plan.total_expenses(), 15000.0);

        let gold = plan.bucket(AssetClass::Gold).unwrap();
        assert_eq!((gold.amount, gold.irr), (250.0, 7.0));
        let stocks = plan.bucket(AssetClass::DirectStocks).unwrap();
        assert_eq!((stocks.amount, stocks.irr), (1000.0, 14.0));
        let smallcap = plan.bucket(AssetClass::SmallcapFund).unwrap();
        assert_eq!((smallcap.amount, smallcap.irr), (0.0, 18.0));
    }

    #[test]
    fn test_fractional_and_negative_ages() {
        let doc = json!({ "personal_info": { "current_age": 30.9, "retirement_age": -5 } });
        let plan = plan_from_value(&doc).unwrap();
        assert_eq!(plan.personal_info.current_age, 30);
        assert_eq!(plan.personal_info.retirement_age, 65);
    }

    #[test]
    fn test_implausible_ages_fall_back_to_defaults() {
        let doc = json!({
            "personal_info": {
                "current_age": 0,
                "retirement_age": 4_000_000_000u64,
                "life_expectancy": "151"
            }
        });
        let plan = plan_from_value(&doc).unwrap();
        assert_eq!(plan.personal_info.current_age, 0);
        assert_eq!(plan.personal_info.retirement_age, 65);
        assert_eq!(plan.personal_info.life_expectancy, 85);

        let doc = json!({ "personal_info": { "retirement_age": 150.5 } });
        let plan = plan_from_value(&doc).unwrap();
        assert_eq!(plan.personal_info.retirement_age, MAX_AGE);

        let result = crate::projection::project(&plan_from_value(&json!({
            "personal_info": { "current_age": 0, "retirement_age": 50_000_000 }
        })).unwrap());
        assert_eq!(result.yearly_projections.len(), 65);
    }

    #[test]
    fn test_non_object_document_is_rejected() {
        let err = plan_from_value(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, PlanError::NotAnObject("an array")));
    }

    #[test]
    fn test_load_from_reader() {
        let doc = r#"{ "income": { "Salary": 1000 }, "goals": { "Emergency Fund": "60000" } }"#;
        let plan = load_plan_from_reader(doc.as_bytes()).unwrap();
        assert_eq!(plan.total_income(), 1000.0);
        assert_eq!(plan.goals.get("Emergency Fund"), Some(&60000.0));

        assert!(matches!(
            load_plan_from_reader("{ not json".as_bytes()),
            Err(PlanError::Json(_))
        ));
    }
}
