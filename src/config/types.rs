//! Configuration types for tax schedules.
//!
//! This module contains the strongly-typed tax tables that are deserialized
//! from YAML configuration files: bracket tables, exemption phaseouts, and the
//! federal and per-jurisdiction schedules built from them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{EngineError, EngineResult};

/// One marginal bracket of a tax table.
///
/// `limit` is the cumulative upper bound of the bracket; `None` marks the
/// final, unbounded bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    /// Marginal rate applied inside this bracket, as a fraction.
    pub rate: Decimal,
    /// Upper bound of the bracket, or `None` for unbounded.
    #[serde(default)]
    pub limit: Option<Decimal>,
}

impl Bracket {
    /// Creates a bracket capped at `limit`.
    pub fn capped(rate: Decimal, limit: Decimal) -> Self {
        Self {
            rate,
            limit: Some(limit),
        }
    }

    /// Creates the unbounded bracket.
    pub fn unbounded(rate: Decimal) -> Self {
        Self { rate, limit: None }
    }
}

/// An ordered marginal-rate schedule.
///
/// Rates need not increase, so regressive schedules such as capped payroll
/// taxes are expressed with the same type.
///
/// # Example
///
/// ```
/// use offer_engine::config::{Bracket, BracketTable};
/// use rust_decimal::Decimal;
///
/// let table = BracketTable::new(vec![
///     Bracket::capped(Decimal::new(10, 2), Decimal::from(10_000)),
///     Bracket::unbounded(Decimal::new(20, 2)),
/// ]);
/// assert!(table.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BracketTable(Vec<Bracket>);

impl BracketTable {
    /// Creates a table from brackets in ascending limit order.
    pub fn new(brackets: Vec<Bracket>) -> Self {
        Self(brackets)
    }

    /// A single unbounded bracket: a flat tax at `rate`.
    pub fn flat(rate: Decimal) -> Self {
        Self(vec![Bracket::unbounded(rate)])
    }

    /// The table that never taxes anything.
    pub fn untaxed() -> Self {
        Self::flat(Decimal::ZERO)
    }

    /// Returns the brackets in ascending order.
    pub fn brackets(&self) -> &[Bracket] {
        &self.0
    }

    /// Checks the table invariants: non-empty, non-decreasing limits, and an
    /// unbounded final bracket.
    pub fn validate(&self) -> Result<(), String> {
        let Some(last) = self.0.last() else {
            return Err("bracket table is empty".to_string());
        };
        if last.limit.is_some() {
            return Err("final bracket must be unbounded".to_string());
        }

        let mut previous = Decimal::ZERO;
        for (index, bracket) in self.0[..self.0.len() - 1].iter().enumerate() {
            match bracket.limit {
                None => {
                    return Err(format!(
                        "bracket {} is unbounded but is not the final bracket",
                        index + 1
                    ));
                }
                Some(limit) if limit < previous => {
                    return Err(format!(
                        "bracket {} limit {} is below the previous limit {}",
                        index + 1,
                        limit,
                        previous
                    ));
                }
                Some(limit) => previous = limit,
            }
        }
        Ok(())
    }
}

/// An exemption that phases out linearly as income rises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExemptionPhaseout {
    /// The full exemption amount.
    pub amount: Decimal,
    /// Income at which the phaseout begins.
    pub phaseout_start: Decimal,
    /// Income at which the exemption is fully phased out.
    pub phaseout_end: Decimal,
}

impl ExemptionPhaseout {
    /// Checks that the phaseout window is non-empty and the amount non-negative.
    pub fn validate(&self) -> Result<(), String> {
        if self.amount < Decimal::ZERO {
            return Err(format!("exemption amount {} is negative", self.amount));
        }
        if self.phaseout_end <= self.phaseout_start {
            return Err(format!(
                "phaseout end {} must be greater than phaseout start {}",
                self.phaseout_end, self.phaseout_start
            ));
        }
        Ok(())
    }
}

/// Federal tables from federal.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederalSchedule {
    /// The tax year these tables describe.
    pub tax_year: i32,
    /// Personal exemption and its phaseout.
    pub personal_exemption: ExemptionPhaseout,
    /// Federal standard deduction.
    pub standard_deduction: Decimal,
    /// Ordinary federal income tax brackets.
    pub brackets: BracketTable,
    /// AMT exemption and its phaseout.
    pub amt_exemption: ExemptionPhaseout,
    /// Alternative minimum tax brackets.
    pub amt_brackets: BracketTable,
    /// Medicare tax brackets.
    pub medicare_brackets: BracketTable,
    /// Social security tax brackets.
    pub social_security_brackets: BracketTable,
}

/// Tables for one income-earning jurisdiction (a state or province).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JurisdictionSchedule {
    /// Short code used to tag income, e.g. "CA".
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Jurisdiction standard deduction.
    pub standard_deduction: Decimal,
    /// Jurisdiction income tax brackets.
    pub brackets: BracketTable,
    /// Payroll-style disability insurance brackets, applied to gross income.
    pub disability_insurance_brackets: BracketTable,
}

/// A complete tax schedule: federal tables plus every known jurisdiction.
#[derive(Debug, Clone)]
pub struct TaxSchedule {
    federal: FederalSchedule,
    jurisdictions: HashMap<String, JurisdictionSchedule>,
}

impl TaxSchedule {
    /// Creates a schedule, keying jurisdictions by their code.
    ///
    /// Returns an error if two jurisdictions share a code.
    pub fn new(
        federal: FederalSchedule,
        jurisdictions: Vec<JurisdictionSchedule>,
    ) -> EngineResult<Self> {
        let mut by_code = HashMap::with_capacity(jurisdictions.len());
        for jurisdiction in jurisdictions {
            let code = jurisdiction.code.clone();
            if by_code.insert(code.clone(), jurisdiction).is_some() {
                return Err(EngineError::InvalidConfig {
                    path: "jurisdictions".to_string(),
                    message: format!("jurisdiction '{}' is defined more than once", code),
                });
            }
        }
        Ok(Self {
            federal,
            jurisdictions: by_code,
        })
    }

    /// Returns the federal tables.
    pub fn federal(&self) -> &FederalSchedule {
        &self.federal
    }

    /// Returns the tax year of the federal tables.
    pub fn tax_year(&self) -> i32 {
        self.federal.tax_year
    }

    /// Looks up a jurisdiction by code.
    pub fn jurisdiction(&self, code: &str) -> EngineResult<&JurisdictionSchedule> {
        self.jurisdictions
            .get(code)
            .ok_or_else(|| EngineError::JurisdictionNotFound {
                code: code.to_string(),
            })
    }

    /// Returns the known jurisdiction codes in sorted order.
    pub fn jurisdiction_codes(&self) -> Vec<&str> {
        let sorted: BTreeMap<&str, ()> = self
            .jurisdictions
            .keys()
            .map(|code| (code.as_str(), ()))
            .collect();
        sorted.into_keys().collect()
    }
}
