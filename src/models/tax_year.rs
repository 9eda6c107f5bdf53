//! Per-year tax records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tax owed to one jurisdiction for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionTax {
    /// Gross income earned in the jurisdiction.
    pub income: Decimal,
    /// Income after the jurisdiction standard deduction.
    pub taxable_income: Decimal,
    /// Jurisdiction income tax.
    pub income_tax: Decimal,
    /// Disability insurance, computed on gross income.
    pub disability_insurance: Decimal,
}

impl JurisdictionTax {
    /// Income tax plus disability insurance.
    pub fn total(&self) -> Decimal {
        self.income_tax + self.disability_insurance
    }
}

/// The tax picture of one calendar year.
///
/// `payout_tax` is the liability that take-home queries prorate. It uses the
/// ordinary federal tax even when the AMT is larger; `federal_liability` and
/// `combined_liability` carry the AMT-adjusted figures for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearRecord {
    /// The calendar year.
    pub year: i32,
    /// Total income across all jurisdictions.
    pub income: Decimal,
    /// Breakdown by jurisdiction code.
    pub jurisdictions: BTreeMap<String, JurisdictionTax>,
    /// Sum of all jurisdiction taxes.
    pub jurisdiction_tax: Decimal,
    /// Personal exemption after phaseout.
    pub personal_exemption: Decimal,
    /// Larger of itemized (jurisdiction tax) and standard deduction.
    pub federal_deduction: Decimal,
    /// Income less the personal exemption.
    pub federal_taxable_income: Decimal,
    /// Ordinary federal income tax.
    pub federal_tax: Decimal,
    /// Alternative minimum tax.
    pub amt: Decimal,
    /// Larger of `federal_tax` and `amt`.
    pub federal_liability: Decimal,
    /// Medicare tax.
    pub medicare_tax: Decimal,
    /// Social security tax.
    pub social_security_tax: Decimal,
    /// Liability prorated over the year's income by take-home queries.
    pub payout_tax: Decimal,
    /// Total liability with the AMT override applied.
    pub combined_liability: Decimal,
}

impl TaxYearRecord {
    /// Returns true if the AMT exceeds the ordinary federal tax.
    pub fn amt_applies(&self) -> bool {
        self.amt > self.federal_tax
    }
}
