//! Tax year aggregation and take-home pay.
//!
//! A [`TaxAssessment`] is built once from an offer's complete projected income
//! history. It buckets the income by calendar year and jurisdiction, computes
//! every year's liability up front, and then answers take-home queries by
//! prorating the year's liability over the year's income.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

use crate::config::TaxSchedule;
use crate::error::{EngineError, EngineResult};
use crate::models::{IncomeEvent, JurisdictionTax, TaxYearRecord};

use super::{calculate_due, effective_exemption};

/// Something that can assess taxes over a projected income history.
///
/// The earnings table builder takes an `Option<&dyn TaxModel>`; `None` means
/// figures are reported pre-tax.
pub trait TaxModel {
    /// Builds the assessment for one offer's income events.
    fn assess(&self, events: &[IncomeEvent]) -> EngineResult<TaxAssessment>;
}

impl TaxModel for TaxSchedule {
    fn assess(&self, events: &[IncomeEvent]) -> EngineResult<TaxAssessment> {
        TaxAssessment::new(self, events)
    }
}

/// Computed tax liability over a multi-year income history.
#[derive(Debug, Clone)]
pub struct TaxAssessment {
    income_dates: HashSet<NaiveDate>,
    years: BTreeMap<i32, TaxYearRecord>,
}

impl TaxAssessment {
    /// Aggregates `events` and computes every year's liability under `schedule`.
    ///
    /// Returns `JurisdictionNotFound` if an event is tagged with a
    /// jurisdiction the schedule does not define.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use offer_engine::calculation::TaxAssessment;
    /// use offer_engine::config::ConfigLoader;
    /// use offer_engine::models::IncomeEvent;
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let loader = ConfigLoader::load("./config/tax2016")?;
    /// let day = NaiveDate::from_ymd_opt(2016, 9, 1).unwrap();
    /// let events = vec![IncomeEvent::new(day, Decimal::from(150_000), "CA")];
    /// let assessment = TaxAssessment::new(loader.schedule(), &events)?;
    /// let take_home = assessment.take_home_pay(day, Decimal::from(1_000))?;
    /// # Ok::<(), offer_engine::error::EngineError>(())
    /// ```
    pub fn new(schedule: &TaxSchedule, events: &[IncomeEvent]) -> EngineResult<Self> {
        let mut income_by_year: BTreeMap<i32, BTreeMap<&str, Decimal>> = BTreeMap::new();
        let mut income_dates = HashSet::new();
        for event in events {
            *income_by_year
                .entry(event.date.year())
                .or_default()
                .entry(event.jurisdiction.as_str())
                .or_default() += event.amount;
            income_dates.insert(event.date);
        }

        let mut years = BTreeMap::new();
        for (year, by_jurisdiction) in income_by_year {
            let record = assess_year(schedule, year, &by_jurisdiction)?;
            years.insert(year, record);
        }

        Ok(Self {
            income_dates,
            years,
        })
    }

    /// Returns the take-home portion of `gross` paid on `date`.
    ///
    /// The year's payout tax is spread over the year's income in proportion
    /// to each payment's share, so every payment in a year is taxed at the
    /// same effective rate regardless of when in the year it arrives.
    ///
    /// Returns `UnregisteredIncomeDate` if `date` was not among the income
    /// events, or `ZeroIncomeYear` if that year's income sums to zero.
    pub fn take_home_pay(&self, date: NaiveDate, gross: Decimal) -> EngineResult<Decimal> {
        if !self.income_dates.contains(&date) {
            return Err(EngineError::UnregisteredIncomeDate { date });
        }
        let record = self
            .years
            .get(&date.year())
            .ok_or(EngineError::UnregisteredIncomeDate { date })?;
        if record.income.is_zero() {
            return Err(EngineError::ZeroIncomeYear { year: record.year });
        }

        Ok(gross - (gross / record.income) * record.payout_tax)
    }

    /// Returns the record for `year`, if any income fell in it.
    pub fn year(&self, year: i32) -> Option<&TaxYearRecord> {
        self.years.get(&year)
    }

    /// Returns every year's record in ascending year order.
    pub fn years(&self) -> impl Iterator<Item = &TaxYearRecord> {
        self.years.values()
    }
}

fn assess_year(
    schedule: &TaxSchedule,
    year: i32,
    by_jurisdiction: &BTreeMap<&str, Decimal>,
) -> EngineResult<TaxYearRecord> {
    let federal = schedule.federal();
    let income: Decimal = by_jurisdiction.values().sum();

    let mut jurisdictions = BTreeMap::new();
    let mut jurisdiction_tax = Decimal::ZERO;
    for (&code, &jurisdiction_income) in by_jurisdiction {
        let tables = schedule.jurisdiction(code)?;
        let taxable_income = (jurisdiction_income - tables.standard_deduction).max(Decimal::ZERO);
        let tax = JurisdictionTax {
            income: jurisdiction_income,
            taxable_income,
            income_tax: calculate_due(taxable_income, &tables.brackets),
            disability_insurance: calculate_due(
                jurisdiction_income,
                &tables.disability_insurance_brackets,
            ),
        };
        debug!(
            year,
            jurisdiction = code,
            income = %jurisdiction_income,
            taxable_income = %taxable_income,
            income_tax = %tax.income_tax,
            disability_insurance = %tax.disability_insurance,
            rate_pct = %percent(tax.total(), jurisdiction_income),
            "jurisdiction tax"
        );
        jurisdiction_tax += tax.total();
        jurisdictions.insert(code.to_string(), tax);
    }

    let personal_exemption = effective_exemption(income, &federal.personal_exemption);
    let federal_taxable_income = (income - personal_exemption).max(Decimal::ZERO);
    // Jurisdiction taxes are the only itemized deduction modelled.
    let federal_deduction = jurisdiction_tax.max(federal.standard_deduction);
    let federal_tax = calculate_due(
        (federal_taxable_income - federal_deduction).max(Decimal::ZERO),
        &federal.brackets,
    );

    let amt_exemption = effective_exemption(income, &federal.amt_exemption);
    let amt = calculate_due(
        (income - amt_exemption).max(Decimal::ZERO),
        &federal.amt_brackets,
    );
    if federal_tax < amt {
        info!(
            year,
            income = %income,
            federal_tax = %federal_tax,
            amt = %amt,
            "AMT exceeds ordinary federal tax"
        );
    }
    let federal_liability = federal_tax.max(amt);

    let medicare_tax = calculate_due(income, &federal.medicare_brackets);
    let social_security_tax = calculate_due(income, &federal.social_security_brackets);

    let payroll = jurisdiction_tax + medicare_tax + social_security_tax;
    // The payout rate deliberately ignores the AMT override.
    let payout_tax = federal_tax + payroll;
    let combined_liability = federal_liability + payroll;

    debug!(
        year,
        income = %income,
        personal_exemption = %personal_exemption,
        federal_deduction = %federal_deduction,
        federal_taxable_income = %federal_taxable_income,
        combined_liability = %combined_liability,
        rate_pct = %percent(combined_liability, income),
        "tax year"
    );

    Ok(TaxYearRecord {
        year,
        income,
        jurisdictions,
        jurisdiction_tax,
        personal_exemption,
        federal_deduction,
        federal_taxable_income,
        federal_tax,
        amt,
        federal_liability,
        medicare_tax,
        social_security_tax,
        payout_tax,
        combined_liability,
    })
}

fn percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        (Decimal::ONE_HUNDRED * part / whole).round_dp(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        Bracket, BracketTable, ExemptionPhaseout, FederalSchedule, JurisdictionSchedule,
    };
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// A small schedule with round numbers so expected values are obvious.
    fn create_test_schedule() -> TaxSchedule {
        let federal = FederalSchedule {
            tax_year: 2016,
            personal_exemption: ExemptionPhaseout {
                amount: dec("4000"),
                phaseout_start: dec("200000"),
                phaseout_end: dec("300000"),
            },
            standard_deduction: dec("6000"),
            brackets: BracketTable::new(vec![
                Bracket::capped(dec("0.10"), dec("50000")),
                Bracket::unbounded(dec("0.30")),
            ]),
            amt_exemption: ExemptionPhaseout {
                amount: dec("50000"),
                phaseout_start: dec("100000"),
                phaseout_end: dec("300000"),
            },
            amt_brackets: BracketTable::flat(dec("0.26")),
            medicare_brackets: BracketTable::flat(dec("0.01")),
            social_security_brackets: BracketTable::new(vec![
                Bracket::capped(dec("0.05"), dec("100000")),
                Bracket::unbounded(Decimal::ZERO),
            ]),
        };
        let taxed = JurisdictionSchedule {
            code: "CA".to_string(),
            name: "California".to_string(),
            standard_deduction: dec("4000"),
            brackets: BracketTable::flat(dec("0.05")),
            disability_insurance_brackets: BracketTable::new(vec![
                Bracket::capped(dec("0.01"), dec("100000")),
                Bracket::unbounded(Decimal::ZERO),
            ]),
        };
        let untaxed = JurisdictionSchedule {
            code: "WA".to_string(),
            name: "Washington".to_string(),
            standard_deduction: Decimal::ZERO,
            brackets: BracketTable::untaxed(),
            disability_insurance_brackets: BracketTable::untaxed(),
        };
        TaxSchedule::new(federal, vec![taxed, untaxed]).unwrap()
    }

    #[test]
    fn test_single_jurisdiction_year() {
        let schedule = create_test_schedule();
        let events = vec![IncomeEvent::new(date(2017, 3, 1), dec("100000"), "CA")];

        let assessment = TaxAssessment::new(&schedule, &events).unwrap();
        let record = assessment.year(2017).unwrap();

        // CA: 5% of 96000 + 1% of 100000
        assert_eq!(record.jurisdictions["CA"].income_tax, dec("4800"));
        assert_eq!(record.jurisdictions["CA"].disability_insurance, dec("1000"));
        assert_eq!(record.jurisdiction_tax, dec("5800"));
        // Full personal exemption; standard deduction beats 5800 itemized.
        assert_eq!(record.personal_exemption, dec("4000"));
        assert_eq!(record.federal_deduction, dec("6000"));
        // Taxable 90000: 5000 + 0.30 * 40000
        assert_eq!(record.federal_tax, dec("17000"));
        // AMT: 26% of (100000 - 50000)
        assert_eq!(record.amt, dec("13000"));
        assert_eq!(record.federal_liability, dec("17000"));
        assert_eq!(record.medicare_tax, dec("1000"));
        assert_eq!(record.social_security_tax, dec("5000"));
        assert_eq!(record.payout_tax, dec("28800"));
        assert_eq!(record.combined_liability, dec("28800"));
        assert!(!record.amt_applies());
    }

    #[test]
    fn test_itemized_jurisdiction_tax_beats_standard_deduction() {
        let schedule = create_test_schedule();
        let events = vec![IncomeEvent::new(date(2017, 3, 1), dec("200000"), "CA")];

        let record = TaxAssessment::new(&schedule, &events)
            .unwrap()
            .year(2017)
            .unwrap()
            .clone();

        // 5% of 196000 + 1000 SDI
        assert_eq!(record.jurisdiction_tax, dec("10800"));
        assert_eq!(record.federal_deduction, dec("10800"));
    }

    #[test]
    fn test_amt_override_is_informational_for_payout() {
        let mut schedule = create_test_schedule();
        let mut federal = schedule.federal().clone();
        federal.amt_brackets = BracketTable::flat(dec("0.50"));
        schedule = TaxSchedule::new(
            federal,
            vec![schedule.jurisdiction("WA").unwrap().clone()],
        )
        .unwrap();
        let events = vec![IncomeEvent::new(date(2017, 3, 1), dec("100000"), "WA")];

        let record = TaxAssessment::new(&schedule, &events)
            .unwrap()
            .year(2017)
            .unwrap()
            .clone();

        // Ordinary: taxable 90000 -> 17000. AMT: 50% of 50000.
        assert_eq!(record.federal_tax, dec("17000"));
        assert_eq!(record.amt, dec("25000"));
        assert!(record.amt_applies());
        assert_eq!(record.federal_liability, dec("25000"));
        assert_eq!(record.payout_tax, dec("17000") + dec("6000"));
        assert_eq!(record.combined_liability, dec("25000") + dec("6000"));
    }

    #[test]
    fn test_income_is_bucketed_by_year_and_jurisdiction() {
        let schedule = create_test_schedule();
        let events = vec![
            IncomeEvent::new(date(2016, 12, 31), dec("30000"), "WA"),
            IncomeEvent::new(date(2017, 1, 1), dec("60000"), "CA"),
            IncomeEvent::new(date(2017, 1, 1), dec("10000"), "WA"),
            IncomeEvent::new(date(2017, 6, 1), dec("30000"), "CA"),
        ];

        let assessment = TaxAssessment::new(&schedule, &events).unwrap();

        assert_eq!(assessment.years().count(), 2);
        assert_eq!(assessment.year(2016).unwrap().income, dec("30000"));
        let record = assessment.year(2017).unwrap();
        assert_eq!(record.income, dec("100000"));
        assert_eq!(record.jurisdictions["CA"].income, dec("90000"));
        assert_eq!(record.jurisdictions["WA"].income, dec("10000"));
        assert!(assessment.year(2018).is_none());
    }

    #[test]
    fn test_untaxed_jurisdiction_contributes_nothing() {
        let schedule = create_test_schedule();
        let events = vec![
            IncomeEvent::new(date(2016, 9, 1), dec("120000"), "WA"),
            IncomeEvent::new(date(2017, 9, 1), dec("450000"), "WA"),
        ];

        let assessment = TaxAssessment::new(&schedule, &events).unwrap();

        for record in assessment.years() {
            assert_eq!(record.jurisdiction_tax, Decimal::ZERO);
        }
    }

    #[test]
    fn test_personal_exemption_phases_out() {
        let schedule = create_test_schedule();
        let events = vec![IncomeEvent::new(date(2017, 3, 1), dec("250000"), "WA")];

        let record = TaxAssessment::new(&schedule, &events)
            .unwrap()
            .year(2017)
            .unwrap()
            .clone();

        assert_eq!(record.personal_exemption, dec("2000"));
        assert_eq!(record.federal_taxable_income, dec("248000"));
    }

    #[test]
    fn test_unknown_jurisdiction_returns_error() {
        let schedule = create_test_schedule();
        let events = vec![IncomeEvent::new(date(2017, 3, 1), dec("1000"), "NY")];

        match TaxAssessment::new(&schedule, &events) {
            Err(EngineError::JurisdictionNotFound { code }) => assert_eq!(code, "NY"),
            other => panic!("Expected JurisdictionNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_take_home_prorates_year_tax() {
        let schedule = create_test_schedule();
        let events = vec![
            IncomeEvent::new(date(2017, 3, 1), dec("60000"), "CA"),
            IncomeEvent::new(date(2017, 9, 1), dec("40000"), "CA"),
        ];
        let assessment = TaxAssessment::new(&schedule, &events).unwrap();

        // Year tax 28800 on 100000 income: a flat 28.8% effective rate.
        assert_eq!(
            assessment.take_home_pay(date(2017, 3, 1), dec("60000")).unwrap(),
            dec("42720")
        );
        assert_eq!(
            assessment.take_home_pay(date(2017, 9, 1), dec("40000")).unwrap(),
            dec("28480")
        );
    }

    #[test]
    fn test_take_home_for_unregistered_date_returns_error() {
        let schedule = create_test_schedule();
        let events = vec![IncomeEvent::new(date(2017, 3, 1), dec("60000"), "CA")];
        let assessment = TaxAssessment::new(&schedule, &events).unwrap();

        match assessment.take_home_pay(date(2017, 3, 2), dec("100")) {
            Err(EngineError::UnregisteredIncomeDate { date: d }) => {
                assert_eq!(d, date(2017, 3, 2));
            }
            other => panic!("Expected UnregisteredIncomeDate, got {:?}", other),
        }
    }

    #[test]
    fn test_take_home_for_zero_income_year_returns_error() {
        let schedule = create_test_schedule();
        let events = vec![
            IncomeEvent::new(date(2017, 3, 1), Decimal::ZERO, "CA"),
            IncomeEvent::new(date(2017, 4, 1), Decimal::ZERO, "CA"),
        ];
        let assessment = TaxAssessment::new(&schedule, &events).unwrap();

        match assessment.take_home_pay(date(2017, 3, 1), dec("100")) {
            Err(EngineError::ZeroIncomeYear { year }) => assert_eq!(year, 2017),
            other => panic!("Expected ZeroIncomeYear, got {:?}", other),
        }
    }

    #[test]
    fn test_schedule_is_a_tax_model() {
        let schedule = create_test_schedule();
        let model: &dyn TaxModel = &schedule;
        let events = vec![IncomeEvent::new(date(2017, 3, 1), dec("100000"), "CA")];

        let assessment = model.assess(&events).unwrap();
        assert_eq!(assessment.year(2017).unwrap().payout_tax, dec("28800"));
    }

    proptest! {
        #[test]
        fn prop_take_home_is_linear_and_increasing(
            income in 10_000i64..2_000_000,
            low in 0i64..100_000,
            step in 1i64..100_000,
        ) {
            let schedule = create_test_schedule();
            let day = date(2017, 5, 1);
            let events = vec![IncomeEvent::new(day, Decimal::from(income), "CA")];
            let assessment = TaxAssessment::new(&schedule, &events).unwrap();

            let at_zero = assessment.take_home_pay(day, Decimal::ZERO).unwrap();
            let at_low = assessment.take_home_pay(day, Decimal::from(low)).unwrap();
            let at_high = assessment.take_home_pay(day, Decimal::from(low + step)).unwrap();

            prop_assert_eq!(at_zero, Decimal::ZERO);
            prop_assert!(at_high > at_low);
            // Equal steps in gross give equal steps in take-home, up to rounding.
            let per_unit = assessment.take_home_pay(day, Decimal::ONE).unwrap();
            let expected = per_unit * Decimal::from(low);
            prop_assert!((at_low - expected).abs() < dec("0.000001"));
        }
    }
}
