//! Configuration types for the OB engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, and [`EngineConfig`],
//! the validated snapshot the engine calculates against.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AbsenceKind, HolidayTier, ObRule, ObTier, PayRate, Person, PersonId, RotationPattern,
    ShiftCode, ShiftType, TaxBracket,
};

fn default_overtime_rate() -> PayRate {
    PayRate::Divisor {
        divisor: Decimal::new(72, 0),
    }
}

fn default_overtime_hours() -> Decimal {
    Decimal::new(85, 1)
}

/// Overtime pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeSettings {
    /// Rate per overtime hour.
    #[serde(default = "default_overtime_rate")]
    pub rate: PayRate,
    /// Hours used when a record carries none.
    #[serde(default = "default_overtime_hours")]
    pub default_hours: Decimal,
}

impl Default for OvertimeSettings {
    fn default() -> Self {
        Self {
            rate: default_overtime_rate(),
            default_hours: default_overtime_hours(),
        }
    }
}

fn default_first_sick_day_percent() -> Decimal {
    Decimal::new(100, 0)
}

fn default_sick_percent() -> Decimal {
    Decimal::new(20, 0)
}

fn default_new_period_gap_days() -> i64 {
    5
}

/// Absence deduction settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceSettings {
    /// Deduction for the first sick day of a period (karensdag).
    #[serde(default = "default_first_sick_day_percent")]
    pub first_sick_day_percent: Decimal,
    /// Deduction for later sick days of the same period.
    #[serde(default = "default_sick_percent")]
    pub sick_percent: Decimal,
    /// Days without sickness that end a sick period.
    #[serde(default = "default_new_period_gap_days")]
    pub new_period_gap_days: i64,
}

impl Default for AbsenceSettings {
    fn default() -> Self {
        Self {
            first_sick_day_percent: default_first_sick_day_percent(),
            sick_percent: default_sick_percent(),
            new_period_gap_days: default_new_period_gap_days(),
        }
    }
}

fn default_year_start_month() -> u32 {
    4
}

fn default_vacation_days() -> u32 {
    25
}

fn default_fixed_percent() -> Decimal {
    Decimal::new(8, 1)
}

fn default_variable_percent() -> Decimal {
    Decimal::new(5, 1)
}

fn default_payout_percent() -> Decimal {
    Decimal::new(46, 1)
}

fn default_max_saved_days() -> u32 {
    5
}

fn default_saved_days_valid_years() -> i32 {
    5
}

/// Vacation year, entitlement and vacation pay settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationSettings {
    /// Month the vacation year starts in.
    #[serde(default = "default_year_start_month")]
    pub year_start_month: u32,
    /// Days earned over a full earning year.
    #[serde(default = "default_vacation_days")]
    pub days_per_year: u32,
    /// Supplement per vacation day, in percent of the monthly wage.
    #[serde(default = "default_fixed_percent")]
    pub fixed_percent: Decimal,
    /// Supplement per vacation day, in percent of the earning year's
    /// variable pay.
    #[serde(default = "default_variable_percent")]
    pub variable_percent: Decimal,
    /// Payout per unused day on top of the supplement, in percent of the
    /// monthly wage.
    #[serde(default = "default_payout_percent")]
    pub payout_percent: Decimal,
    /// Unused days that may be saved when a vacation year closes.
    #[serde(default = "default_max_saved_days")]
    pub max_saved_days: u32,
    /// Years a saved day stays usable.
    #[serde(default = "default_saved_days_valid_years")]
    pub saved_days_valid_years: i32,
}

impl Default for VacationSettings {
    fn default() -> Self {
        Self {
            year_start_month: default_year_start_month(),
            days_per_year: default_vacation_days(),
            fixed_percent: default_fixed_percent(),
            variable_percent: default_variable_percent(),
            payout_percent: default_payout_percent(),
            max_saved_days: default_max_saved_days(),
            saved_days_valid_years: default_saved_days_valid_years(),
        }
    }
}

/// Contents of `settings.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// First date of the rotation; its ISO week is every person's offset week.
    pub rotation_start_date: NaiveDate,
    /// Hours per month used to derive the hourly wage.
    pub standard_monthly_hours: Decimal,
    /// Overtime pricing.
    #[serde(default)]
    pub overtime: OvertimeSettings,
    /// Absence deductions.
    #[serde(default)]
    pub absence: AbsenceSettings,
    /// Vacation balance and vacation pay.
    #[serde(default)]
    pub vacation: VacationSettings,
}

/// Contents of `shift_types.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ShiftTypesFile {
    /// Every defined shift type.
    pub shift_types: Vec<ShiftType>,
}

/// Contents of `rotation.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RotationFile {
    /// Week key ("1".."10") to seven day codes, Monday first.
    pub weeks: BTreeMap<String, Vec<ShiftCode>>,
}

/// Contents of `ob_rules.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObRulesConfig {
    /// Priority tiers.
    pub tiers: Vec<ObTier>,
    /// Weekday/date rules.
    pub rules: Vec<ObRule>,
}

/// An on-call rule derived from the holiday calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedOnCallRule {
    /// Code reported in breakdowns.
    pub code: String,
    /// Label.
    pub label: String,
    /// Priority, higher wins.
    pub priority: u8,
    /// Rate for covered minutes.
    pub rate: PayRate,
}

fn default_on_call_hours() -> Decimal {
    Decimal::new(24, 0)
}

/// Contents of `on_call.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnCallConfig {
    /// Length of an on-call period when a record carries no hours.
    #[serde(default = "default_on_call_hours")]
    pub default_hours: Decimal,
    /// Weekday/date rules.
    pub rules: Vec<ObRule>,
    /// Rule for 18:00-24:00 on the eve of a holiday.
    pub holiday_eve: DerivedOnCallRule,
    /// Rule for holiday windows.
    pub holiday: DerivedOnCallRule,
    /// Rule for major-holiday windows.
    pub major_holiday: DerivedOnCallRule,
}

impl OnCallConfig {
    /// The derived rule that prices windows of `tier`.
    pub fn for_tier(&self, tier: HolidayTier) -> &DerivedOnCallRule {
        match tier {
            HolidayTier::Holiday => &self.holiday,
            HolidayTier::MajorHoliday => &self.major_holiday,
        }
    }
}

/// Contents of `tax_brackets.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxBracketsFile {
    /// Brackets in ascending order.
    pub brackets: Vec<TaxBracket>,
}

/// Contents of `persons.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonsFile {
    /// Team members.
    pub persons: Vec<Person>,
}

/// The complete, validated configuration.
///
/// Built once per load and never mutated; reloading builds a new one.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    settings: Settings,
    shift_types: BTreeMap<ShiftCode, ShiftType>,
    rotation: RotationPattern,
    ob: ObRulesConfig,
    on_call: OnCallConfig,
    tax_brackets: Vec<TaxBracket>,
    persons: BTreeMap<PersonId, Person>,
}

impl EngineConfig {
    /// Validates and assembles a configuration.
    ///
    /// Returns [`EngineError::Configuration`] on the first inconsistency
    /// found: duplicate codes or ids, undefined shift codes, undefined or
    /// unpriced priority tiers, invalid rates or tax brackets.
    pub fn new(
        settings: Settings,
        shift_types: Vec<ShiftType>,
        rotation: RotationPattern,
        ob: ObRulesConfig,
        on_call: OnCallConfig,
        tax_brackets: Vec<TaxBracket>,
        persons: Vec<Person>,
    ) -> EngineResult<Self> {
        validate_settings(&settings)?;

        let mut types = BTreeMap::new();
        for shift_type in shift_types {
            let code = shift_type.code.clone();
            if types.insert(code.clone(), shift_type).is_some() {
                return Err(EngineError::configuration(format!(
                    "shift type '{}' is defined twice",
                    code
                )));
            }
        }

        for (week, code) in rotation.cells() {
            if !types.contains_key(code) {
                return Err(EngineError::configuration(format!(
                    "rotation week {} references undefined shift code '{}'",
                    week, code
                )));
            }
        }
        for kind in AbsenceKind::all() {
            let code = kind.shift_code();
            if !types.contains_key(&code) {
                return Err(EngineError::configuration(format!(
                    "shift code '{}' for {:?} absences is not defined",
                    code, kind
                )));
            }
        }

        validate_ob(&ob)?;
        validate_on_call(&on_call)?;
        validate_tax_brackets(&tax_brackets)?;

        let mut by_id = BTreeMap::new();
        for person in persons {
            let id = person.id;
            if person.monthly_wage.is_sign_negative() {
                return Err(EngineError::configuration(format!(
                    "person {} has a negative monthly wage",
                    id
                )));
            }
            if let Some(week) = person.vacation.values().flatten().find(|w| !(1..=53).contains(*w)) {
                return Err(EngineError::configuration(format!(
                    "person {} has vacation in invalid ISO week {}",
                    id, week
                )));
            }
            if by_id.insert(id, person).is_some() {
                return Err(EngineError::configuration(format!(
                    "person {} is defined twice",
                    id
                )));
            }
        }

        Ok(Self {
            settings,
            shift_types: types,
            rotation,
            ob,
            on_call,
            tax_brackets,
            persons: by_id,
        })
    }

    /// Returns the general settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Looks up a shift type by code.
    pub fn shift_type(&self, code: &ShiftCode) -> EngineResult<&ShiftType> {
        self.shift_types.get(code).ok_or_else(|| {
            EngineError::configuration(format!("shift code '{}' is not defined", code))
        })
    }

    /// All shift types by code.
    pub fn shift_types(&self) -> &BTreeMap<ShiftCode, ShiftType> {
        &self.shift_types
    }

    /// Returns the rotation pattern.
    pub fn rotation(&self) -> &RotationPattern {
        &self.rotation
    }

    /// Returns the OB tiers and rules.
    pub fn ob(&self) -> &ObRulesConfig {
        &self.ob
    }

    /// Looks up the OB tier of a priority.
    pub fn tier(&self, priority: u8) -> EngineResult<&ObTier> {
        self.ob
            .tiers
            .iter()
            .find(|t| t.priority == priority)
            .ok_or_else(|| {
                EngineError::configuration(format!("priority tier {} is not defined", priority))
            })
    }

    /// Returns the on-call table.
    pub fn on_call(&self) -> &OnCallConfig {
        &self.on_call
    }

    /// Returns the tax brackets.
    pub fn tax_brackets(&self) -> &[TaxBracket] {
        &self.tax_brackets
    }

    /// Looks up a person by id.
    pub fn person(&self, id: PersonId) -> EngineResult<&Person> {
        self.persons
            .get(&id)
            .ok_or_else(|| EngineError::input_range(format!("unknown person {}", id)))
    }

    /// All persons ordered by id.
    pub fn persons(&self) -> impl Iterator<Item = &Person> {
        self.persons.values()
    }
}

fn validate_settings(settings: &Settings) -> EngineResult<()> {
    if settings.standard_monthly_hours <= Decimal::ZERO {
        return Err(EngineError::configuration(
            "standard_monthly_hours must be positive",
        ));
    }
    if !settings.overtime.rate.is_valid() || settings.overtime.default_hours.is_sign_negative() {
        return Err(EngineError::configuration("invalid overtime settings"));
    }
    if settings.absence.new_period_gap_days < 1 {
        return Err(EngineError::configuration(
            "absence.new_period_gap_days must be at least 1",
        ));
    }
    let vacation = &settings.vacation;
    if !(1..=12).contains(&vacation.year_start_month) {
        return Err(EngineError::configuration(
            "vacation.year_start_month must be within 1..=12",
        ));
    }
    let percents = [
        vacation.fixed_percent,
        vacation.variable_percent,
        vacation.payout_percent,
    ];
    if percents.iter().any(Decimal::is_sign_negative) || vacation.saved_days_valid_years < 0 {
        return Err(EngineError::configuration("invalid vacation settings"));
    }
    Ok(())
}

fn validate_ob(ob: &ObRulesConfig) -> EngineResult<()> {
    let mut priorities = BTreeSet::new();
    for tier in &ob.tiers {
        if !priorities.insert(tier.priority) {
            return Err(EngineError::configuration(format!(
                "priority tier {} is defined twice",
                tier.priority
            )));
        }
        if tier.rate.is_some_and(|r| !r.is_valid()) {
            return Err(EngineError::configuration(format!(
                "tier '{}' has an invalid rate",
                tier.code
            )));
        }
    }
    for tier in [HolidayTier::Holiday, HolidayTier::MajorHoliday] {
        let priority = tier.priority();
        let priced = ob
            .tiers
            .iter()
            .any(|t| t.priority == priority && t.rate.is_some());
        if !priced {
            return Err(EngineError::configuration(format!(
                "priority tier {} must be defined with a rate for {:?} windows",
                priority, tier
            )));
        }
    }
    for rule in &ob.rules {
        validate_rule(rule)?;
        if !priorities.contains(&rule.priority) {
            return Err(EngineError::configuration(format!(
                "rule '{}' uses undefined priority tier {}",
                rule.code, rule.priority
            )));
        }
    }
    Ok(())
}

fn validate_rule(rule: &ObRule) -> EngineResult<()> {
    if rule.days.iter().any(|d| *d > 6) {
        return Err(EngineError::configuration(format!(
            "rule '{}' has a weekday outside 0..=6",
            rule.code
        )));
    }
    if !rule.rate.is_valid() {
        return Err(EngineError::configuration(format!(
            "rule '{}' has an invalid rate",
            rule.code
        )));
    }
    Ok(())
}

fn validate_on_call(on_call: &OnCallConfig) -> EngineResult<()> {
    if on_call.default_hours <= Decimal::ZERO || on_call.default_hours > Decimal::new(48, 0) {
        return Err(EngineError::configuration(
            "on_call.default_hours must be within (0, 48]",
        ));
    }
    for rule in &on_call.rules {
        validate_rule(rule)?;
    }
    for derived in [&on_call.holiday_eve, &on_call.holiday, &on_call.major_holiday] {
        if !derived.rate.is_valid() {
            return Err(EngineError::configuration(format!(
                "on-call rule '{}' has an invalid rate",
                derived.code
            )));
        }
    }
    Ok(())
}

fn validate_tax_brackets(brackets: &[TaxBracket]) -> EngineResult<()> {
    let Some(last) = brackets.last() else {
        return Err(EngineError::configuration("at least one tax bracket is required"));
    };
    if last.up_to.is_some() {
        return Err(EngineError::configuration(
            "the last tax bracket must have no upper bound",
        ));
    }
    let mut previous: Option<Decimal> = None;
    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.rate.is_sign_negative() || bracket.rate > Decimal::ONE {
            return Err(EngineError::configuration(format!(
                "tax rate {} is outside 0..=1",
                bracket.rate
            )));
        }
        match bracket.up_to {
            None if index + 1 != brackets.len() => {
                return Err(EngineError::configuration(
                    "only the last tax bracket may be open-ended",
                ));
            }
            Some(up_to) if previous.is_some_and(|p| up_to <= p) => {
                return Err(EngineError::configuration(
                    "tax brackets must be in ascending order",
                ));
            }
            Some(up_to) => previous = Some(up_to),
            None => {}
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! A small in-code configuration shared by unit tests.

    use super::*;
    use crate::models::{RotationWeek, ShiftKind};
    use std::str::FromStr;

    pub fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    pub fn shift_type(code: &str, start: &str, end: &str, kind: ShiftKind) -> ShiftType {
        ShiftType {
            code: ShiftCode::from(code),
            label: code.to_string(),
            start: start.parse().unwrap(),
            end: end.parse().unwrap(),
            kind,
        }
    }

    pub fn shift_types() -> Vec<ShiftType> {
        vec![
            shift_type("N1", "06:00", "14:30", ShiftKind::Work),
            shift_type("N2", "14:00", "22:30", ShiftKind::Work),
            shift_type("N3", "22:00", "06:30", ShiftKind::Work),
            shift_type("OFF", "00:00", "00:00", ShiftKind::Off),
            shift_type("SEM", "00:00", "00:00", ShiftKind::Vacation),
            shift_type("SICK", "00:00", "00:00", ShiftKind::Absence),
            shift_type("VAB", "00:00", "00:00", ShiftKind::Absence),
            shift_type("LEAVE", "00:00", "00:00", ShiftKind::Absence),
            shift_type("OC", "00:00", "00:00", ShiftKind::OnCall),
        ]
    }

    /// Week n works N1 Mon-Fri for odd n, N3 Mon-Fri for even n; weekends are
    /// N2 in week 1 and OC in week 2, otherwise off.
    pub fn rotation() -> RotationPattern {
        let mut weeks = BTreeMap::new();
        for week in 1..=10u8 {
            let weekday = if week % 2 == 1 { "N1" } else { "N3" };
            let weekend = match week {
                1 => "N2",
                2 => "OC",
                _ => "OFF",
            };
            let mut days = vec![ShiftCode::from(weekday); 5];
            days.extend([ShiftCode::from(weekend), ShiftCode::from(weekend)]);
            weeks.insert(week.to_string(), days);
        }
        RotationPattern::from_keyed(&weeks).unwrap()
    }

    pub fn divisor(d: &str) -> PayRate {
        PayRate::Divisor { divisor: dec(d) }
    }

    pub fn flat(amount: &str) -> PayRate {
        PayRate::FlatPerHour {
            amount: dec(amount),
        }
    }

    pub fn rule(code: &str, priority: u8, days: &[u8], start: &str, end: &str, rate: PayRate) -> ObRule {
        ObRule {
            code: code.to_string(),
            label: code.to_string(),
            priority,
            days: days.iter().copied().collect(),
            dates: BTreeSet::new(),
            start: start.parse().unwrap(),
            end: end.parse().unwrap(),
            rate,
        }
    }

    pub fn tier(priority: u8, code: &str, rate: Option<PayRate>) -> ObTier {
        ObTier {
            priority,
            code: code.to_string(),
            label: code.to_string(),
            rate,
        }
    }

    pub fn ob() -> ObRulesConfig {
        ObRulesConfig {
            tiers: vec![
                tier(1, "OB1", None),
                tier(2, "OB2", None),
                tier(3, "OB3", None),
                tier(4, "OB4", Some(divisor("300"))),
                tier(5, "OB5", Some(divisor("150"))),
            ],
            rules: vec![
                rule("OB1", 1, &[0, 1, 2, 3, 4], "18:00", "24:00", divisor("600")),
                rule("OB2", 2, &[0, 1, 2, 3, 4], "00:00", "07:00", divisor("400")),
                rule("OB3", 3, &[5, 6], "00:00", "24:00", divisor("300")),
            ],
        }
    }

    pub fn derived(code: &str, priority: u8, amount: &str) -> DerivedOnCallRule {
        DerivedOnCallRule {
            code: code.to_string(),
            label: code.to_string(),
            priority,
            rate: flat(amount),
        }
    }

    pub fn on_call() -> OnCallConfig {
        OnCallConfig {
            default_hours: dec("24"),
            rules: vec![
                rule("OC_WEEKDAY", 1, &[0, 1, 2, 3, 4], "00:00", "24:00", flat("75")),
                rule("OC_WEEKEND", 2, &[5, 6], "00:00", "24:00", flat("97")),
            ],
            holiday_eve: derived("OC_HOLIDAY_EVE", 3, "97"),
            holiday: derived("OC_HOLIDAY", 4, "112"),
            major_holiday: derived("OC_SPECIAL", 5, "192"),
        }
    }

    pub fn tax_brackets() -> Vec<TaxBracket> {
        vec![
            TaxBracket {
                up_to: Some(dec("20000")),
                rate: dec("0.20"),
            },
            TaxBracket {
                up_to: Some(dec("50000")),
                rate: dec("0.30"),
            },
            TaxBracket {
                up_to: None,
                rate: dec("0.40"),
            },
        ]
    }

    pub fn person(id: u32, wage: &str, offset: u8) -> Person {
        Person {
            id: PersonId(id),
            name: format!("Person {}", id),
            monthly_wage: dec(wage),
            cycle_offset: RotationWeek::new(offset).unwrap(),
            vacation: BTreeMap::new(),
            employment_start: None,
            vacation_saved: BTreeMap::new(),
        }
    }

    /// Rotation starts Monday 2026-01-05 (ISO week 2).
    pub fn settings() -> Settings {
        Settings {
            rotation_start_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            standard_monthly_hours: dec("160"),
            overtime: OvertimeSettings::default(),
            absence: AbsenceSettings::default(),
            vacation: VacationSettings::default(),
        }
    }

    pub fn config_with(persons: Vec<Person>) -> EngineConfig {
        EngineConfig::new(
            settings(),
            shift_types(),
            rotation(),
            ob(),
            on_call(),
            tax_brackets(),
            persons,
        )
        .unwrap()
    }

    pub fn config() -> EngineConfig {
        config_with(vec![
            person(1, "36000", 1),
            person(2, "36000", 2),
            person(3, "36000", 1),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::models::ShiftKind;

    #[test]
    fn test_fixture_config_is_valid() {
        let config = config();
        assert_eq!(config.persons().count(), 3);
        assert_eq!(config.tier(2).unwrap().code, "OB2");
        assert_eq!(
            config
                .shift_type(&ShiftCode::from("N3"))
                .unwrap()
                .hours(),
            dec("8.5")
        );
    }

    #[test]
    fn test_undefined_rotation_code_is_rejected() {
        let types: Vec<_> = shift_types()
            .into_iter()
            .filter(|t| t.code.as_str() != "N3")
            .collect();
        let result = EngineConfig::new(
            settings(),
            types,
            rotation(),
            ob(),
            on_call(),
            tax_brackets(),
            vec![],
        );
        match result {
            Err(EngineError::Configuration { message }) => {
                assert!(message.contains("'N3'"), "unexpected message: {}", message);
            }
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_absence_code_is_rejected() {
        let types: Vec<_> = shift_types()
            .into_iter()
            .filter(|t| t.code.as_str() != "VAB")
            .collect();
        let result = EngineConfig::new(
            settings(),
            types,
            rotation(),
            ob(),
            on_call(),
            tax_brackets(),
            vec![],
        );
        assert!(matches!(result, Err(EngineError::Configuration { .. })));
    }

    #[test]
    fn test_duplicate_shift_type_is_rejected() {
        let mut types = shift_types();
        types.push(shift_type("N1", "07:00", "15:00", ShiftKind::Work));
        let result = EngineConfig::new(
            settings(),
            types,
            rotation(),
            ob(),
            on_call(),
            tax_brackets(),
            vec![],
        );
        assert!(matches!(result, Err(EngineError::Configuration { .. })));
    }

    #[test]
    fn test_rule_with_undefined_tier_is_rejected() {
        let mut ob = ob();
        ob.rules
            .push(rule("EXTRA", 7, &[2], "20:00", "22:00", divisor("100")));
        let result = EngineConfig::new(
            settings(),
            shift_types(),
            rotation(),
            ob,
            on_call(),
            tax_brackets(),
            vec![],
        );
        match result {
            Err(EngineError::Configuration { message }) => {
                assert!(message.contains("undefined priority tier 7"));
            }
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_unpriced_holiday_tier_is_rejected() {
        let mut ob = ob();
        ob.tiers.retain(|t| t.priority != 5);
        let result = EngineConfig::new(
            settings(),
            shift_types(),
            rotation(),
            ob,
            on_call(),
            tax_brackets(),
            vec![],
        );
        assert!(matches!(result, Err(EngineError::Configuration { .. })));
    }

    #[test]
    fn test_tax_brackets_must_end_open() {
        let mut brackets = tax_brackets();
        brackets.pop();
        assert!(validate_tax_brackets(&brackets).is_err());
        assert!(validate_tax_brackets(&[]).is_err());
        assert!(validate_tax_brackets(&tax_brackets()).is_ok());
    }

    #[test]
    fn test_tax_brackets_must_ascend() {
        let mut brackets = tax_brackets();
        brackets.swap(0, 1);
        assert!(validate_tax_brackets(&brackets).is_err());
    }

    #[test]
    fn test_duplicate_person_is_rejected() {
        let result = EngineConfig::new(
            settings(),
            shift_types(),
            rotation(),
            ob(),
            on_call(),
            tax_brackets(),
            vec![person(1, "30000", 1), person(1, "31000", 2)],
        );
        assert!(matches!(result, Err(EngineError::Configuration { .. })));
    }

    #[test]
    fn test_unknown_person_is_input_error() {
        assert!(matches!(
            config().person(PersonId(99)),
            Err(EngineError::InputRange { .. })
        ));
    }

    #[test]
    fn test_settings_defaults() {
        let yaml = "rotation_start_date: 2026-01-05\nstandard_monthly_hours: 165\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            settings.overtime.rate,
            PayRate::Divisor {
                divisor: dec("72")
            }
        );
        assert_eq!(settings.overtime.default_hours, dec("8.5"));
        assert_eq!(settings.absence.new_period_gap_days, 5);
    }
}
