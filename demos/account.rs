//! Bank-account eligibility rules compiled once and evaluated against a
//! sample account.
//!
//! Run with `RUST_LOG=predicata=debug cargo run --example account` to see the
//! cache miss on the first compile and the hit on the second.

use std::error::Error;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use predicata::{Condition, Operator, Record, RuleCompiler, RuleEnum, Schema};
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy)]
enum AccountType {
    Savings,
    Checking,
}

impl RuleEnum for AccountType {
    const TYPE_NAME: &'static str = "AccountType";
    const MEMBERS: &'static [&'static str] = &["Savings", "Checking"];

    fn member_name(self) -> &'static str {
        Self::MEMBERS[self as usize]
    }
}

#[derive(Debug)]
struct Account {
    balance: Decimal,
    creation_date: NaiveDateTime,
    is_active: bool,
    account_type: AccountType,
    transaction_count: i32,
    credit_score: i32,
    last_transaction_amount: Decimal,
    account_age_in_years: i32,
    number_of_overdrafts: i32,
    average_monthly_deposit: Decimal,
}

impl Record for Account {
    fn schema() -> Schema<Self> {
        Schema::builder("Account")
            .field("Balance", |a: &Account| a.balance)
            .field("CreationDate", |a: &Account| a.creation_date)
            .field("IsActive", |a: &Account| a.is_active)
            .enum_field("AccountType", |a: &Account| a.account_type)
            .field("TransactionCount", |a: &Account| a.transaction_count)
            .field("CreditScore", |a: &Account| a.credit_score)
            .field("LastTransactionAmount", |a: &Account| a.last_transaction_amount)
            .field("AccountAgeInYears", |a: &Account| a.account_age_in_years)
            .field("NumberOfOverdrafts", |a: &Account| a.number_of_overdrafts)
            .field("AverageMonthlyDeposit", |a: &Account| a.average_monthly_deposit)
            .build()
    }
}

fn rules() -> Vec<Condition> {
    vec![
        Condition::new("Balance", Operator::GreaterThan).value("100").data_type("decimal").and(),
        Condition::new("Balance", Operator::LessThan).value("10000").data_type("decimal").and(),
        Condition::new("IsActive", Operator::Equals).value("True").data_type("bool").and(),
        Condition::new("AccountType", Operator::In)
            .values(["Savings", "Checking"])
            .data_type("AccountType")
            .and(),
        Condition::new("TransactionCount", Operator::GreaterThanOrEqualTo).value("5").data_type("int").and(),
        Condition::new("CreditScore", Operator::GreaterThanOrEqualTo).value("700").data_type("decimal").and(),
        Condition::new("LastTransactionAmount", Operator::LessThanOrEqualTo)
            .value("5000")
            .data_type("decimal")
            .and(),
        Condition::new("AccountAgeInYears", Operator::GreaterThanOrEqualTo).value("1").data_type("int").and(),
        Condition::new("NumberOfOverdrafts", Operator::LessThanOrEqualTo).value("3").data_type("int").and(),
        Condition::between("AverageMonthlyDeposit", "500", "3000").data_type("decimal").and(),
        Condition::new("CreationDate", Operator::GreaterThan).value("2010-01-01").data_type("DateTime").and(),
        Condition::new("TransactionCount", Operator::LessThanOrEqualTo).value("100").data_type("int").and(),
        Condition::new("AccountAgeInYears", Operator::GreaterThanOrEqualTo).value("3").data_type("int").and(),
        Condition::new("Balance", Operator::LessThan)
            .value("1000")
            .data_type("decimal")
            .and()
            .with(Condition::new("CreditScore", Operator::LessThan).value("600")),
        // Deposits over the last six months.
        Condition::new("AverageMonthlyDeposit", Operator::GreaterThan)
            .id(1)
            .value("1000")
            .data_type("decimal")
            .with(
                Condition::new("CreationDate", Operator::Equals)
                    .parent(1)
                    .min("5/28/2023")
                    .max("11/28/2023")
                    .data_type("DateTime"),
            ),
    ]
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let account = Account {
        balance: Decimal::from(950),
        creation_date: NaiveDate::from_ymd_opt(2011, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or("invalid creation date")?,
        is_active: true,
        account_type: AccountType::Savings,
        transaction_count: 50,
        credit_score: 700,
        last_transaction_amount: Decimal::from(500),
        account_age_in_years: 3,
        number_of_overdrafts: 0,
        average_monthly_deposit: Decimal::from(1500),
    };

    let compiler = RuleCompiler::new();
    let rules = rules();

    let predicate = compiler.compile::<Account>(&rules)?;
    info!(
        comparisons = predicate.comparisons(),
        "compiled eligibility rules for {}",
        predicate.record_name()
    );
    println!("Rule: {predicate}");
    println!("Rule evaluation result: {}", predicate.evaluate(&account));

    let again = compiler.compile::<Account>(&rules)?;
    let stats = compiler.stats();
    println!(
        "Second compile reused the cached predicate: {} (hits {}, misses {})",
        Arc::ptr_eq(&predicate, &again),
        stats.hits,
        stats.misses
    );

    let bad = [Condition::new("NotAField", Operator::Equals).value("1")];
    if let Err(e) = compiler.compile::<Account>(&bad) {
        println!("Rejected rule set: {e}");
    }

    Ok(())
}
