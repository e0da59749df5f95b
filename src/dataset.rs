// Consumption group presets and the merge that turns per-group samples into
// the final, chronologically ordered transaction table.
use std::fmt;
use chrono::{NaiveDate, NaiveDateTime};
use rand::Rng;
use serde::Serialize;
use crate::generator::{generate_data, GenerationError, GroupParams, Label, Sample};

/// Column order of the exported table.
pub const COLUMNS: [&str; 5] = ["TranID", "CardID", "Time", "Amount", "Label"];

const UNIFORM_FRAUD_LAMBDA: [f64; 4] = [0.25, 0.25, 0.25, 0.25];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumptionGroup {
    Low,
    Medium,
    High,
}

impl ConsumptionGroup {
    pub const ALL: [ConsumptionGroup; 3] = [
        ConsumptionGroup::Low,
        ConsumptionGroup::Medium,
        ConsumptionGroup::High,
    ];

    pub fn params(self) -> GroupParams {
        match self {
            ConsumptionGroup::Low => GroupParams {
                mean_genuine: 1170.0,
                var_genuine: 234.0,
                mean_fraudulent: 1110.0,
                var_fraudulent: 220.0,
                rate_normal_fraud: 0.1,
                lambda_g: [0.6, 0.2, 0.15, 0.05],
                lambda_f: UNIFORM_FRAUD_LAMBDA,
                n: 5000,
                card_id_range: (1, 100),
            },
            ConsumptionGroup::Medium => GroupParams {
                mean_genuine: 5000.0,
                var_genuine: 1200.0,
                mean_fraudulent: 6000.0,
                var_fraudulent: 1000.0,
                rate_normal_fraud: 0.1,
                lambda_g: [0.05, 0.4, 0.5, 0.05],
                lambda_f: UNIFORM_FRAUD_LAMBDA,
                n: 3000,
                card_id_range: (1, 151),
            },
            ConsumptionGroup::High => GroupParams {
                mean_genuine: 10000.0,
                var_genuine: 2000.0,
                mean_fraudulent: 11200.0,
                var_fraudulent: 2240.0,
                rate_normal_fraud: 0.1,
                lambda_g: [0.05, 0.15, 0.2, 0.6],
                lambda_f: UNIFORM_FRAUD_LAMBDA,
                n: 7000,
                card_id_range: (1, 201),
            },
        }
    }
}

impl fmt::Display for ConsumptionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConsumptionGroup::Low => "Low",
            ConsumptionGroup::Medium => "Medium",
            ConsumptionGroup::High => "High",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    #[serde(rename = "TranID")]
    pub tran_id: usize,
    #[serde(rename = "CardID")]
    pub card_id: u32,
    #[serde(rename = "Time")]
    pub time: NaiveDate,
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "Label")]
    pub label: Label,
}

/// Runs the generator once per group, in `ConsumptionGroup::ALL` order.
pub fn generate_all<R: Rng + ?Sized>(
    rng: &mut R,
    now: NaiveDateTime,
) -> Result<Vec<(ConsumptionGroup, Vec<Sample>)>, GenerationError> {
    ConsumptionGroup::ALL
        .iter()
        .map(|&group| {
            let samples = generate_data(&group.params(), rng, now)?;
            tracing::debug!(%group, rows = samples.len(), "generated group");
            Ok((group, samples))
        })
        .collect()
}

// Concatenates groups in the order given, sorts by date (stable, so equal
// dates keep concatenation order) and numbers rows from 1.
pub fn combine_groups(groups: Vec<Vec<Sample>>) -> Vec<Transaction> {
    let mut combined: Vec<Sample> = groups.into_iter().flatten().collect();
    combined.sort_by_key(|sample| sample.time);

    combined
        .into_iter()
        .enumerate()
        .map(|(i, sample)| Transaction {
            tran_id: i + 1,
            card_id: sample.card_id,
            time: sample.time,
            amount: sample.amount,
            label: sample.label,
        })
        .collect()
}
