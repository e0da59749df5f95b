use std::collections::HashSet;
use ndarray::Array1;
use crate::dataset::{ConsumptionGroup, Transaction};
use crate::generator::{Label, Sample};

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
}

impl SegmentStats {
    // Population statistics of the realized amounts
    fn from_amounts(amounts: Vec<f64>) -> Self {
        let count = amounts.len();
        if count == 0 {
            return SegmentStats { count, mean: None, std_dev: None };
        }
        let amounts = Array1::from_vec(amounts);
        SegmentStats {
            count,
            mean: amounts.mean(),
            std_dev: Some(amounts.std(0.0)),
        }
    }
}

pub struct GroupSummary {
    pub group: ConsumptionGroup,
    pub size: usize,
    pub unique_cards: usize,
    pub genuine: SegmentStats,
    pub fraud: SegmentStats,
}

// Holds totals across the merged table
pub struct DatasetMetrics {
    pub total_transactions: usize,
    pub total_fraud: usize,
    pub fraud_rate: f64,
}

fn amounts_for(samples: &[Sample], label: Label) -> Vec<f64> {
    samples.iter()
        .filter(|s| s.label == label)
        .map(|s| s.amount)
        .collect()
}

pub fn summarize(group: ConsumptionGroup, samples: &[Sample]) -> GroupSummary {
    GroupSummary {
        group,
        size: samples.len(),
        unique_cards: samples.iter().map(|s| s.card_id).collect::<HashSet<_>>().len(),
        genuine: SegmentStats::from_amounts(amounts_for(samples, Label::Genuine)),
        fraud: SegmentStats::from_amounts(amounts_for(samples, Label::Fraud)),
    }
}

pub fn calculate_metrics(transactions: &[Transaction]) -> DatasetMetrics {
    let total_transactions = transactions.len();
    let total_fraud = transactions.iter().filter(|t| t.label == Label::Fraud).count();
    let fraud_rate = if total_transactions > 0 {
        total_fraud as f64 / total_transactions as f64
    } else {
        0.0
    };

    DatasetMetrics {
        total_transactions,
        total_fraud,
        fraud_rate,
    }
}

pub fn log_summary(summary: &GroupSummary) {
    tracing::info!(
        group = %summary.group,
        size = summary.size,
        unique_cards = summary.unique_cards,
        genuine = summary.genuine.count,
        genuine_mean = ?summary.genuine.mean,
        genuine_std = ?summary.genuine.std_dev,
        fraud = summary.fraud.count,
        fraud_mean = ?summary.fraud.mean,
        fraud_std = ?summary.fraud.std_dev,
        "group summary"
    );
}
