use std::fmt;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;
use thiserror::Error;

/// Width of the look-back window every synthetic timestamp falls into.
pub const WINDOW_DAYS: f64 = 30.0;
const MICROS_PER_DAY: f64 = 86_400_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Label {
    Genuine,
    Fraud,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Genuine => f.write_str("Genuine"),
            Label::Fraud => f.write_str("Fraud"),
        }
    }
}

/// Statistical parameters for one consumption group.
///
/// `var_*` are variances; the generator takes their square root before
/// sampling. `lambda_*` are relative weights for four time buckets and do not
/// need to sum to one.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupParams {
    pub mean_genuine: f64,
    pub var_genuine: f64,
    pub mean_fraudulent: f64,
    pub var_fraudulent: f64,
    pub rate_normal_fraud: f64,
    pub lambda_g: [f64; 4],
    pub lambda_f: [f64; 4],
    pub n: usize,
    pub card_id_range: (u32, u32),
}

/// One generated row, before the merge assigns it a transaction id.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub amount: f64,
    pub label: Label,
    pub time: NaiveDate,
    pub card_id: u32,
}

#[derive(Debug, Error, PartialEq)]
pub enum GenerationError {
    #[error("{label} bucket weights sum to zero")]
    ZeroLambdaSum { label: Label },
    #[error("{label} variance {variance} is not a valid normal variance")]
    BadVariance { label: Label, variance: f64 },
    #[error("card id range {low}..={high} is empty")]
    EmptyCardRange { low: u32, high: u32 },
}

// Fraud takes whatever the truncated genuine count leaves over.
pub fn split_counts(n: usize, rate_normal_fraud: f64) -> (usize, usize) {
    let n_genuine = (n as f64 * (1.0 - rate_normal_fraud)) as usize;
    let n_genuine = n_genuine.min(n);
    (n_genuine, n - n_genuine)
}

/// How many timestamps each of the four buckets contributes to a segment of
/// `segment_n` rows. Truncation can leave the total short of `segment_n`.
pub fn bucket_counts(
    segment_n: usize,
    lambda: &[f64; 4],
    label: Label,
) -> Result<[usize; 4], GenerationError> {
    let total: f64 = lambda.iter().sum();
    if total == 0.0 {
        return Err(GenerationError::ZeroLambdaSum { label });
    }

    let mut counts = [0usize; 4];
    for (count, &lam) in counts.iter_mut().zip(lambda) {
        *count = (segment_n as f64 * lam / total) as usize;
    }
    Ok(counts)
}

fn random_past_date<R: Rng + ?Sized>(rng: &mut R, now: NaiveDateTime) -> NaiveDate {
    let days = rng.gen_range(0.0..WINDOW_DAYS);
    let offset = TimeDelta::microseconds((days * MICROS_PER_DAY).round() as i64);
    (now - offset).date()
}

// Buckets only decide how many draws happen; every draw uses the same
// 30-day window. Rows missing after truncation are padded with unbiased draws.
pub fn sample_times<R: Rng + ?Sized>(
    rng: &mut R,
    now: NaiveDateTime,
    segment_n: usize,
    lambda: &[f64; 4],
    label: Label,
) -> Result<Vec<NaiveDate>, GenerationError> {
    let mut times = Vec::with_capacity(segment_n);
    for count in bucket_counts(segment_n, lambda, label)? {
        times.extend((0..count).map(|_| random_past_date(rng, now)));
    }

    if times.len() < segment_n {
        let missing = segment_n - times.len();
        times.extend((0..missing).map(|_| random_past_date(rng, now)));
    }
    times.truncate(segment_n);
    Ok(times)
}

pub fn sample_amounts<R: Rng + ?Sized>(rng: &mut R, normal: &Normal<f64>, count: usize) -> Vec<f64> {
    (0..count)
        .map(|_| normal.sample(rng).round_ties_even())
        .collect()
}

fn amount_distribution(mean: f64, variance: f64, label: Label) -> Result<Normal<f64>, GenerationError> {
    Normal::new(mean, variance.sqrt())
        .map_err(|_| GenerationError::BadVariance { label, variance })
}

// Generates one group's rows: every genuine row first, then every fraud row.
// Inputs: group parameters, the random source, and the reference instant
// Outputs: exactly `params.n` samples
// Key steps:
// 1. Split N into genuine and fraud counts
// 2. Draw amounts and bucketed timestamps per segment
// 3. Draw card ids uniformly from the inclusive pool
pub fn generate_data<R: Rng + ?Sized>(
    params: &GroupParams,
    rng: &mut R,
    now: NaiveDateTime,
) -> Result<Vec<Sample>, GenerationError> {
    let (low, high) = params.card_id_range;
    if low > high {
        return Err(GenerationError::EmptyCardRange { low, high });
    }
    let genuine_normal = amount_distribution(params.mean_genuine, params.var_genuine, Label::Genuine)?;
    let fraud_normal = amount_distribution(params.mean_fraudulent, params.var_fraudulent, Label::Fraud)?;

    let (n_genuine, n_fraud) = split_counts(params.n, params.rate_normal_fraud);

    let genuine_amounts = sample_amounts(rng, &genuine_normal, n_genuine);
    let genuine_times = sample_times(rng, now, n_genuine, &params.lambda_g, Label::Genuine)?;
    let fraud_amounts = sample_amounts(rng, &fraud_normal, n_fraud);
    let fraud_times = sample_times(rng, now, n_fraud, &params.lambda_f, Label::Fraud)?;

    let card_ids: Vec<u32> = (0..params.n).map(|_| rng.gen_range(low..=high)).collect();

    let genuine = genuine_amounts
        .into_iter()
        .zip(genuine_times)
        .map(|(amount, time)| (amount, Label::Genuine, time));
    let fraud = fraud_amounts
        .into_iter()
        .zip(fraud_times)
        .map(|(amount, time)| (amount, Label::Fraud, time));

    let samples = genuine
        .chain(fraud)
        .zip(card_ids)
        .map(|((amount, label, time), card_id)| Sample {
            amount,
            label,
            time,
            card_id,
        })
        .collect();

    Ok(samples)
}
