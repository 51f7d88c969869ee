use crate::common::format_float;
use crate::error::{ExprError, ExprResult};
use crate::error_consts;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A `[floor, ceil)` range holding `count` events, assumed uniformly spread.
#[derive(Debug, Clone, Copy)]
pub struct Bucket {
    floor: f64,
    ceil: f64,
    count: f64,
}

impl Bucket {
    pub fn new(floor: f64, ceil: f64, count: f64) -> ExprResult<Bucket> {
        if !floor.is_finite() || !ceil.is_finite() || !count.is_finite() {
            return Err(ExprError::InvalidHistogram(error_consts::NON_FINITE_BUCKET));
        }
        if floor > ceil {
            return Err(ExprError::InvalidHistogram(error_consts::NEGATIVE_RANGE));
        }
        // fold -0.0 into 0.0 so boundaries compare and dedupe consistently
        Ok(Bucket {
            floor: floor + 0.0,
            ceil: ceil + 0.0,
            count,
        })
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    pub fn ceil(&self) -> f64 {
        self.ceil
    }

    pub fn count(&self) -> f64 {
        self.count
    }

    pub fn width(&self) -> f64 {
        self.ceil - self.floor
    }

    pub fn mid_point(&self) -> f64 {
        self.floor / 2.0 + self.ceil / 2.0
    }

    fn with_count(&self, count: f64) -> ExprResult<Bucket> {
        Bucket::new(self.floor, self.ceil, count)
    }

    fn total_cmp(&self, other: &Bucket) -> Ordering {
        self.floor
            .total_cmp(&other.floor)
            .then_with(|| self.ceil.total_cmp(&other.ceil))
            .then_with(|| self.count.total_cmp(&other.count))
    }
}

/// Ordered, non-overlapping buckets. Construction splits intersecting ranges at
/// their boundaries, sums identical ranges, drops empty buckets and merges
/// neighbours of equal density, so two histograms describing the same
/// distribution compare equal.
#[derive(Debug, Clone, Default)]
pub struct Histogram {
    buckets: Vec<Bucket>,
}

impl Histogram {
    pub fn new<I: IntoIterator<Item = Bucket>>(items: I) -> ExprResult<Histogram> {
        let buckets = normalize(items.into_iter().collect());
        let mut signs = buckets.iter().map(|b| b.count > 0.0);
        if let Some(first) = signs.next() {
            if signs.any(|positive| positive != first) {
                return Err(ExprError::InvalidHistogram(error_consts::MIXED_SIGN));
            }
        }
        Ok(Histogram { buckets })
    }

    /// Convenience constructor from `(floor, ceil, count)` triples.
    pub fn from_ranges(ranges: &[(f64, f64, f64)]) -> ExprResult<Histogram> {
        let buckets = ranges
            .iter()
            .map(|&(floor, ceil, count)| Bucket::new(floor, ceil, count))
            .collect::<ExprResult<Vec<_>>>()?;
        Histogram::new(buckets)
    }

    pub fn empty() -> Histogram {
        Histogram::default()
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn event_count(&self) -> f64 {
        self.buckets.iter().map(|b| b.count).sum()
    }

    pub fn min(&self) -> Option<f64> {
        self.buckets.first().map(|b| b.floor)
    }

    pub fn max(&self) -> Option<f64> {
        self.buckets.last().map(|b| b.ceil)
    }

    pub fn sum(&self) -> f64 {
        self.buckets.iter().map(|b| b.mid_point() * b.count).sum()
    }

    pub fn avg(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.sum() / self.event_count())
    }

    pub fn median(&self) -> Option<f64> {
        self.percentile(50.0)
    }

    pub fn percentile(&self, percentile: f64) -> Option<f64> {
        self.get(percentile * self.event_count() / 100.0)
    }

    /// Value at the given event index, interpolating within the bucket that
    /// holds it.
    pub fn get(&self, index: f64) -> Option<f64> {
        let mut running = 0.0;
        for bucket in &self.buckets {
            let next = running + bucket.count;
            if index <= next {
                let left_fraction = if bucket.count == 0.0 {
                    0.0
                } else {
                    (index - running) / bucket.count
                };
                let right_fraction = 1.0 - left_fraction;
                return Some(bucket.ceil * left_fraction + bucket.floor * right_fraction);
            }
            running = next;
        }
        self.max()
    }

    /// Applies `f` to every bucket's count and renormalizes.
    pub fn modify_counts<F>(&self, f: F) -> ExprResult<Histogram>
    where
        F: Fn(&Bucket) -> f64,
    {
        let buckets = self
            .buckets
            .iter()
            .map(|b| b.with_count(f(b)))
            .collect::<ExprResult<Vec<_>>>()?;
        Histogram::new(buckets)
    }

    pub fn add(&self, other: &Histogram) -> ExprResult<Histogram> {
        Histogram::new(self.buckets.iter().chain(other.buckets.iter()).copied())
    }

    pub fn subtract(&self, other: &Histogram) -> ExprResult<Histogram> {
        let negated = other.buckets.iter().map(|b| Bucket {
            count: -b.count,
            ..*b
        });
        Histogram::new(self.buckets.iter().copied().chain(negated))
    }

    pub fn negate(&self) -> Histogram {
        Histogram {
            buckets: self
                .buckets
                .iter()
                .map(|b| Bucket {
                    count: -b.count,
                    ..*b
                })
                .collect(),
        }
    }

    pub fn add_scalar(&self, y: f64) -> ExprResult<Histogram> {
        self.modify_counts(|b| b.count + b.width() * y)
    }

    pub fn subtract_scalar(&self, y: f64) -> ExprResult<Histogram> {
        self.modify_counts(|b| b.count - b.width() * y)
    }

    /// `y − h`, bucket by bucket: each bucket becomes `width·y − count`.
    pub fn subtract_from_scalar(&self, y: f64) -> ExprResult<Histogram> {
        self.modify_counts(|b| b.width() * y - b.count)
    }

    pub fn multiply(&self, y: f64) -> ExprResult<Histogram> {
        self.modify_counts(|b| b.count * y)
    }

    pub fn divide(&self, y: f64) -> ExprResult<Histogram> {
        self.modify_counts(|b| b.count / y)
    }

    /// Renders as `[floor..ceil=count, ...]`, the literal syntax of the
    /// expression language.
    pub fn config_string(&self) -> String {
        let parts: Vec<String> = self
            .buckets
            .iter()
            .map(|b| {
                format!(
                    "{}..{}={}",
                    format_float(b.floor),
                    format_float(b.ceil),
                    format_float(b.count)
                )
            })
            .collect();
        format!("[{}]", parts.join(", "))
    }
}

fn normalize(items: Vec<Bucket>) -> Vec<Bucket> {
    let mut bounds: Vec<f64> = items.iter().flat_map(|b| [b.floor, b.ceil]).collect();
    bounds.sort_by(f64::total_cmp);
    bounds.dedup();

    let mut spans = vec![0.0; bounds.len().saturating_sub(1)];
    let mut points: Vec<(f64, f64)> = Vec::new();
    for bucket in &items {
        let width = bucket.width();
        if width == 0.0 {
            match points.iter_mut().find(|(at, _)| *at == bucket.floor) {
                Some(point) => point.1 += bucket.count,
                None => points.push((bucket.floor, bucket.count)),
            }
            continue;
        }
        let start = bounds.partition_point(|x| *x < bucket.floor);
        let end = bounds.partition_point(|x| *x < bucket.ceil);
        for i in start..end {
            let segment = bounds[i + 1] - bounds[i];
            spans[i] += bucket.count * segment / width;
        }
    }

    let mut split: Vec<Bucket> = points
        .into_iter()
        .map(|(at, count)| Bucket {
            floor: at,
            ceil: at,
            count,
        })
        .chain(spans.iter().enumerate().map(|(i, count)| Bucket {
            floor: bounds[i],
            ceil: bounds[i + 1],
            count: *count,
        }))
        .filter(|b| b.count != 0.0)
        .collect();
    split.sort_by(|x, y| x.floor.total_cmp(&y.floor).then_with(|| x.ceil.total_cmp(&y.ceil)));

    let mut merged: Vec<Bucket> = Vec::with_capacity(split.len());
    for bucket in split {
        if let Some(last) = merged.last_mut() {
            let same_density = last.count * bucket.width() == bucket.count * last.width();
            if last.ceil == bucket.floor && last.width() > 0.0 && bucket.width() > 0.0 && same_density {
                last.ceil = bucket.ceil;
                last.count += bucket.count;
                continue;
            }
        }
        merged.push(bucket);
    }
    merged
}

impl PartialEq for Histogram {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Histogram {}

impl PartialOrd for Histogram {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Histogram {
    fn cmp(&self, other: &Self) -> Ordering {
        for (x, y) in self.buckets.iter().zip(other.buckets.iter()) {
            match x.total_cmp(y) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        self.buckets.len().cmp(&other.buckets.len())
    }
}

impl Hash for Histogram {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.buckets.len());
        for b in &self.buckets {
            state.write_u64(b.floor.to_bits());
            state.write_u64(b.ceil.to_bits());
            state.write_u64(b.count.to_bits());
        }
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config_string())
    }
}
