// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-domain confidence offsets and classifier boosts.

use std::collections::BTreeMap;

use nyaya_config::model::LearningConfig;
use nyaya_core::LegalDomain;

/// Exponential-moving-average confidence offsets, one per domain.
///
/// Every update computes `offset = (1 - alpha) * offset + alpha * adjustment`
/// and clamps the result to `[-max_offset, max_offset]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceOffsets {
    alpha: f64,
    max_offset: f64,
    offsets: BTreeMap<LegalDomain, f64>,
}

impl ConfidenceOffsets {
    pub fn new(alpha: f64, max_offset: f64) -> Self {
        Self {
            alpha,
            max_offset: max_offset.abs(),
            offsets: BTreeMap::new(),
        }
    }

    pub fn from_config(config: &LearningConfig) -> Self {
        Self::new(config.alpha, config.max_offset)
    }

    /// Current offset of `domain` (0 when never updated).
    pub fn get(&self, domain: LegalDomain) -> f64 {
        self.offsets.get(&domain).copied().unwrap_or(0.0)
    }

    /// Fold `adjustment` into the offset of `domain` and return the new offset.
    pub fn update(&mut self, domain: LegalDomain, adjustment: f64) -> f64 {
        let previous = self.get(domain);
        let next = ((1.0 - self.alpha) * previous + self.alpha * adjustment)
            .clamp(-self.max_offset, self.max_offset);
        self.offsets.insert(domain, next);
        next
    }

    /// Overwrite an offset, still honouring the clamp bound.
    pub fn set(&mut self, domain: LegalDomain, offset: f64) {
        self.offsets
            .insert(domain, offset.clamp(-self.max_offset, self.max_offset));
    }

    /// `base + offset`, clamped to `[0, 1]`.
    pub fn adjusted(&self, domain: LegalDomain, base: f64) -> f64 {
        (base + self.get(domain)).clamp(0.0, 1.0)
    }

    pub fn max_offset(&self) -> f64 {
        self.max_offset
    }

    /// Domains with a recorded offset, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (LegalDomain, f64)> + '_ {
        self.offsets.iter().map(|(d, o)| (*d, *o))
    }
}

/// Additive score boosts learned from explicit domain corrections.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainBoosts {
    step: f64,
    bound: f64,
    boosts: BTreeMap<LegalDomain, f64>,
}

impl DomainBoosts {
    pub fn new(step: f64, bound: f64) -> Self {
        Self {
            step,
            bound: bound.abs(),
            boosts: BTreeMap::new(),
        }
    }

    pub fn from_config(config: &LearningConfig) -> Self {
        Self::new(config.correction_boost, config.max_offset)
    }

    /// Raise `correct` and lower `predicted` by one step.
    ///
    /// `General` is never scored by the classifier and keeps no boost. A
    /// correction naming the predicted domain itself changes nothing.
    /// Returns the boosts that changed.
    pub fn apply_correction(
        &mut self,
        predicted: LegalDomain,
        correct: LegalDomain,
    ) -> Vec<(LegalDomain, f64)> {
        if predicted == correct {
            return Vec::new();
        }
        [(correct, self.step), (predicted, -self.step)]
            .into_iter()
            .filter(|(domain, _)| *domain != LegalDomain::General)
            .map(|(domain, delta)| (domain, self.shift(domain, delta)))
            .collect()
    }

    fn shift(&mut self, domain: LegalDomain, delta: f64) -> f64 {
        let entry = self.boosts.entry(domain).or_insert(0.0);
        *entry = (*entry + delta).clamp(-self.bound, self.bound);
        *entry
    }

    /// Overwrite a boost, still honouring the bound.
    pub fn set(&mut self, domain: LegalDomain, boost: f64) {
        if domain != LegalDomain::General {
            self.boosts
                .insert(domain, boost.clamp(-self.bound, self.bound));
        }
    }

    pub fn get(&self, domain: LegalDomain) -> f64 {
        self.boosts.get(&domain).copied().unwrap_or(0.0)
    }

    /// Boosts keyed by domain, as the classifier consumes them.
    pub fn as_map(&self) -> &BTreeMap<LegalDomain, f64> {
        &self.boosts
    }
}
