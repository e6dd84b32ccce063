// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A small TF-IDF vectorizer over pre-tokenised documents.
//!
//! Weights use raw term frequency and smoothed inverse document frequency,
//! `idf(t) = ln((1 + N) / (1 + df(t))) + 1`, and every vector is
//! L2-normalised so cosine similarity reduces to a dot product.

use std::collections::HashMap;

/// A sparse, L2-normalised vector sorted by term index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    fn from_weights(mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|(index, _)| *index);
        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut entries {
                *w /= norm;
            }
        }
        Self { entries }
    }

    /// True when no term of the input was in the vocabulary.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Dot product of two sorted sparse vectors.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Cosine similarity of two vectors produced by the same index.
pub fn cosine(a: &SparseVector, b: &SparseVector) -> f64 {
    a.dot(b).clamp(0.0, 1.0)
}

/// Vocabulary and idf weights fitted on a document collection.
#[derive(Debug, Clone)]
pub struct TfIdfIndex {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    documents: usize,
}

impl TfIdfIndex {
    /// Fit the vocabulary and idf weights on `documents`.
    pub fn fit(documents: &[Vec<String>]) -> Self {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();

        for document in documents {
            let mut seen: Vec<usize> = Vec::new();
            for term in document {
                let next = vocabulary.len();
                let index = *vocabulary.entry(term.clone()).or_insert(next);
                if index == document_frequency.len() {
                    document_frequency.push(0);
                }
                if !seen.contains(&index) {
                    seen.push(index);
                    document_frequency[index] += 1;
                }
            }
        }

        let n = documents.len() as f64;
        let idf = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        Self {
            vocabulary,
            idf,
            documents: documents.len(),
        }
    }

    /// TF-IDF vector of `terms`; out-of-vocabulary terms are ignored.
    pub fn transform(&self, terms: &[String]) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in terms {
            if let Some(&index) = self.vocabulary.get(term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }
        SparseVector::from_weights(
            counts
                .into_iter()
                .map(|(index, tf)| (index, tf * self.idf[index]))
                .collect(),
        )
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn document_count(&self) -> usize {
        self.documents
    }

    /// Smoothed idf of `term`, if it is in the vocabulary.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&i| self.idf[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(words: &str) -> Vec<String> {
        words.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn smooth_idf_matches_formula() {
        let index = TfIdfIndex::fit(&[doc("deposit landlord"), doc("salary employer"), doc("deposit")]);
        let expected_common = (4.0f64 / 3.0).ln() + 1.0;
        let expected_rare = (4.0f64 / 2.0).ln() + 1.0;
        assert!((index.idf("deposit").unwrap() - expected_common).abs() < 1e-12);
        assert!((index.idf("salary").unwrap() - expected_rare).abs() < 1e-12);
        assert_eq!(index.idf("unknown"), None);
        assert_eq!(index.vocabulary_len(), 4);
        assert_eq!(index.document_count(), 3);
    }

    #[test]
    fn vectors_are_unit_length() {
        let index = TfIdfIndex::fit(&[doc("deposit landlord deposit"), doc("salary")]);
        let v = index.transform(&doc("deposit landlord deposit"));
        assert!((v.dot(&v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn identical_documents_have_cosine_one() {
        let index = TfIdfIndex::fit(&[doc("deposit landlord"), doc("salary employer")]);
        let a = index.transform(&doc("landlord deposit"));
        let b = index.transform(&doc("deposit landlord"));
        assert!((cosine(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn disjoint_documents_have_cosine_zero() {
        let index = TfIdfIndex::fit(&[doc("deposit landlord"), doc("salary employer")]);
        let a = index.transform(&doc("deposit"));
        let b = index.transform(&doc("salary"));
        assert_eq!(cosine(&a, &b), 0.0);
    }

    #[test]
    fn unknown_terms_produce_empty_vector() {
        let index = TfIdfIndex::fit(&[doc("deposit")]);
        let v = index.transform(&doc("tribunal appeal"));
        assert!(v.is_empty());
        assert_eq!(v.dot(&index.transform(&doc("deposit"))), 0.0);
    }
}
