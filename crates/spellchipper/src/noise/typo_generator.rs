//! # Typo Generator
//!
//! Corrupts a single token with Vietnamese-specific spelling errors.
//!
//! Rules run in two phases:
//! 1. **Rewrite rules**, in fixed priority order; the first rule whose
//!    predicate holds *and* whose gate draw passes rewrites the token and
//!    ends generation.
//! 2. **Compound edits** (accent removal, swap, remove, add), each gated
//!    independently; every edit that changes the token sets the category,
//!    so the last one wins.
//!
//! ## Random draw order
//!
//! All draws come from the caller's rng, in this order:
//! * skip predicates (numbers, times/measurements, punctuation): no draws;
//! * the no-typo gate;
//! * for each rewrite rule whose predicate holds: one gate draw;
//! * accent gate; variant coin; one draw per char found in a table;
//! * swap gate; Poisson count; sampled positions; permutation;
//! * remove gate; Poisson count; one position per removal;
//! * add gate; Poisson count; one letter per insert; one position per insert.

use rand::{Rng, seq::SliceRandom};
use rand_distr::{Distribution, Poisson};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    errors::{SCResult, SpellchipperError},
    noise::{
        ErrorCategory,
        accents::{degrade_accents, remove_accents},
        tables::{ALPHABET, TONE_DIGRAPHS, TONE_SHIFTED_DIGRAPHS, is_vowel},
    },
};

/// Hour and measurement tokens, e.g. `15h20`, `3h`, `1m55`.
const TIME_OR_MEASUREMENT_PATTERN: &str = r"\dh\d{2}|\dh|\dm\d";

/// Probability of the full strip variant of accent removal.
const FULL_STRIP_PROB: f64 = 0.5;

/// Options for [`TypoGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypoOptions {
    /// Probability of leaving a token untouched.
    pub no_typo_prob: f64,

    /// Gate for each consonant-confusion rule.
    pub ngong_typo_prob: f64,

    /// Gate for the tone-placement rule.
    pub special_tone_prob: f64,

    /// Gate for accent removal.
    pub accents_prob: f64,

    /// Gate for character swaps.
    pub swap_char_prob: f64,

    /// Gate for character insertion.
    pub add_chars_prob: f64,

    /// Gate for character removal.
    pub remove_chars_prob: f64,

    /// Poisson mean for extra swapped positions.
    pub swap_lambda: f64,

    /// Poisson mean for extra removals.
    pub remove_lambda: f64,

    /// Poisson mean for extra insertions.
    pub add_lambda: f64,

    /// Per-char probability of dropping a tone mark in partial accent removal.
    pub demote_tone_prob: f64,

    /// Per-char probability of stripping all marks in partial accent removal.
    pub strip_mark_prob: f64,
}

impl Default for TypoOptions {
    fn default() -> Self {
        Self {
            no_typo_prob: 0.6,
            ngong_typo_prob: 0.4,
            special_tone_prob: 0.3,
            accents_prob: 0.3,
            swap_char_prob: 0.1,
            add_chars_prob: 0.2,
            remove_chars_prob: 0.2,
            swap_lambda: 0.5,
            remove_lambda: 0.005,
            add_lambda: 0.05,
            demote_tone_prob: 0.7,
            strip_mark_prob: 0.5,
        }
    }
}

impl TypoOptions {
    /// Sets the no-typo probability.
    pub fn with_no_typo_prob(
        self,
        no_typo_prob: f64,
    ) -> Self {
        Self {
            no_typo_prob,
            ..self
        }
    }

    /// Sets the no-typo probability from a target error rate.
    ///
    /// `no_typo_prob = 1 - percent_err`; the per-rule gates still apply, so the
    /// realised error rate is at most `percent_err`.
    pub fn with_percent_err(
        self,
        percent_err: f64,
    ) -> Self {
        self.with_no_typo_prob(1.0 - percent_err)
    }

    /// Sets the consonant-confusion gate.
    pub fn with_ngong_typo_prob(
        self,
        ngong_typo_prob: f64,
    ) -> Self {
        Self {
            ngong_typo_prob,
            ..self
        }
    }

    /// Sets the tone-placement gate.
    pub fn with_special_tone_prob(
        self,
        special_tone_prob: f64,
    ) -> Self {
        Self {
            special_tone_prob,
            ..self
        }
    }

    /// Sets the compound edit gates.
    pub fn with_compound_probs(
        self,
        accents_prob: f64,
        swap_char_prob: f64,
        remove_chars_prob: f64,
        add_chars_prob: f64,
    ) -> Self {
        Self {
            accents_prob,
            swap_char_prob,
            remove_chars_prob,
            add_chars_prob,
            ..self
        }
    }

    /// Check that every probability is in `[0, 1]` and every mean is positive.
    pub fn validate(&self) -> SCResult<()> {
        let probs = [
            ("no_typo_prob", self.no_typo_prob),
            ("ngong_typo_prob", self.ngong_typo_prob),
            ("special_tone_prob", self.special_tone_prob),
            ("accents_prob", self.accents_prob),
            ("swap_char_prob", self.swap_char_prob),
            ("add_chars_prob", self.add_chars_prob),
            ("remove_chars_prob", self.remove_chars_prob),
            ("demote_tone_prob", self.demote_tone_prob),
            ("strip_mark_prob", self.strip_mark_prob),
        ];
        for (name, value) in probs {
            if !(0.0..=1.0).contains(&value) {
                return Err(SpellchipperError::InvalidOption {
                    name,
                    reason: format!("probability {value} not in [0, 1]"),
                });
            }
        }

        let means = [
            ("swap_lambda", self.swap_lambda),
            ("remove_lambda", self.remove_lambda),
            ("add_lambda", self.add_lambda),
        ];
        for (name, value) in means {
            if !(value.is_finite() && value > 0.0) {
                return Err(SpellchipperError::InvalidOption {
                    name,
                    reason: format!("poisson mean {value} must be positive"),
                });
            }
        }

        Ok(())
    }

    /// Build a [`TypoGenerator`] from these options.
    pub fn init(self) -> SCResult<TypoGenerator> {
        TypoGenerator::new(self)
    }
}

/// A prefix-style or tone-style rewrite evaluated in phase 1.
#[derive(Debug, Clone, Copy)]
enum RewriteRule {
    /// Move the tone of a `uy`/`oa` digraph onto its second vowel.
    ToneShift,

    /// Replace a consonant prefix followed by a vowel.
    Prefix {
        from: &'static str,
        to: &'static str,
        category: ErrorCategory,
    },
}

const fn prefix(
    from: &'static str,
    to: &'static str,
    category: ErrorCategory,
) -> RewriteRule {
    RewriteRule::Prefix { from, to, category }
}

/// Phase 1 rules, in priority order.
const REWRITE_RULES: [RewriteRule; 21] = {
    use ErrorCategory::*;
    [
        RewriteRule::ToneShift,
        prefix("l", "n", NgongLN),
        prefix("L", "N", NgongLN),
        prefix("n", "l", NgongLN),
        prefix("N", "L", NgongLN),
        prefix("s", "x", NgongSX),
        prefix("S", "X", NgongSX),
        prefix("x", "s", NgongSX),
        prefix("X", "S", NgongSX),
        prefix("tr", "ch", NgongTrCh),
        prefix("Tr", "Ch", NgongTrCh),
        prefix("ch", "tr", NgongTrCh),
        prefix("Ch", "Tr", NgongTrCh),
        prefix("gi", "d", NgongGiD),
        prefix("Gi", "D", NgongGiD),
        prefix("d", "gi", NgongGiD),
        prefix("D", "Gi", NgongGiD),
        prefix("r", "d", NgongRD),
        prefix("R", "D", NgongRD),
        prefix("d", "r", NgongRD),
        prefix("D", "R", NgongRD),
    ]
};

impl RewriteRule {
    fn category(&self) -> ErrorCategory {
        match self {
            RewriteRule::ToneShift => ErrorCategory::SpecialToneSwap,
            RewriteRule::Prefix { category, .. } => *category,
        }
    }

    fn gate(
        &self,
        options: &TypoOptions,
    ) -> f64 {
        match self {
            RewriteRule::ToneShift => options.special_tone_prob,
            RewriteRule::Prefix { .. } => options.ngong_typo_prob,
        }
    }

    /// Return the rewritten token if the rule's predicate holds.
    fn rewrite(
        &self,
        token: &str,
    ) -> Option<String> {
        match self {
            RewriteRule::ToneShift => {
                // The digraph must follow an initial consonant.
                let idx = TONE_DIGRAPHS
                    .iter()
                    .position(|d| matches!(token.find(d), Some(pos) if pos > 0))?;
                Some(token.replace(TONE_DIGRAPHS[idx], TONE_SHIFTED_DIGRAPHS[idx]))
            }
            RewriteRule::Prefix { from, to, .. } => {
                let rest = token.strip_prefix(from)?;
                let min_len = from.chars().count() + 1;
                if token.chars().count() <= min_len {
                    return None;
                }
                let next = rest.chars().next()?;
                if !is_vowel(next) {
                    return None;
                }
                Some(format!("{to}{rest}"))
            }
        }
    }
}

/// The result of corrupting one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypoOutcome {
    /// The (possibly) corrupted token.
    pub token: String,

    /// The label category; for compound edits, the last edit applied.
    pub category: ErrorCategory,

    /// Every category that changed the token, in application order.
    pub applied: Vec<ErrorCategory>,
}

impl TypoOutcome {
    fn unchanged(token: &str) -> Self {
        Self {
            token: token.to_string(),
            category: ErrorCategory::None,
            applied: Vec::new(),
        }
    }

    /// Was the token corrupted?
    pub fn is_typo(&self) -> bool {
        self.category.is_error()
    }

    fn record(
        &mut self,
        token: String,
        category: ErrorCategory,
    ) {
        self.token = token;
        self.category = category;
        self.applied.push(category);
    }
}

/// Per-token spelling error generator.
///
/// Holds no mutable state; all randomness comes from the rng passed to
/// [`TypoGenerator::generate`], so one generator can be shared across
/// workers that each own their rng.
#[derive(Debug, Clone)]
pub struct TypoGenerator {
    options: TypoOptions,
    time_pattern: Regex,
    swap_count: Poisson<f64>,
    remove_count: Poisson<f64>,
    add_count: Poisson<f64>,
}

fn poisson(
    name: &'static str,
    lambda: f64,
) -> SCResult<Poisson<f64>> {
    Poisson::new(lambda).map_err(|e| SpellchipperError::InvalidOption {
        name,
        reason: e.to_string(),
    })
}

impl TypoGenerator {
    /// Create a generator.
    ///
    /// ## Arguments
    /// * `options` - The rule probabilities; validated here.
    pub fn new(options: TypoOptions) -> SCResult<Self> {
        options.validate()?;
        Ok(Self {
            options,
            time_pattern: Regex::new(TIME_OR_MEASUREMENT_PATTERN)
                .map_err(|e| SpellchipperError::External(e.to_string()))?,
            swap_count: poisson("swap_lambda", options.swap_lambda)?,
            remove_count: poisson("remove_lambda", options.remove_lambda)?,
            add_count: poisson("add_lambda", options.add_lambda)?,
        })
    }

    /// Get the options.
    pub fn options(&self) -> &TypoOptions {
        &self.options
    }

    /// Is `token` structurally excluded from corruption?
    ///
    /// Numbers (`15.20`, `1,000`), hours and measurements (`15h20`, `1m55`)
    /// and punctuation are never corrupted.
    pub fn is_protected(
        &self,
        token: &str,
    ) -> bool {
        is_number(token) || self.time_pattern.is_match(token) || is_punctuation(token)
    }

    /// Corrupt `token`, returning the new token and its category.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        token: &str,
    ) -> (String, ErrorCategory) {
        let outcome = self.generate_outcome(rng, token);
        (outcome.token, outcome.category)
    }

    /// Corrupt `token`, returning the full [`TypoOutcome`].
    pub fn generate_outcome<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        token: &str,
    ) -> TypoOutcome {
        if self.is_protected(token) || rng.random::<f64>() < self.options.no_typo_prob {
            return TypoOutcome::unchanged(token);
        }

        let mut outcome = TypoOutcome::unchanged(token);

        for rule in REWRITE_RULES.iter() {
            if let Some(rewritten) = rule.rewrite(token)
                && rng.random::<f64>() < rule.gate(&self.options)
            {
                outcome.record(rewritten, rule.category());
                return outcome;
            }
        }

        if rng.random::<f64>() < self.options.accents_prob {
            let stripped = self.strip_accents(rng, &outcome.token);
            if stripped != outcome.token {
                outcome.record(stripped, ErrorCategory::RemoveAccent);
            }
        }

        if rng.random::<f64>() < self.options.swap_char_prob {
            let swapped = self.swap_chars(rng, &outcome.token);
            if swapped != outcome.token {
                outcome.record(swapped, ErrorCategory::SwapChar);
            }
        }

        if rng.random::<f64>() < self.options.remove_chars_prob {
            let removed = self.remove_chars(rng, &outcome.token);
            if removed != outcome.token {
                outcome.record(removed, ErrorCategory::RemoveChar);
            }
        }

        if rng.random::<f64>() < self.options.add_chars_prob {
            let added = self.add_chars(rng, &outcome.token);
            if added != outcome.token {
                outcome.record(added, ErrorCategory::AddChar);
            }
        }

        outcome
    }

    fn strip_accents<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        token: &str,
    ) -> String {
        if rng.random::<f64>() < FULL_STRIP_PROB {
            remove_accents(token)
        } else {
            degrade_accents(
                rng,
                token,
                self.options.demote_tone_prob,
                self.options.strip_mark_prob,
            )
        }
    }

    fn extra_count<R: Rng + ?Sized>(
        rng: &mut R,
        dist: &Poisson<f64>,
    ) -> usize {
        let k: f64 = dist.sample(rng);
        k as usize + 1
    }

    /// Permute a Poisson-sized set of distinct positions.
    fn swap_chars<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        token: &str,
    ) -> String {
        let chars: Vec<char> = token.chars().collect();
        let n = Self::extra_count(rng, &self.swap_count).min(chars.len());

        let index = rand::seq::index::sample(rng, chars.len(), n).into_vec();
        let mut permuted = index.clone();
        permuted.shuffle(rng);

        let mut swapped = chars.clone();
        for (&dst, &src) in index.iter().zip(permuted.iter()) {
            swapped[dst] = chars[src];
        }
        swapped.into_iter().collect()
    }

    /// Remove characters one at a time; never empties the token.
    fn remove_chars<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        token: &str,
    ) -> String {
        let mut chars: Vec<char> = token.chars().collect();
        let n = Self::extra_count(rng, &self.remove_count).min(chars.len().saturating_sub(1));
        for _ in 0..n {
            let pos = rng.random_range(0..chars.len());
            chars.remove(pos);
        }
        chars.into_iter().collect()
    }

    /// Insert random lowercase letters before uniformly chosen positions.
    fn add_chars<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        token: &str,
    ) -> String {
        let mut chars: Vec<char> = token.chars().collect();
        if chars.is_empty() {
            return token.to_string();
        }
        let n = Self::extra_count(rng, &self.add_count).min(chars.len());

        let alphabet: Vec<char> = ALPHABET.chars().collect();
        let letters: Vec<char> = (0..n)
            .map(|_| alphabet[rng.random_range(0..alphabet.len())])
            .collect();
        for letter in letters {
            let pos = rng.random_range(0..chars.len());
            chars.insert(pos, letter);
        }
        chars.into_iter().collect()
    }
}

/// Is `text` made only of ASCII punctuation, e.g. `,`, `...`, `"`?
fn is_punctuation(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_punctuation())
}

/// Does `text` read as a number, e.g. `15.20`, `15,20`, `150.000`?
fn is_number(text: &str) -> bool {
    if text.parse::<f64>().is_ok() {
        return true;
    }
    let delocalized = text.replace(',', "");
    !delocalized.is_empty() && delocalized.parse::<i64>().is_ok()
}
