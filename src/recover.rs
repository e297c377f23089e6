use std::collections::BTreeSet;

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::checksum::{compute_global_integrity_check, compute_row_checks};
use crate::config::SharingConfig;
use crate::constants::{
    DEFAULT_MAX_SEARCH_SHARES, MAX_SEARCH_SHARES_CEILING, MIN_THRESHOLD, WORDS_PER_ROW,
};
use crate::error::{Error, Result};
use crate::field::Gf2053;
use crate::lagrange::{
    compute_lagrange_multipliers, compute_lagrange_multipliers_at, lagrange_interpolate_at_zero,
};
use crate::mnemonic::indices_to_mnemonic;
use crate::security::constant_time_element_equal;
use crate::share::{verify_share_integrity, RecoveryIssue, RecoveryResult, Share};
use crate::wordlist::Bip39Context;

/// How a recovery attempt treats its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryOptions {
    /// Run the BIP39 checksum over the recovered phrase and report a failure in
    /// `errors.bip39`.
    pub strict_validation: bool,
    /// The threshold the shares were split with. When set and more shares than this are
    /// supplied, the engine searches the threshold-sized subsets for the largest group of
    /// mutually consistent shares. When unset and the supplied shares do not interpolate to
    /// a consistent reconstruction, the threshold is inferred (see [`recover_mnemonic`]).
    pub threshold: Option<usize>,
    /// The subset search is skipped above this many shares, with a diagnostic when the
    /// threshold was given. Values above [`MAX_SEARCH_SHARES_CEILING`] are clamped.
    pub max_search_shares: usize,
}

impl Default for RecoveryOptions {
    fn default() -> Self {
        RecoveryOptions {
            strict_validation: false,
            threshold: None,
            max_search_shares: DEFAULT_MAX_SEARCH_SHARES,
        }
    }
}

impl RecoveryOptions {
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }
}

impl From<&SharingConfig> for RecoveryOptions {
    fn from(config: &SharingConfig) -> Self {
        RecoveryOptions {
            strict_validation: config.strict_validation,
            threshold: None,
            max_search_shares: config.max_search_shares,
        }
    }
}

/// Recovers a mnemonic from shares using the English wordlist and the built-in BIP39
/// validator.
///
/// Data-integrity findings never produce an `Err`; they are itemized in the returned
/// [`RecoveryResult`]. `Err` is reserved for misuse: fewer than two shares, a word count
/// that does not fill whole rows, or shares of inconsistent shape.
///
/// No threshold is given here. If more than two shares are supplied and together they do
/// not reconstruct a mnemonic that passes its checksums, the threshold is taken to be the
/// smallest `k` for which some `k` shares reconstruct a checksum-consistent mnemonic or are
/// confirmed by another share. The shares are then cross-checked as if `k` had been given.
pub fn recover_mnemonic(
    shares: &[Share],
    word_count: usize,
    strict_validation: bool,
) -> Result<RecoveryResult> {
    let options = RecoveryOptions::default().with_strict_validation(strict_validation);
    recover_mnemonic_with(shares, word_count, &options, Bip39Context::default())
}

/// [`recover_mnemonic`] with explicit options and BIP39 collaborators.
pub fn recover_mnemonic_with(
    shares: &[Share],
    word_count: usize,
    options: &RecoveryOptions,
    ctx: Bip39Context<'_>,
) -> Result<RecoveryResult> {
    check_preconditions(shares, word_count, options)?;

    let mut result = RecoveryResult::new();

    for share in shares {
        if !verify_share_integrity(share) {
            warn!(
                "Share {} fails its own integrity check (GIC != sum of row checksums)",
                share.number()
            );
            result.shares_with_invalid_checksums.insert(share.number());
            result.errors.global_path_mismatch = true;
        }
    }

    let max_search_shares = options.max_search_shares.min(MAX_SEARCH_SHARES_CEILING);
    let threshold = match options.threshold {
        Some(threshold) => threshold,
        None => infer_threshold(shares, max_search_shares)?,
    };
    let subset: Vec<usize> = if shares.len() > threshold {
        if shares.len() > max_search_shares {
            warn!(
                "Refusing to cross-check {} shares, the limit is {}",
                shares.len(),
                max_search_shares
            );
            result.errors.generic = Some(RecoveryIssue::SearchLimitExceeded {
                supplied: shares.len(),
                limit: max_search_shares,
            });
            result.finalize();
            return Ok(result);
        }

        let best = find_consistent_subset(shares, threshold)?;
        for (i, share) in shares.iter().enumerate() {
            if !best.agreeing.contains(&i) {
                result.shares_with_invalid_checksums.insert(share.number());
            }
        }
        best.subset
    } else {
        (0..shares.len()).collect()
    };

    let selected: Vec<&Share> = subset.iter().map(|&i| &shares[i]).collect();
    debug!(
        "Interpolating with shares {:?}",
        selected.iter().map(|s| s.number()).collect::<Vec<_>>()
    );

    let reconstruction = Reconstruction::interpolate(&selected)?;

    // Shares left out of the interpolation are checked against it value by value.
    if selected.len() < shares.len() {
        let xs: Vec<Gf2053> = selected.iter().map(|s| s.share_number).collect();
        for (i, share) in shares.iter().enumerate() {
            if subset.contains(&i) {
                continue;
            }
            let weights = compute_lagrange_multipliers_at(&xs, share.share_number)?;
            let disagreement = compare_share(share, &selected, &weights);
            result.errors.row_path_mismatch.extend(disagreement.rows);
            result.errors.global_path_mismatch |= disagreement.global;
        }
    }

    result.errors.row = reconstruction.row_mismatches()?;
    result.errors.global = reconstruction.global_mismatch()?;

    let out_of_range = reconstruction
        .words
        .iter()
        .enumerate()
        .find(|(_, index)| index.is_zero() || usize::from(**index) > ctx.wordlist.len());

    match out_of_range {
        Some((position, index)) => {
            result.errors.generic = Some(RecoveryIssue::IndexOutOfRange {
                position: position + 1,
                index: index.value(),
            });
        }
        None => {
            let mnemonic = indices_to_mnemonic(&reconstruction.words, ctx.wordlist)?;
            if options.strict_validation && !ctx.validate(&mnemonic) {
                result.errors.bip39 = true;
            }
            result.mnemonic = Some(mnemonic);
        }
    }

    result.finalize();
    if result.success {
        info!("✅ Recovered mnemonic from {} shares", selected.len());
    } else {
        warn!(
            "⚠️ Recovery finished with errors: rows {:?}, global {}, bip39 {}, generic {:?}, \
             row paths {:?}, global path {}, suspect shares {:?}",
            result.errors.row,
            result.errors.global,
            result.errors.bip39,
            result.errors.generic,
            result.errors.row_path_mismatch,
            result.errors.global_path_mismatch,
            result.shares_with_invalid_checksums
        );
    }

    Ok(result)
}

fn check_preconditions(shares: &[Share], word_count: usize, options: &RecoveryOptions) -> Result<()> {
    if let Some(threshold) = options.threshold {
        if threshold < MIN_THRESHOLD {
            return Err(Error::InvalidThreshold {
                threshold,
                total_shares: shares.len(),
            });
        }
    }

    let required = options.threshold.unwrap_or(MIN_THRESHOLD);
    if shares.len() < required {
        return Err(Error::InsufficientShares {
            required,
            supplied: shares.len(),
        });
    }

    if word_count == 0 || word_count % WORDS_PER_ROW != 0 {
        return Err(Error::WordCountNotDivisible(word_count));
    }
    let row_count = word_count / WORDS_PER_ROW;

    let mut seen = BTreeSet::new();
    for share in shares {
        if share.share_number.is_zero() {
            return Err(Error::ZeroShareNumber);
        }
        if !seen.insert(share.number()) {
            return Err(Error::DuplicateShareNumber(share.number()));
        }
        if share.word_shares.len() != word_count {
            return Err(Error::InconsistentShare {
                share_number: share.number(),
                field: "word shares",
                expected: word_count,
                found: share.word_shares.len(),
            });
        }
        if share.checksum_shares.len() != row_count {
            return Err(Error::InconsistentShare {
                share_number: share.number(),
                field: "checksum shares",
                expected: row_count,
                found: share.checksum_shares.len(),
            });
        }
    }

    Ok(())
}

/// The values at zero of every polynomial, interpolated from one set of shares.
struct Reconstruction {
    words: Zeroizing<Vec<Gf2053>>,
    row_checks: Zeroizing<Vec<Gf2053>>,
    global_check: Gf2053,
}

impl Reconstruction {
    fn interpolate(selected: &[&Share]) -> Result<Self> {
        let xs: Vec<Gf2053> = selected.iter().map(|s| s.share_number).collect();
        let multipliers = compute_lagrange_multipliers(&xs)?;

        let column = |value: &dyn Fn(&Share) -> Gf2053| -> Gf2053 {
            let ys = Zeroizing::new(selected.iter().map(|s| value(*s)).collect::<Vec<_>>());
            lagrange_interpolate_at_zero(&ys, &multipliers)
        };

        let word_count = selected.first().map_or(0, |s| s.word_shares.len());
        let row_count = selected.first().map_or(0, |s| s.checksum_shares.len());

        let words = (0..word_count)
            .map(|j| column(&|s| s.word_shares[j]))
            .collect();
        let row_checks = (0..row_count)
            .map(|r| column(&|s| s.checksum_shares[r]))
            .collect();
        let global_check = column(&|s| s.global_integrity_check_share);

        Ok(Reconstruction {
            words: Zeroizing::new(words),
            row_checks: Zeroizing::new(row_checks),
            global_check,
        })
    }

    /// Rows whose checksum recomputed from the words differs from the interpolated one.
    fn row_mismatches(&self) -> Result<BTreeSet<usize>> {
        let recomputed = Zeroizing::new(compute_row_checks(&self.words, WORDS_PER_ROW)?);
        Ok(recomputed
            .iter()
            .zip(self.row_checks.iter())
            .enumerate()
            .filter(|&(_, (a, b))| !constant_time_element_equal(*a, *b))
            .map(|(row, _)| row)
            .collect())
    }

    fn global_mismatch(&self) -> Result<bool> {
        let recomputed = Zeroizing::new(compute_row_checks(&self.words, WORDS_PER_ROW)?);
        let global = compute_global_integrity_check(&recomputed);
        Ok(!constant_time_element_equal(global, self.global_check))
    }

    fn is_consistent(&self) -> Result<bool> {
        Ok(self.row_mismatches()?.is_empty() && !self.global_mismatch()?)
    }
}

/// Where one share departs from the polynomials defined by other shares.
#[derive(Debug, Default)]
struct Disagreement {
    rows: BTreeSet<usize>,
    global: bool,
}

impl Disagreement {
    fn is_empty(&self) -> bool {
        self.rows.is_empty() && !self.global
    }
}

/// Compares every value of `share` with the value predicted at its share number from
/// `selected`, given the Lagrange weights for that share number.
fn compare_share(share: &Share, selected: &[&Share], weights: &[Gf2053]) -> Disagreement {
    let predict = |value: &dyn Fn(&Share) -> Gf2053| -> Gf2053 {
        selected
            .iter()
            .zip(weights)
            .map(|(s, &w)| value(*s) * w)
            .sum()
    };

    let mut disagreement = Disagreement::default();
    for (j, &actual) in share.word_shares.iter().enumerate() {
        if !constant_time_element_equal(predict(&|s| s.word_shares[j]), actual) {
            disagreement.rows.insert(j / WORDS_PER_ROW);
        }
    }
    for (r, &actual) in share.checksum_shares.iter().enumerate() {
        if !constant_time_element_equal(predict(&|s| s.checksum_shares[r]), actual) {
            disagreement.rows.insert(r);
        }
    }
    disagreement.global = !constant_time_element_equal(
        predict(&|s| s.global_integrity_check_share),
        share.global_integrity_check_share,
    );
    disagreement
}

/// A threshold-sized subset and every supplied share that lies on its polynomials.
#[derive(Debug)]
struct Candidate {
    subset: Vec<usize>,
    agreeing: Vec<usize>,
    consistent: bool,
}

impl Candidate {
    fn rank(&self) -> (usize, bool) {
        (self.agreeing.len(), self.consistent)
    }
}

fn evaluate_subset(shares: &[Share], subset: &[usize]) -> Result<Candidate> {
    let selected: Vec<&Share> = subset.iter().map(|&i| &shares[i]).collect();
    let xs: Vec<Gf2053> = selected.iter().map(|s| s.share_number).collect();
    let consistent = Reconstruction::interpolate(&selected)?.is_consistent()?;

    let mut agreeing = subset.to_vec();
    for (i, share) in shares.iter().enumerate() {
        if subset.contains(&i) {
            continue;
        }
        let weights = compute_lagrange_multipliers_at(&xs, share.share_number)?;
        if compare_share(share, &selected, &weights).is_empty() {
            agreeing.push(i);
        }
    }
    agreeing.sort_unstable();

    Ok(Candidate {
        subset: subset.to_vec(),
        agreeing,
        consistent,
    })
}

/// Searches the `threshold`-sized subsets of `shares`, in lexicographic order, for the
/// reconstruction agreed on by the most shares. Ties go to a reconstruction whose own row
/// and global checks pass, then to the earlier subset.
///
/// Visits up to C(n, threshold) subsets. Subsets lying inside an agreeing group already
/// found define the same polynomials and are skipped.
fn find_consistent_subset(shares: &[Share], threshold: usize) -> Result<Candidate> {
    let mut best: Option<Candidate> = None;
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut combination: Vec<usize> = (0..threshold).collect();
    let mut evaluated = 0usize;

    loop {
        let known = groups
            .iter()
            .any(|group| combination.iter().all(|i| group.contains(i)));

        if !known {
            let candidate = evaluate_subset(shares, &combination)?;
            evaluated += 1;
            // A group no larger than its own subset can never contain a later one.
            if candidate.agreeing.len() > threshold {
                groups.push(candidate.agreeing.clone());
            }

            let better = best
                .as_ref()
                .map_or(true, |b| candidate.rank() > b.rank());
            if better {
                best = Some(candidate);
            }

            if best
                .as_ref()
                .is_some_and(|b| b.agreeing.len() == shares.len())
            {
                break;
            }
        }

        if !next_combination(&mut combination, shares.len()) {
            break;
        }
    }

    let best = best.ok_or(Error::InsufficientShares {
        required: threshold,
        supplied: shares.len(),
    })?;
    debug!(
        "Evaluated {} subsets, {} of {} shares agree",
        evaluated,
        best.agreeing.len(),
        shares.len()
    );
    Ok(best)
}

/// Picks the threshold when none was given.
///
/// Returns `shares.len()`, i.e. interpolate everything, when all shares together already
/// give a consistent reconstruction, when there are too few shares to cross-check or too
/// many to search, or when no smaller group of shares is supported.
fn infer_threshold(shares: &[Share], max_search_shares: usize) -> Result<usize> {
    if shares.len() <= MIN_THRESHOLD {
        return Ok(shares.len());
    }

    let all: Vec<&Share> = shares.iter().collect();
    if Reconstruction::interpolate(&all)?.is_consistent()? {
        return Ok(shares.len());
    }
    if shares.len() > max_search_shares {
        debug!(
            "Not inferring a threshold for {} shares, the limit is {}",
            shares.len(),
            max_search_shares
        );
        return Ok(shares.len());
    }

    for k in MIN_THRESHOLD..shares.len() {
        if has_supported_subset(shares, k)? {
            debug!("Inferred threshold {} from {} shares", k, shares.len());
            return Ok(k);
        }
    }
    Ok(shares.len())
}

/// Whether some `k` shares reconstruct a mnemonic that passes its own checks, or are
/// confirmed by at least one other share.
fn has_supported_subset(shares: &[Share], k: usize) -> Result<bool> {
    let mut combination: Vec<usize> = (0..k).collect();
    loop {
        let candidate = evaluate_subset(shares, &combination)?;
        if candidate.consistent || candidate.agreeing.len() > k {
            return Ok(true);
        }
        if !next_combination(&mut combination, shares.len()) {
            return Ok(false);
        }
    }
}

/// Advances `combination` to the next k-combination of `0..n` in lexicographic order.
/// Returns `false` once the last combination has been passed.
fn next_combination(combination: &mut [usize], n: usize) -> bool {
    let k = combination.len();
    let Some(i) = (0..k).rev().find(|&i| combination[i] < n - k + i) else {
        return false;
    };
    combination[i] += 1;
    for j in i + 1..k {
        combination[j] = combination[j - 1] + 1;
    }
    true
}
